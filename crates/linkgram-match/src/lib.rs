//! Connector matching rules and the fast match-list index.
//!
//! Two layers live here. [`do_match`] is the full predicate deciding
//! whether a left-side and a right-side connector can link across a given
//! word distance: label equality, length limits, exact uppercase head,
//! then a priority-dependent walk over the lowercase tails. [`easy_match`]
//! is the `Thin`/`Thin` specialization used when the dictionary carries no
//! priorities; the two agree on all `Thin` inputs.
//!
//! [`MatchIndex`] is the enumeration structure the counter queries at
//! every split word: per-word buckets keyed by the head of each disjunct's
//! innermost left and right connector, so a query touches only disjuncts
//! that could plausibly match one of the two boundary connectors. The
//! cheap bucket check is label + head only; callers re-run [`do_match`]
//! on every candidate.
//!
//! The index is restartable: [`form_match_list`] hands out a handle and
//! the counter may hold several outstanding handles across its recursion,
//! releasing each with [`put_match_list`] in LIFO order. Released buffers
//! are recycled.
//!
//! [`form_match_list`]: MatchIndex::form_match_list
//! [`put_match_list`]: MatchIndex::put_match_list

use std::collections::HashMap;

use linkgram_types::{Connector, ConnectorId, DisjunctId, Priority, Sentence};
use tracing::info;

/// Can `a` (pointing right from word `aw`) link to `b` (pointing left
/// from word `bw`)?
///
/// Checks run in contract order: label, distance against both length
/// limits, head equality, then the tail walk for the priority pair.
/// `Thin`/`Thin` is symmetric in `a` and `b`; `Up`/`Down` is directional;
/// any other pairing fails.
pub fn do_match(a: &Connector, b: &Connector, aw: i32, bw: i32) -> bool {
    debug_assert!(aw <= bw, "do_match did not receive words in natural order");
    if a.label != b.label {
        return false;
    }
    let dist = (bw - aw) as usize;
    if dist > a.length_limit || dist > b.length_limit {
        return false;
    }
    if a.head != b.head {
        return false;
    }
    let s = a.tail.as_bytes();
    let t = b.tail.as_bytes();
    match (a.priority, b.priority) {
        (Priority::Thin, Priority::Thin) => thin_tails_match(s, t),
        // As links go up, the set of matching strings may only shrink:
        // the up-side string must be at least as strong as the down side.
        (Priority::Up, Priority::Down) => directional_tails_match(s, t),
        (Priority::Down, Priority::Up) => directional_tails_match(t, s),
        _ => false,
    }
}

/// The `Thin`/`Thin` fast path: exact head, wildcard-aware tails, no
/// label or distance checks. Used by dictionaries without priorities.
pub fn easy_match(a: &Connector, b: &Connector) -> bool {
    a.head == b.head && thin_tails_match(a.tail.as_bytes(), b.tail.as_bytes())
}

/// `*` matches anything, `^` matches nothing except `*`, and otherwise
/// bytes match iff equal. The walk stops when either tail ends.
fn thin_tails_match(s: &[u8], t: &[u8]) -> bool {
    s.iter()
        .zip(t)
        .all(|(&x, &y)| x == b'*' || y == b'*' || (x == y && x != b'^'))
}

/// Up/Down walk with `up` the up-side tail: `*` is free on the up side,
/// `^` is free on the down side.
fn directional_tails_match(up: &[u8], down: &[u8]) -> bool {
    up.iter()
        .zip(down)
        .all(|(&x, &y)| x == y || x == b'*' || y == b'^')
}

/// Handle to one outstanding match list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchList(usize);

/// Per-word disjunct buckets consulted by the counter at every split word.
#[derive(Debug)]
pub struct MatchIndex {
    /// For each word, disjuncts bucketed by their innermost left
    /// connector's head.
    left: Vec<HashMap<String, Vec<DisjunctId>>>,
    /// Same, by innermost right connector's head.
    right: Vec<HashMap<String, Vec<DisjunctId>>>,
    /// Outstanding lists, LIFO. Index = handle.
    lists: Vec<Vec<DisjunctId>>,
    /// Released buffers kept for reuse.
    spare: Vec<Vec<DisjunctId>>,
}

impl MatchIndex {
    /// Build the buckets for a (typically pruned) sentence.
    pub fn build(sent: &Sentence) -> Self {
        let mut left: Vec<HashMap<String, Vec<DisjunctId>>> = vec![HashMap::new(); sent.len()];
        let mut right: Vec<HashMap<String, Vec<DisjunctId>>> = vec![HashMap::new(); sent.len()];

        for (w, word) in sent.words().iter().enumerate() {
            for &d_id in &word.disjuncts {
                let d = sent.disjunct(d_id);
                if let Some(c) = d.left {
                    let c = sent.connector(c);
                    left[w].entry(c.head.clone()).or_default().push(d_id);
                }
                if let Some(c) = d.right {
                    let c = sent.connector(c);
                    right[w].entry(c.head.clone()).or_default().push(d_id);
                }
            }
        }

        info!(
            words = sent.len(),
            disjuncts = sent.disjunct_count(),
            "match index built"
        );

        Self {
            left,
            right,
            lists: Vec::new(),
            spare: Vec::new(),
        }
    }

    /// Enumerate the disjuncts on `w` whose innermost left connector is
    /// label-compatible with `le`, or whose innermost right connector is
    /// label-compatible with `re`. Disjuncts compatible with both appear
    /// once.
    pub fn form_match_list(
        &mut self,
        sent: &Sentence,
        w: usize,
        le: Option<ConnectorId>,
        lw: i32,
        re: Option<ConnectorId>,
        rw: i32,
    ) -> MatchList {
        debug_assert!(lw < w as i32 && (w as i32) < rw);

        let mut list = self.spare.pop().unwrap_or_default();

        if let Some(le) = le {
            let boundary = sent.connector(le);
            if let Some(bucket) = self.left[w].get(&boundary.head) {
                for &d_id in bucket {
                    let c = sent.connector(sent.disjunct(d_id).left.expect("bucketed by left"));
                    if c.label == boundary.label {
                        list.push(d_id);
                    }
                }
            }
        }

        if let Some(re) = re {
            let boundary = sent.connector(re);
            if let Some(bucket) = self.right[w].get(&boundary.head) {
                for &d_id in bucket {
                    let c = sent.connector(sent.disjunct(d_id).right.expect("bucketed by right"));
                    if c.label == boundary.label && !list.contains(&d_id) {
                        list.push(d_id);
                    }
                }
            }
        }

        let handle = MatchList(self.lists.len());
        self.lists.push(list);
        handle
    }

    pub fn match_list_len(&self, h: MatchList) -> usize {
        self.lists[h.0].len()
    }

    pub fn match_list_get(&self, h: MatchList, i: usize) -> DisjunctId {
        self.lists[h.0][i]
    }

    /// Release a list. Lists must be released in reverse order of
    /// creation; the recursion naturally does so.
    pub fn put_match_list(&mut self, h: MatchList) {
        assert_eq!(
            h.0 + 1,
            self.lists.len(),
            "match lists must be released in LIFO order"
        );
        let mut list = self.lists.pop().expect("outstanding list");
        list.clear();
        self.spare.push(list);
    }
}
