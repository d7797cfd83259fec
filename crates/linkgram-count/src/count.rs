//! The exhaustive search: a memoized recursive decomposition over
//! sentence ranges and boundary connector states.
//!
//! `do_count` splits the open range `(lw, rw)` at every candidate word
//! `w` and every partition of the null budget, pairing each disjunct on
//! `w` against the boundary connectors. Before expanding a branch it
//! aggregates *pseudocounts*, {0,1} oracles read from the memo table
//! where 0 means "provably empty", and skips the branch whenever the
//! pseudo total is zero. Branches already proven empty are never
//! re-expanded, which is what makes the exhaustive count tractable.
//!
//! On entry each frame reserves its memo slot with a tentative zero and
//! overwrites it with the final count before returning. A frame that
//! re-encounters its own key on a cyclic descent (possible through
//! `multi` connectors) reads that tentative zero and terminates; do not
//! replace the reservation with an in-progress marker.

use linkgram_match::{MatchIndex, do_match};
use linkgram_types::{ConnectorId, ParseOptions, Sentence};
use tracing::{debug, warn};

use crate::table::{EntryId, MemoTable};

/// Counts at or above this value are truncated to it; the exact count is
/// at least this large.
pub const COUNT_SATURATION: i64 = i32::MAX as i64;

/// Upstream heuristic threshold for "too many parses". Distinct from
/// [`COUNT_SATURATION`]; never conflate the two.
pub const PARSE_NUM_OVERFLOW: i64 = 1 << 24;

/// How many memo misses go by between polls of the resource guard.
const CHECKTIMER_INTERVAL: u64 = 450_100;

/// Cooperative cancellation query, polled coarsely during counting.
///
/// Once it reports exhaustion the engine stops expanding new subproblems
/// and answers them as zero, so the final count becomes a lower bound.
pub trait ResourceGuard {
    fn exhausted(&self) -> bool;
}

impl<F: Fn() -> bool> ResourceGuard for F {
    fn exhausted(&self) -> bool {
        self()
    }
}

/// Reusable counting state: the memo table plus the truncation flag left
/// behind by the most recent parse.
#[derive(Debug)]
pub struct CountContext {
    table: MemoTable,
    exhausted: bool,
}

impl CountContext {
    /// Allocate a context; the hint only sizes the memo table.
    pub fn new(sentence_length_hint: usize) -> Self {
        Self {
            table: MemoTable::new(sentence_length_hint),
            exhausted: false,
        }
    }

    /// Tear down prior state and resize for a new sentence.
    pub fn reset(&mut self, sentence_length: usize) {
        self.table.reset(sentence_length);
        self.exhausted = false;
    }

    /// Did the last parse hit the resource budget? If so its result is a
    /// lower bound, not an exact count.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Entries currently memoized.
    pub fn memo_entries(&self) -> usize {
        self.table.len()
    }

    /// Read a finalized count back out of the memo, as downstream
    /// linkage extraction does. `None` means the subproblem was never
    /// evaluated.
    pub fn memo_lookup(
        &self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        cost: i32,
    ) -> Option<i64> {
        self.table
            .find(lw, rw, le, re, cost)
            .map(|entry| self.table.count(entry))
    }
}

/// Number of ways the sentence can be parsed with exactly `null_count`
/// words (or null blocks) left unlinked.
///
/// The recursion is seeded with the whole-sentence range from the virtual
/// left wall, with one extra null unit for the wall's slot. The memo
/// table in `ctx` persists across calls at different null counts for the
/// same sentence; call [`CountContext::reset`] when the sentence changes.
pub fn do_parse(
    sent: &Sentence,
    index: &mut MatchIndex,
    ctx: &mut CountContext,
    null_count: usize,
    opts: &ParseOptions,
    resources: Option<&dyn ResourceGuard>,
) -> i64 {
    let mut counter = Counter {
        sent,
        index,
        table: &mut ctx.table,
        islands_ok: opts.islands_ok,
        null_block: opts.null_block.max(1),
        resources,
        checktimer: 0,
        exhausted: resources.is_some_and(|r| r.exhausted()),
    };

    debug!(null_count, words = sent.len(), "counting linkages");
    let total = counter.do_count(-1, sent.len() as i32, None, None, null_count as i32 + 1);

    ctx.exhausted = counter.exhausted;
    total.min(COUNT_SATURATION)
}

/// Scan `opts.min_null_count..=opts.max_null_count` and return the first
/// null count admitting a parse, with its count.
pub fn first_parsable_null_count(
    sent: &Sentence,
    index: &mut MatchIndex,
    ctx: &mut CountContext,
    opts: &ParseOptions,
    resources: Option<&dyn ResourceGuard>,
) -> Option<(usize, i64)> {
    for nulls in opts.min_null_count..=opts.max_null_count {
        let total = do_parse(sent, index, ctx, nulls, opts, resources);
        if total > 0 {
            return Some((nulls, total));
        }
    }
    None
}

struct Counter<'a> {
    sent: &'a Sentence,
    index: &'a mut MatchIndex,
    table: &'a mut MemoTable,
    islands_ok: bool,
    null_block: usize,
    resources: Option<&'a dyn ResourceGuard>,
    checktimer: u64,
    exhausted: bool,
}

impl Counter<'_> {
    /// Find the memoized entry for this key, if any.
    ///
    /// A miss ticks the checktimer, and every [`CHECKTIMER_INTERVAL`]th
    /// miss polls the resource guard. Past the budget, misses are
    /// materialized as zero-count entries so the recursion above them
    /// collapses without unwinding.
    fn find_table_entry(
        &mut self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        cost: i32,
    ) -> Option<EntryId> {
        if let Some(entry) = self.table.find(lw, rw, le, re, cost) {
            return Some(entry);
        }

        self.checktimer += 1;
        if self.exhausted
            || (self.checktimer % CHECKTIMER_INTERVAL == 0
                && self.resources.is_some_and(|r| r.exhausted()))
        {
            if !self.exhausted {
                warn!("resource budget exhausted; counts are now lower bounds");
                self.exhausted = true;
            }
            return Some(self.table.store(lw, rw, le, re, cost, 0));
        }
        None
    }

    fn table_lookup(
        &mut self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        cost: i32,
    ) -> Option<i64> {
        self.find_table_entry(lw, rw, le, re, cost)
            .map(|entry| self.table.count(entry))
    }

    /// 0 iff the table holds a zero for this subproblem; 1 otherwise
    /// (absent means "unknown, possibly non-empty").
    fn pseudocount(
        &mut self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        cost: i32,
    ) -> i64 {
        match self.table_lookup(lw, rw, le, re, cost) {
            Some(0) => 0,
            _ => 1,
        }
    }

    /// Count the linkages of the open range strictly between `lw` and
    /// `rw` that consume both boundary connectors and use exactly
    /// `null_count` units of null budget.
    fn do_count(
        &mut self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        null_count: i32,
    ) -> i64 {
        if null_count < 0 {
            return 0;
        }

        let entry = match self.find_table_entry(lw, rw, le, re, null_count) {
            // May be another frame's tentative zero; returning it is what
            // terminates cyclic descent through identical keys.
            Some(entry) => return self.table.count(entry),
            None => self.table.store(lw, rw, le, re, null_count, 0),
        };

        let sent = self.sent;

        if rw == lw + 1 {
            // Neighboring words leave no room for links or nulls.
            let count = i64::from(le.is_none() && re.is_none() && null_count == 0);
            self.table.set_count(entry, count);
            return count;
        }

        if le.is_none() && re.is_none() {
            if !self.islands_ok && lw != -1 {
                // Without islands, the null cost of skipping the gap is
                // just its size in null blocks.
                let gap = (rw - lw - 1) as usize;
                let count = i64::from(null_count as usize == gap.div_ceil(self.null_block));
                self.table.set_count(entry, count);
                return count;
            }
            if null_count == 0 {
                // An interior non-empty range cannot go linkless for free.
                self.table.set_count(entry, 0);
                return 0;
            }
            // Let the word at the left edge absorb one null unit, either
            // anchoring an island through one of its disjuncts or staying
            // bare.
            let w = lw + 1;
            let mut total: i64 = 0;
            for &d_id in &sent.word(w as usize).disjuncts {
                let d = sent.disjunct(d_id);
                if d.left.is_none() {
                    let right = d.right;
                    total += self.do_count(w, rw, right, None, null_count - 1);
                }
            }
            total += self.do_count(w, rw, None, None, null_count - 1);
            self.table.set_count(entry, total);
            return total;
        }

        let start_word = match le {
            Some(c) => sent.connector(c).word,
            None => lw + 1,
        };
        let end_word = match re {
            Some(c) => sent.connector(c).word + 1,
            None => rw,
        };

        let (le_next, le_multi) = match le {
            Some(c) => {
                let c = sent.connector(c);
                (c.next, c.multi)
            }
            None => (None, false),
        };
        let (re_next, re_multi) = match re {
            Some(c) => {
                let c = sent.connector(c);
                (c.next, c.multi)
            }
            None => (None, false),
        };

        let mut total: i64 = 0;

        for w in start_word..end_word {
            let mlist = self.index.form_match_list(sent, w as usize, le, lw, re, rw);
            for mi in 0..self.index.match_list_len(mlist) {
                let d_id = self.index.match_list_get(mlist, mi);
                let d = sent.disjunct(d_id);
                let (d_left, d_right) = (d.left, d.right);
                let (dl_next, dl_multi) = match d_left {
                    Some(c) => {
                        let c = sent.connector(c);
                        (c.next, c.multi)
                    }
                    None => (None, false),
                };
                let (dr_next, dr_multi) = match d_right {
                    Some(c) => {
                        let c = sent.connector(c);
                        (c.next, c.multi)
                    }
                    None => (None, false),
                };

                let lmatch = match (le, d_left) {
                    (Some(a), Some(b)) => do_match(sent.connector(a), sent.connector(b), lw, w),
                    _ => false,
                };
                let rmatch = match (d_right, re) {
                    (Some(a), Some(b)) => do_match(sent.connector(a), sent.connector(b), w, rw),
                    _ => false,
                };

                for lcost in 0..=null_count {
                    let rcost = null_count - lcost;

                    // First decide, from the table alone, whether this
                    // split can possibly be parsable. A multi connector
                    // stays in play after linking, hence the four-term
                    // aggregation per side.
                    let mut leftcount: i64 = 0;
                    let mut rightcount: i64 = 0;
                    if lmatch {
                        leftcount = self.pseudocount(lw, w, le_next, dl_next, lcost);
                        if le_multi {
                            leftcount += self.pseudocount(lw, w, le, dl_next, lcost);
                        }
                        if dl_multi {
                            leftcount += self.pseudocount(lw, w, le_next, d_left, lcost);
                        }
                        if le_multi && dl_multi {
                            leftcount += self.pseudocount(lw, w, le, d_left, lcost);
                        }
                    }
                    if rmatch {
                        rightcount = self.pseudocount(w, rw, dr_next, re_next, rcost);
                        if dr_multi {
                            rightcount += self.pseudocount(w, rw, d_right, re_next, rcost);
                        }
                        if re_multi {
                            rightcount += self.pseudocount(w, rw, dr_next, re, rcost);
                        }
                        if dr_multi && re_multi {
                            rightcount += self.pseudocount(w, rw, d_right, re, rcost);
                        }
                    }

                    let mut pseudototal = leftcount * rightcount;
                    if leftcount > 0 {
                        pseudototal += leftcount * self.pseudocount(w, rw, d_right, re, rcost);
                    }
                    if le.is_none() && rightcount > 0 {
                        // Only at the left wall may a disjunct take part
                        // through its right connector alone; interior
                        // splits consume both sides. There is no mirror
                        // term for the right wall.
                        pseudototal += rightcount * self.pseudocount(lw, w, le, d_left, lcost);
                    }

                    // Zero here proves the real total is zero.
                    if pseudototal == 0 {
                        continue;
                    }

                    let mut leftcount: i64 = 0;
                    let mut rightcount: i64 = 0;
                    if lmatch {
                        leftcount = self.do_count(lw, w, le_next, dl_next, lcost);
                        if le_multi {
                            leftcount += self.do_count(lw, w, le, dl_next, lcost);
                        }
                        if dl_multi {
                            leftcount += self.do_count(lw, w, le_next, d_left, lcost);
                        }
                        if le_multi && dl_multi {
                            leftcount += self.do_count(lw, w, le, d_left, lcost);
                        }
                    }
                    if rmatch {
                        rightcount = self.do_count(w, rw, dr_next, re_next, rcost);
                        if dr_multi {
                            rightcount += self.do_count(w, rw, d_right, re_next, rcost);
                        }
                        if re_multi {
                            rightcount += self.do_count(w, rw, dr_next, re, rcost);
                        }
                        if dr_multi && re_multi {
                            rightcount += self.do_count(w, rw, d_right, re, rcost);
                        }
                    }

                    // Linkages using both boundary matches.
                    total = total.saturating_add(leftcount.saturating_mul(rightcount));

                    if leftcount > 0 {
                        // The left match alone, with the right side of the
                        // disjunct passed through as the new boundary.
                        let rest = self.do_count(w, rw, d_right, re, rcost);
                        total = total.saturating_add(leftcount.saturating_mul(rest));
                    }
                    if le.is_none() && rightcount > 0 {
                        // The right match alone; left-wall convention as
                        // above.
                        let rest = self.do_count(lw, w, le, d_left, lcost);
                        total = total.saturating_add(rightcount.saturating_mul(rest));
                    }

                    if total > COUNT_SATURATION {
                        total = COUNT_SATURATION;
                        self.table.set_count(entry, total);
                        self.index.put_match_list(mlist);
                        return total;
                    }
                }
            }
            self.index.put_match_list(mlist);
        }

        self.table.set_count(entry, total);
        total
    }
}
