//! Shared types that mirror the parser's disjunct data model.
//!
//! Upstream stages (tokenization, dictionary expansion, pruning) produce a
//! [`Sentence`]: a sequence of words, each carrying a list of candidate
//! [`Disjunct`]s, each disjunct a chain of left-pointing and right-pointing
//! [`Connector`]s. The counting engine treats all of it as read-only.
//!
//! Connectors and disjuncts live in arenas owned by the sentence and are
//! addressed by [`ConnectorId`]/[`DisjunctId`]. Identity is the arena slot,
//! never the content: two connectors with identical labels and strings are
//! still distinct, which is what the memo table relies on.
//!
//! ```rust
//! use linkgram_types::{ConnectorSpec, Sentence};
//!
//! let mut sent = Sentence::new();
//! let a = sent.push_word();
//! let b = sent.push_word();
//! sent.add_disjunct(a, &[], &[ConnectorSpec::new("S", "")]);
//! sent.add_disjunct(b, &[ConnectorSpec::new("S", "")], &[]);
//! assert_eq!(sent.len(), 2);
//! ```

use std::fmt;

/// Default connector length limit: effectively unbounded for real sentences.
pub const UNLIMITED_LEN: usize = 255;

/// Which way a connector points from its word.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Parse the `+`/`-` marker used in dictionary notation.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Direction::Left),
            '+' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Emit the dictionary marker for this direction.
    pub fn to_char(self) -> char {
        match self {
            Direction::Left => '-',
            Direction::Right => '+',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// Connector priority class. `Thin` is the ordinary dictionary case; `Up`
/// and `Down` only pair with each other, under asymmetric wildcard rules.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Priority {
    #[default]
    Thin,
    Up,
    Down,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Thin => "thin",
            Priority::Up => "up",
            Priority::Down => "down",
        })
    }
}

/// Stable arena index of a connector within its sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ConnectorId(pub u32);

/// Stable arena index of a disjunct within its sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DisjunctId(pub u32);

/// One half of a potential link.
///
/// `head` is the uppercase prefix, compared for exact equality; `tail` is
/// the lowercase/wildcard suffix matched under the priority rules. `word`
/// is the nearest word this connector could ever link to, the hint the
/// counter uses to bound its split-word enumeration. Builders seed it
/// conservatively; pruning passes may tighten it via
/// [`Sentence::connector_mut`].
#[derive(Clone, Debug)]
pub struct Connector {
    pub label: i16,
    pub head: String,
    pub tail: String,
    pub multi: bool,
    pub length_limit: usize,
    pub priority: Priority,
    pub word: i32,
    /// Next connector on the same side of the same disjunct, innermost
    /// to outermost.
    pub next: Option<ConnectorId>,
}

/// One way a word can participate in a linkage: the heads of its left and
/// right connector chains.
#[derive(Clone, Copy, Debug)]
pub struct Disjunct {
    pub left: Option<ConnectorId>,
    pub right: Option<ConnectorId>,
}

/// A word position and its candidate disjuncts.
#[derive(Clone, Debug, Default)]
pub struct Word {
    pub disjuncts: Vec<DisjunctId>,
}

/// Everything needed to construct one connector.
///
/// Fields default to an ordinary dictionary connector: label 0, not multi,
/// unlimited length, `Thin` priority.
#[derive(Clone, Debug)]
pub struct ConnectorSpec {
    pub label: i16,
    pub head: String,
    pub tail: String,
    pub multi: bool,
    pub length_limit: usize,
    pub priority: Priority,
}

impl ConnectorSpec {
    pub fn new(head: impl Into<String>, tail: impl Into<String>) -> Self {
        Self {
            label: 0,
            head: head.into(),
            tail: tail.into(),
            multi: false,
            length_limit: UNLIMITED_LEN,
            priority: Priority::Thin,
        }
    }
}

/// A sentence plus the arenas its disjuncts and connectors live in.
///
/// Immutable during counting; grows only through [`push_word`] and
/// [`add_disjunct`].
///
/// [`push_word`]: Sentence::push_word
/// [`add_disjunct`]: Sentence::add_disjunct
#[derive(Clone, Debug, Default)]
pub struct Sentence {
    words: Vec<Word>,
    connectors: Vec<Connector>,
    disjuncts: Vec<Disjunct>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Append a word and return its index.
    pub fn push_word(&mut self) -> usize {
        self.words.push(Word::default());
        self.words.len() - 1
    }

    /// Add a disjunct to word `w`. Connector specs are given innermost
    /// first on each side; chains are threaded so that consuming a
    /// connector advances to the next-outer one.
    ///
    /// Word hints are seeded conservatively: a left-pointing connector on
    /// word `w` could link as near as `w - 1`, a right-pointing one as
    /// near as `w + 1`.
    pub fn add_disjunct(
        &mut self,
        w: usize,
        left: &[ConnectorSpec],
        right: &[ConnectorSpec],
    ) -> DisjunctId {
        let left_head = self.build_chain(left, w as i32 - 1);
        let right_head = self.build_chain(right, w as i32 + 1);
        let id = DisjunctId(self.disjuncts.len() as u32);
        self.disjuncts.push(Disjunct {
            left: left_head,
            right: right_head,
        });
        self.words[w].disjuncts.push(id);
        id
    }

    fn build_chain(&mut self, specs: &[ConnectorSpec], hint: i32) -> Option<ConnectorId> {
        let mut next = None;
        for spec in specs.iter().rev() {
            let id = ConnectorId(self.connectors.len() as u32);
            self.connectors.push(Connector {
                label: spec.label,
                head: spec.head.clone(),
                tail: spec.tail.clone(),
                multi: spec.multi,
                length_limit: spec.length_limit,
                priority: spec.priority,
                word: hint,
                next,
            });
            next = Some(id);
        }
        next
    }

    pub fn word(&self, w: usize) -> &Word {
        &self.words[w]
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn connector(&self, id: ConnectorId) -> &Connector {
        &self.connectors[id.0 as usize]
    }

    /// Mutable access for upstream builders and pruning passes; the
    /// counting engine never calls this.
    pub fn connector_mut(&mut self, id: ConnectorId) -> &mut Connector {
        &mut self.connectors[id.0 as usize]
    }

    pub fn disjunct(&self, id: DisjunctId) -> &Disjunct {
        &self.disjuncts[id.0 as usize]
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn disjunct_count(&self) -> usize {
        self.disjuncts.len()
    }
}

/// Options snapshotted by the counting driver.
///
/// `null_block` controls how many consecutive unlinked words collapse into
/// one unit of null cost; `min_null_count`/`max_null_count` bound the
/// null-count scan performed by the driver's convenience loop.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    pub islands_ok: bool,
    pub null_block: usize,
    pub min_null_count: usize,
    pub max_null_count: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            islands_ok: false,
            null_block: 1,
            min_null_count: 0,
            max_null_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_round_trips() {
        assert_eq!(Direction::from_char('+'), Some(Direction::Right));
        assert_eq!(Direction::from_char('-'), Some(Direction::Left));
        assert_eq!(Direction::from_char('x'), None);
        assert_eq!(Direction::Right.to_char(), '+');
    }

    #[test]
    fn chains_thread_innermost_first() {
        let mut sent = Sentence::new();
        let w = sent.push_word();
        let d = sent.add_disjunct(
            w,
            &[],
            &[ConnectorSpec::new("S", ""), ConnectorSpec::new("O", "")],
        );
        let head = sent.disjunct(d).right.expect("right chain");
        let first = sent.connector(head);
        assert_eq!(first.head, "S");
        let second = sent.connector(first.next.expect("outer connector"));
        assert_eq!(second.head, "O");
        assert_eq!(second.next, None);
    }

    #[test]
    fn word_hints_are_conservative() {
        let mut sent = Sentence::new();
        sent.push_word();
        let w = sent.push_word();
        let d = sent.add_disjunct(
            w,
            &[ConnectorSpec::new("S", "")],
            &[ConnectorSpec::new("O", "")],
        );
        let left = sent.connector(sent.disjunct(d).left.unwrap());
        let right = sent.connector(sent.disjunct(d).right.unwrap());
        assert_eq!(left.word, 0);
        assert_eq!(right.word, 2);
    }

    #[test]
    fn disjuncts_attach_to_their_word() {
        let mut sent = Sentence::new();
        let a = sent.push_word();
        let b = sent.push_word();
        sent.add_disjunct(a, &[], &[ConnectorSpec::new("S", "")]);
        sent.add_disjunct(b, &[ConnectorSpec::new("S", "")], &[]);
        sent.add_disjunct(b, &[ConnectorSpec::new("O", "")], &[]);
        assert_eq!(sent.word(a).disjuncts.len(), 1);
        assert_eq!(sent.word(b).disjuncts.len(), 2);
        assert_eq!(sent.disjunct_count(), 3);
        assert_eq!(sent.connector_count(), 3);
    }
}
