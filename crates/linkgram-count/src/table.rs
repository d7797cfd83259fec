//! Memo table for counting subproblems.
//!
//! Open hashing with external chains, keyed by the quintuple
//! `(lw, rw, le, re, cost)`. Chains live in an entry arena and link by
//! index, so a reset is two `clear` calls rather than a walk over heap
//! nodes. Boundary connectors are keyed by arena id: two connectors with
//! identical content never collide.

use linkgram_types::ConnectorId;
use tracing::debug;

const EMPTY: u32 = u32::MAX;
const NO_CONNECTOR: u32 = u32::MAX;

const MIN_SHIFT: usize = 12;
const MAX_SHIFT: usize = 24;

fn encode(c: Option<ConnectorId>) -> u32 {
    match c {
        Some(id) => {
            debug_assert!(id.0 != NO_CONNECTOR);
            id.0
        }
        None => NO_CONNECTOR,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Key {
    lw: i32,
    rw: i32,
    le: u32,
    re: u32,
    cost: u32,
}

/// Handle to a stored entry; valid until the next [`MemoTable::reset`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntryId(u32);

#[derive(Debug)]
struct Entry {
    key: Key,
    count: i64,
    next: u32,
}

/// Open-hash memo table sized from the sentence length.
#[derive(Debug)]
pub struct MemoTable {
    buckets: Vec<u32>,
    entries: Vec<Entry>,
    shift: usize,
}

impl MemoTable {
    pub fn new(sentence_length_hint: usize) -> Self {
        let mut table = Self {
            buckets: Vec::new(),
            entries: Vec::new(),
            shift: 0,
        };
        table.reset(sentence_length_hint);
        table
    }

    /// Tear down all entries and resize the bucket array for a sentence
    /// of the given length.
    ///
    /// Sizing is piecewise exponential: 2^12 buckets below ten words,
    /// then `12 + length/6` bits, clamped at 2^24.
    pub fn reset(&mut self, sentence_length: usize) {
        let shift = if sentence_length >= 10 {
            (MIN_SHIFT + sentence_length / 6).min(MAX_SHIFT)
        } else {
            MIN_SHIFT
        };
        self.shift = shift;
        self.buckets.clear();
        self.buckets.resize(1usize << shift, EMPTY);
        self.entries.clear();
        debug!(buckets = self.buckets.len(), "memo table reset");
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold the key into `shift` bits.
    fn bucket_of(&self, key: &Key) -> usize {
        let mut h: u64 = 0x9e37_79b9_7f4a_7c15;
        for v in [
            key.lw as i64 as u64,
            key.rw as i64 as u64,
            u64::from(key.le),
            u64::from(key.re),
            u64::from(key.cost),
        ] {
            h = (h ^ v).wrapping_mul(0x0000_0100_0000_01b3);
        }
        ((h >> 32) ^ h) as usize & ((1usize << self.shift) - 1)
    }

    fn key(lw: i32, rw: i32, le: Option<ConnectorId>, re: Option<ConnectorId>, cost: i32) -> Key {
        debug_assert!(cost >= 0);
        Key {
            lw,
            rw,
            le: encode(le),
            re: encode(re),
            cost: cost as u32,
        }
    }

    pub(crate) fn find(
        &self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        cost: i32,
    ) -> Option<EntryId> {
        let key = Self::key(lw, rw, le, re, cost);
        let mut at = self.buckets[self.bucket_of(&key)];
        while at != EMPTY {
            let entry = &self.entries[at as usize];
            if entry.key == key {
                return Some(EntryId(at));
            }
            at = entry.next;
        }
        None
    }

    /// Insert a fresh entry. The caller has verified absence.
    pub(crate) fn store(
        &mut self,
        lw: i32,
        rw: i32,
        le: Option<ConnectorId>,
        re: Option<ConnectorId>,
        cost: i32,
        count: i64,
    ) -> EntryId {
        let key = Self::key(lw, rw, le, re, cost);
        let bucket = self.bucket_of(&key);
        let id = self.entries.len() as u32;
        self.entries.push(Entry {
            key,
            count,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = id;
        EntryId(id)
    }

    pub(crate) fn count(&self, entry: EntryId) -> i64 {
        self.entries[entry.0 as usize].count
    }

    pub(crate) fn set_count(&mut self, entry: EntryId, count: i64) {
        self.entries[entry.0 as usize].count = count;
    }
}
