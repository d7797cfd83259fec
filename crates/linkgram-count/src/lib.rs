//! Memoized exhaustive linkage counting over pre-built disjuncts.
//!
//! Given a [`Sentence`](linkgram_types::Sentence) whose words already carry
//! their candidate disjuncts, [`do_parse`] computes how many distinct
//! planar, projective link assignments satisfy every connector while
//! leaving exactly `null_count` words (or null blocks) unlinked. Only
//! counts are produced; enumeration and ranking of concrete linkages live
//! downstream.
//!
//! The engine is single-threaded and synchronous. A [`CountContext`] owns
//! the memo table for one parse and can be reused across sentences via
//! [`CountContext::reset`]. Results come in three flavors, all as plain
//! values: exact counts, counts truncated at [`COUNT_SATURATION`], and
//! lower bounds when a [`ResourceGuard`] reported exhaustion mid-count
//! (check [`CountContext::exhausted`]).
//!
//! # Example
//! ```rust
//! use linkgram_count::{CountContext, do_parse};
//! use linkgram_match::MatchIndex;
//! use linkgram_types::{ConnectorSpec, ParseOptions, Sentence};
//!
//! let mut sent = Sentence::new();
//! let a = sent.push_word();
//! let b = sent.push_word();
//! sent.add_disjunct(a, &[], &[ConnectorSpec::new("S", "")]);
//! sent.add_disjunct(b, &[ConnectorSpec::new("S", "")], &[]);
//!
//! let mut index = MatchIndex::build(&sent);
//! let mut ctx = CountContext::new(sent.len());
//! let count = do_parse(&sent, &mut index, &mut ctx, 0, &ParseOptions::default(), None);
//! assert_eq!(count, 1);
//! ```

pub mod count;
pub mod table;

pub use count::{
    COUNT_SATURATION, CountContext, PARSE_NUM_OVERFLOW, ResourceGuard, do_parse,
    first_parsable_null_count,
};
pub use table::MemoTable;
