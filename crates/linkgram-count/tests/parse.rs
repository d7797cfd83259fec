use linkgram_count::{COUNT_SATURATION, CountContext, do_parse, first_parsable_null_count};
use linkgram_match::MatchIndex;
use linkgram_types::{ConnectorSpec, ParseOptions, Sentence};

fn spec(head: &str) -> ConnectorSpec {
    ConnectorSpec::new(head, "")
}

fn multi(head: &str) -> ConnectorSpec {
    ConnectorSpec {
        multi: true,
        ..ConnectorSpec::new(head, "")
    }
}

fn count(sent: &Sentence, nulls: usize, opts: &ParseOptions) -> i64 {
    let mut index = MatchIndex::build(sent);
    let mut ctx = CountContext::new(sent.len());
    do_parse(sent, &mut index, &mut ctx, nulls, opts, None)
}

/// `A: S+` / `B: S-`.
fn two_word_sentence() -> Sentence {
    let mut sent = Sentence::new();
    let a = sent.push_word();
    let b = sent.push_word();
    sent.add_disjunct(a, &[], &[spec("S")]);
    sent.add_disjunct(b, &[spec("S")], &[]);
    sent
}

/// `A: S+` / `B: (no disjuncts)` / `C: S-`.
fn gap_sentence() -> Sentence {
    let mut sent = Sentence::new();
    let a = sent.push_word();
    sent.push_word();
    let c = sent.push_word();
    sent.add_disjunct(a, &[], &[spec("S")]);
    sent.add_disjunct(c, &[spec("S")], &[]);
    sent
}

#[test]
fn links_two_words_without_nulls() {
    let sent = two_word_sentence();
    assert_eq!(count(&sent, 0, &ParseOptions::default()), 1);
    assert_eq!(count(&sent, 2, &ParseOptions::default()), 0);
}

#[test]
fn both_words_null_costs_one_unit() {
    // The left wall's virtual slot absorbs one unit, so leaving both
    // words bare lands on null count 1, with or without islands.
    let sent = two_word_sentence();
    for islands_ok in [false, true] {
        let opts = ParseOptions {
            islands_ok,
            ..ParseOptions::default()
        };
        assert_eq!(count(&sent, 1, &opts), 1);
    }
}

#[test]
fn bridging_a_bare_word_needs_a_null() {
    let sent = gap_sentence();
    assert_eq!(count(&sent, 0, &ParseOptions::default()), 0);
    assert_eq!(count(&sent, 1, &ParseOptions::default()), 1);
}

#[test]
fn null_blocks_collapse_consecutive_gaps() {
    // A: S+ / two bare words / D: S-. The two-word gap costs two nulls at
    // block size one, but only one null when blocks of two collapse.
    let mut sent = Sentence::new();
    let a = sent.push_word();
    sent.push_word();
    sent.push_word();
    let d = sent.push_word();
    sent.add_disjunct(a, &[], &[spec("S")]);
    sent.add_disjunct(d, &[spec("S")], &[]);

    let unit = ParseOptions::default();
    assert_eq!(count(&sent, 1, &unit), 0);
    assert_eq!(count(&sent, 2, &unit), 1);
    assert_eq!(count(&sent, 3, &unit), 1); // everything bare

    let blocked = ParseOptions {
        null_block: 2,
        ..ParseOptions::default()
    };
    assert_eq!(count(&sent, 0, &blocked), 0);
    assert_eq!(count(&sent, 1, &blocked), 1);
    assert_eq!(count(&sent, 2, &blocked), 1); // everything bare
}

#[test]
fn multi_connector_links_both_targets() {
    // A: @S+ / B: S- / C: S-. The multi connector stays in play after
    // linking B and reaches C as well, so the sentence parses clean.
    let mut sent = Sentence::new();
    let a = sent.push_word();
    let b = sent.push_word();
    let c = sent.push_word();
    sent.add_disjunct(a, &[], &[multi("S")]);
    sent.add_disjunct(b, &[spec("S")], &[]);
    sent.add_disjunct(c, &[spec("S")], &[]);
    assert_eq!(count(&sent, 0, &ParseOptions::default()), 1);
    // With one null, the link lands on exactly one of B and C.
    assert_eq!(count(&sent, 1, &ParseOptions::default()), 2);
}

#[test]
fn single_connector_cannot_serve_two_words() {
    // Same sentence without the multi flag: one of B and C must go null.
    let mut sent = Sentence::new();
    let a = sent.push_word();
    let b = sent.push_word();
    let c = sent.push_word();
    sent.add_disjunct(a, &[], &[spec("S")]);
    sent.add_disjunct(b, &[spec("S")], &[]);
    sent.add_disjunct(c, &[spec("S")], &[]);
    assert_eq!(count(&sent, 0, &ParseOptions::default()), 0);
    assert_eq!(count(&sent, 1, &ParseOptions::default()), 2);
}

/// `A: S+` / `B: S- | S- & O+` / `C: O-`.
fn attachment_sentence() -> Sentence {
    let mut sent = Sentence::new();
    let a = sent.push_word();
    let b = sent.push_word();
    let c = sent.push_word();
    sent.add_disjunct(a, &[], &[spec("S")]);
    sent.add_disjunct(b, &[spec("S")], &[]);
    sent.add_disjunct(b, &[spec("S")], &[spec("O")]);
    sent.add_disjunct(c, &[spec("O")], &[]);
    sent
}

#[test]
fn null_budget_is_monotone_with_islands() {
    let sent = attachment_sentence();
    let opts = ParseOptions {
        islands_ok: true,
        ..ParseOptions::default()
    };
    let counts: Vec<i64> = (0..3).map(|k| count(&sent, k, &opts)).collect();
    assert_eq!(counts, vec![1, 1, 1]);
    for pair in counts.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn exhausted_resources_truncate_to_zero() {
    let sent = two_word_sentence();
    let mut index = MatchIndex::build(&sent);
    let mut ctx = CountContext::new(sent.len());
    let opts = ParseOptions::default();

    let spent = || true;
    let total = do_parse(&sent, &mut index, &mut ctx, 0, &opts, Some(&spent));
    assert_eq!(total, 0);
    assert!(ctx.exhausted());

    // A healthy budget leaves the count exact.
    ctx.reset(sent.len());
    let healthy = || false;
    let total = do_parse(&sent, &mut index, &mut ctx, 0, &opts, Some(&healthy));
    assert_eq!(total, 1);
    assert!(!ctx.exhausted());
}

#[test]
fn null_scan_stops_at_first_parsable_count() {
    let sent = gap_sentence();
    let mut index = MatchIndex::build(&sent);
    let mut ctx = CountContext::new(sent.len());
    let opts = ParseOptions {
        max_null_count: 2,
        ..ParseOptions::default()
    };
    assert_eq!(
        first_parsable_null_count(&sent, &mut index, &mut ctx, &opts, None),
        Some((1, 1))
    );
}

#[test]
fn context_reset_allows_reuse_across_sentences() {
    let first = two_word_sentence();
    let mut index = MatchIndex::build(&first);
    let mut ctx = CountContext::new(first.len());
    let opts = ParseOptions::default();
    assert_eq!(do_parse(&first, &mut index, &mut ctx, 0, &opts, None), 1);

    let second = gap_sentence();
    let mut index = MatchIndex::build(&second);
    ctx.reset(second.len());
    assert_eq!(do_parse(&second, &mut index, &mut ctx, 1, &opts, None), 1);
}

/// A chain of `n` interior words, each offering `copies` interchangeable
/// disjuncts, between a left anchor and a right cap. Linkage count is
/// `copies ^ n`.
fn chain_sentence(interior: usize, copies: usize) -> Sentence {
    let mut sent = Sentence::new();
    let first = sent.push_word();
    sent.add_disjunct(first, &[], &[spec("A")]);
    for _ in 0..interior {
        let w = sent.push_word();
        for _ in 0..copies {
            sent.add_disjunct(w, &[spec("A")], &[spec("A")]);
        }
    }
    let last = sent.push_word();
    sent.add_disjunct(last, &[spec("A")], &[]);
    sent
}

#[test]
fn counts_saturate_at_i32_max() {
    // 2^32 linkages: beyond the sentinel, reported as exactly i32::MAX.
    let sent = chain_sentence(32, 2);
    assert_eq!(count(&sent, 0, &ParseOptions::default()), COUNT_SATURATION);
}

#[test]
fn saturation_is_closed_under_more_disjuncts() {
    let mut sent = chain_sentence(32, 2);
    // One extra interchangeable disjunct can only add linkages.
    sent.add_disjunct(1, &[spec("A")], &[spec("A")]);
    assert_eq!(count(&sent, 0, &ParseOptions::default()), COUNT_SATURATION);
}

#[test]
fn chain_counts_are_exact_below_saturation() {
    let sent = chain_sentence(10, 2);
    assert_eq!(count(&sent, 0, &ParseOptions::default()), 1 << 10);
    let wide = chain_sentence(4, 3);
    assert_eq!(count(&wide, 0, &ParseOptions::default()), 81);
}
