use std::env;

use anyhow::{Context, Result};
use linkgram_count::{CountContext, do_parse, first_parsable_null_count};
use linkgram_match::MatchIndex;
use linkgram_types::{ConnectorSpec, ParseOptions, Sentence};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let max_nulls: usize = match env::args().nth(1) {
        Some(raw) => raw
            .parse()
            .context("usage: cargo run -p linkgram-count --example counts -- [max-null-count]")?,
        None => 3,
    };

    // "the dog ran home", with an optional object attachment on "ran":
    // parsable with zero nulls through the transitive disjunct, or with
    // one null when "ran" stays intransitive and "home" goes unlinked.
    let mut sent = Sentence::new();
    let the = sent.push_word();
    let dog = sent.push_word();
    let ran = sent.push_word();
    let home = sent.push_word();
    sent.add_disjunct(the, &[], &[ConnectorSpec::new("D", "")]);
    sent.add_disjunct(
        dog,
        &[ConnectorSpec::new("D", "")],
        &[ConnectorSpec::new("S", "")],
    );
    sent.add_disjunct(ran, &[ConnectorSpec::new("S", "")], &[]);
    sent.add_disjunct(
        ran,
        &[ConnectorSpec::new("S", "")],
        &[ConnectorSpec::new("O", "")],
    );
    sent.add_disjunct(home, &[ConnectorSpec::new("O", "")], &[]);

    let opts = ParseOptions {
        max_null_count: max_nulls,
        ..ParseOptions::default()
    };
    let mut index = MatchIndex::build(&sent);
    let mut ctx = CountContext::new(sent.len());

    println!("Words        : {}", sent.len());
    println!("Disjuncts    : {}", sent.disjunct_count());
    println!("Connectors   : {}", sent.connector_count());

    for nulls in 0..=max_nulls {
        let total = do_parse(&sent, &mut index, &mut ctx, nulls, &opts, None);
        println!(
            "Linkages with {nulls} null(s): {total}{}",
            if ctx.exhausted() { " (truncated)" } else { "" }
        );
    }
    println!("Memo entries : {}", ctx.memo_entries());

    ctx.reset(sent.len());
    match first_parsable_null_count(&sent, &mut index, &mut ctx, &opts, None) {
        Some((nulls, total)) => {
            println!("First parsable null count: {nulls} ({total} linkage(s))");
        }
        None => println!("No parse up to {max_nulls} null(s)"),
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
