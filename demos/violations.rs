use confront::{
    confront_with, contains_exactly, in_codelist, in_linear_sequence, in_range, Column,
    ConfrontOptions, Dataset, References, RuleSetBuilder,
};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=confront=debug shows one event per rule
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let rules = RuleSetBuilder::new()
        .rule("age_range", |r| r.check(in_range("age", 18, 95)))
        .rule("sex_code", |r| r.check(in_codelist("sex", "sex_codes")))
        .rule("visits_complete", |r| {
            r.check(in_linear_sequence("visit", Some(1.into()), Some(3.into())).by(["pid"]))
        })
        .rule("schedule", |r| r.check(contains_exactly("schedule").by(["pid"])))
        .rule("height_range", |r| r.check(in_range("height", 1.2, 2.2)))
        .build()
        .expect("failed to build rule set");

    let dataset = Dataset::new([
        Column::int("pid", [Some(1), Some(1), Some(1), Some(2), Some(2)]),
        Column::int("visit", [Some(1), Some(2), Some(3), Some(1), Some(3)]),
        Column::int("age", [Some(40), Some(40), Some(40), Some(101), None]),
        Column::text("sex", [Some("F"), Some("F"), Some("F"), Some("M"), Some("?")]),
    ])
    .expect("columns share one length");

    let schedule = Dataset::new([Column::int("visit", [Some(1), Some(2), Some(3)])])
        .expect("one column");
    let references = References::new()
        .codelist("sex_codes", ["F", "M"])
        .template("schedule", schedule);

    let options = ConfrontOptions::available_parallelism().with_rule_details(true);
    let result = confront_with(&dataset, &rules, &references, &options)
        .expect("all references supplied");

    print!("{result}");
    for (rule, message) in result.errors() {
        println!("{rule} could not be evaluated: {message}");
    }
    println!("violating rows:\n{:?}", result.violating_row_indices());
    println!("{}", result.violating_rows());
}
