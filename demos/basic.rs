use confront::{column, in_range, is_unique_key, not_missing, Column, Dataset, References, RuleSetBuilder};

fn main() {
    // Define rules
    let rules = RuleSetBuilder::new()
        .rule("pid_present", |r| r.check(not_missing("pid")))
        .rule("age_range", |r| {
            r.check(in_range("age", 18, 95)).description("Adults up to 95")
        })
        .rule("weight_plausible", |r| r.check(column("weight").lt(250.0)))
        .rule("one_record_per_visit", |r| {
            r.check(is_unique_key(["visit"]).by(["pid"]))
        })
        .build()
        .expect("failed to build rule set");

    println!("{rules}");

    // Confront a small dataset
    let dataset = Dataset::new([
        Column::int("pid", [Some(1), Some(1), Some(2), Some(3)]),
        Column::int("visit", [Some(1), Some(1), Some(1), Some(1)]),
        Column::int("age", [Some(99), Some(99), Some(40), None]),
        Column::float("weight", [Some(80.5), Some(80.5), Some(310.0), Some(64.0)]),
    ])
    .expect("columns share one length");

    let result = rules
        .confront(&dataset, &References::new())
        .expect("no references needed");

    print!("{result}");
    println!("violating rows: {:?}", result.violating_row_indices());
}
