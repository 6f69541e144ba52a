use confront::{
    all_unique, confront, in_linear_sequence, in_range, is_unique_key, Column, Dataset, Outcome,
    References, RuleSetBuilder, RuleSetError, RuleSummary, Unit, Value,
};

use Outcome::{Fail, Na, Pass};

fn patients() -> Dataset {
    Dataset::new([
        Column::int("pid", [Some(1), Some(2), Some(3)]),
        Column::int("age", [Some(99), Some(40), None]),
    ])
    .unwrap()
}

#[test]
fn end_to_end_age_range() {
    let rules = RuleSetBuilder::new()
        .rule("age_range", |r| r.check(in_range("age", 18, 95)))
        .build()
        .unwrap();
    let result = confront(&patients(), &rules, &References::new()).unwrap();

    assert_eq!(result.outcomes_for("age_range").unwrap(), &[Fail, Pass, Na]);
    assert_eq!(
        result.summary(),
        vec![RuleSummary {
            rule: "age_range".into(),
            unit: Unit::Row,
            units: 3,
            passes: 1,
            fails: 1,
            nas: 1,
            errors: 0,
        }]
    );

    let violating = result.violating_rows();
    assert_eq!(violating.row_count(), 1);
    assert_eq!(violating.get("pid", 0).unwrap(), Some(&Value::Int(1)));
}

#[test]
fn all_unique_flips_on_one_duplicate() {
    let rules = RuleSetBuilder::new()
        .rule("pid_unique", |r| r.check(all_unique(["pid"])))
        .build()
        .unwrap();
    let refs = References::new();

    let unique = confront(&patients(), &rules, &refs).unwrap();
    assert_eq!(unique.outcomes_for("pid_unique").unwrap(), &[Pass]);
    assert_eq!(unique.summary()[0].unit, Unit::Dataset);

    let duplicated = patients()
        .with_column(Column::int("pid", [Some(1), Some(2), Some(1)]))
        .unwrap();
    let result = confront(&duplicated, &rules, &refs).unwrap();
    assert_eq!(result.outcomes_for("pid_unique").unwrap(), &[Fail]);
    // whole-dataset fails mark no rows
    assert!(result.violating_row_indices().is_empty());
}

#[test]
fn unique_key_marks_exactly_the_duplicated_rows() {
    let ds = Dataset::new([Column::int(
        "pid",
        [Some(1), Some(2), Some(1), Some(3), Some(2), None],
    )])
    .unwrap();
    let rules = RuleSetBuilder::new()
        .rule("pid_key", |r| r.check(is_unique_key(["pid"])))
        .build()
        .unwrap();
    let result = confront(&ds, &rules, &References::new()).unwrap();
    assert_eq!(
        result.outcomes_for("pid_key").unwrap(),
        &[Fail, Fail, Fail, Pass, Fail, Na]
    );
    assert_eq!(result.violating_row_indices(), vec![0, 1, 2, 4]);
}

#[test]
fn incomplete_visit_sequence_fails_every_visit() {
    let ds = Dataset::new([
        Column::int("pid", [Some(7), Some(7), Some(7)]),
        Column::int("visit", [Some(1), Some(2), Some(3)]),
    ])
    .unwrap();
    let rules = RuleSetBuilder::new()
        .rule("visits", |r| {
            r.check(
                in_linear_sequence("visit", Some(Value::Int(1)), Some(Value::Int(5))).by(["pid"]),
            )
        })
        .build()
        .unwrap();
    let result = confront(&ds, &rules, &References::new()).unwrap();
    assert_eq!(result.outcomes_for("visits").unwrap(), &[Fail, Fail, Fail]);
}

#[test]
fn union_semantics() {
    let a = RuleSetBuilder::new()
        .rule("x", |r| r.check(in_range("age", 0, 1)))
        .rule("y", |r| r.check(in_range("age", 0, 2)))
        .build()
        .unwrap();
    let b = RuleSetBuilder::new()
        .rule("z", |r| r.check(in_range("age", 0, 3)))
        .build()
        .unwrap();
    let overlapping = RuleSetBuilder::new()
        .rule("y", |r| r.check(in_range("age", 0, 4)))
        .build()
        .unwrap();

    let joined = (&a + &b).unwrap();
    assert_eq!(joined.len(), a.len() + b.len());
    assert_eq!(joined.names(), vec!["x", "y", "z"]);

    assert_eq!(
        a.union(&overlapping).unwrap_err(),
        RuleSetError::DuplicateRuleName {
            names: vec!["y".into()]
        }
    );
}

#[test]
fn one_entry_per_rule_in_rule_set_order() {
    let rules = RuleSetBuilder::new()
        .rule("c", |r| r.check(in_range("age", 0, 1)))
        .rule("a", |r| r.check(all_unique(["pid"])))
        .rule("b", |r| r.check(is_unique_key(["pid"])))
        .build()
        .unwrap();
    let result = confront(&patients(), &rules, &References::new()).unwrap();
    let summary = result.summary();
    let names: Vec<&str> = summary.iter().map(|s| s.rule.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn display_renders_a_summary_table() {
    let rules = RuleSetBuilder::new()
        .rule("age_range", |r| r.check(in_range("age", 18, 95)))
        .build()
        .unwrap();
    let result = confront(&patients(), &rules, &References::new()).unwrap();
    let text = result.to_string();
    assert!(text.lines().next().unwrap().contains("units"));
    assert!(text.contains("age_range"));
}
