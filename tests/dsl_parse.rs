use confront::{confront, Column, Dataset, Error, Outcome, References, RuleSet};

fn trial() -> Dataset {
    Dataset::new([
        Column::int("pid", [Some(1), Some(1), Some(2), Some(2)]),
        Column::int("visit", [Some(1), Some(2), Some(1), Some(1)]),
        Column::int("age", [Some(30), Some(30), Some(99), None]),
        Column::text("sex", [Some("F"), Some("F"), Some("M"), Some("Q")]),
    ])
    .unwrap()
}

#[test]
fn dsl_parse_and_confront() {
    let dsl = r#"
# Demographics
rule age_range "Adults up to 95":
    inRange(age, 18, 95)

rule sex_code:
    inCodelist(sex, sex_codes)

# Visits
rule unique_visit:
    isUniqueKey(visit, by = pid)

rule visit_order:
    inLinearSequence(visit, begin = 1, by = pid)
"#;

    let rules = RuleSet::from_dsl(dsl).unwrap();
    assert_eq!(
        rules.names(),
        vec!["age_range", "sex_code", "unique_visit", "visit_order"]
    );
    assert_eq!(
        rules.get("age_range").unwrap().description(),
        Some("Adults up to 95")
    );
    assert_eq!(rules.references(), vec!["sex_codes"]);

    let refs = References::new().codelist("sex_codes", ["F", "M"]);
    let result = confront(&trial(), &rules, &refs).unwrap();

    use Outcome::{Fail, Na, Pass};
    assert_eq!(
        result.outcomes_for("age_range").unwrap(),
        &[Pass, Pass, Fail, Na]
    );
    assert_eq!(
        result.outcomes_for("sex_code").unwrap(),
        &[Pass, Pass, Pass, Fail]
    );
    assert_eq!(
        result.outcomes_for("unique_visit").unwrap(),
        &[Pass, Pass, Fail, Fail]
    );
    assert_eq!(
        result.outcomes_for("visit_order").unwrap(),
        &[Pass, Pass, Pass, Pass]
    );
}

#[test]
fn dsl_infix_and_conditional() {
    let dsl = r#"
rule adult_if_female:
    conditional(sex, "F", age >= 18)
rule age_cap: inequality(age, <=, 95)
"#;
    let rules = RuleSet::from_dsl(dsl).unwrap();
    let result = confront(&trial(), &rules, &References::new()).unwrap();
    assert_eq!(
        result.outcomes_for("adult_if_female").unwrap(),
        &[Outcome::Pass, Outcome::Pass, Outcome::Pass, Outcome::Pass]
    );
    assert_eq!(result.outcomes_for("age_cap").unwrap()[2], Outcome::Fail);
}

#[test]
fn dsl_date_literals() {
    let dsl = r#"rule recent: visit_date >= date("2024-01-01")"#;
    let rules = RuleSet::from_dsl(dsl).unwrap();
    let ds = Dataset::new([Column::date(
        "visit_date",
        [
            chrono::NaiveDate::from_ymd_opt(2023, 12, 31),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        ],
    )])
    .unwrap();
    let result = confront(&ds, &rules, &References::new()).unwrap();
    assert_eq!(
        result.outcomes_for("recent").unwrap(),
        &[Outcome::Fail, Outcome::Pass]
    );
}

#[test]
fn dsl_syntax_error_has_position() {
    let err = RuleSet::from_dsl("rule a: notMissing(age)\nrule b inRange(age, 1, 2)").unwrap_err();
    match err {
        Error::Parse(e) => assert_eq!(e.line, 2),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn dsl_unknown_predicate() {
    let err = RuleSet::from_dsl("rule a: isPrime(age)").unwrap_err();
    assert!(err.to_string().contains("unknown predicate 'isPrime'"), "{err}");
}

#[test]
fn dsl_duplicate_names() {
    let err = RuleSet::from_dsl("rule a: notMissing(x)\nrule a: notMissing(y)").unwrap_err();
    assert!(matches!(err, Error::RuleSet(_)));
}

#[test]
fn dsl_display_round_trip() {
    let dsl = "rule a: inLinearSequence(visit, begin = 1, end = 5, by = pid)\n\
               rule b: isUniqueKey(visit, by = [pid, site])\n\
               rule c: age <= 95\n";
    let rules = RuleSet::from_dsl(dsl).unwrap();
    let rendered: String = rules
        .iter()
        .map(|r| format!("rule {r}\n"))
        .collect();
    let reparsed = RuleSet::from_dsl(&rendered).unwrap();
    let checks = |set: &RuleSet| set.iter().map(|r| r.check().clone()).collect::<Vec<_>>();
    assert_eq!(checks(&rules), checks(&reparsed));
}

#[test]
fn dsl_rule_keyword_glued_to_name() {
    let err = RuleSet::from_dsl("ruleage: notMissing(x)").unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{err:?}");
}
