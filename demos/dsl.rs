use confront::{Column, Dataset, References, RuleSet};

fn main() {
    let dsl = r#"
# Demographics
rule age_range "Adults up to 95":
    inRange(age, 18, 95)

rule sex_code:
    inCodelist(sex, sex_codes)

# Visits
rule visit_order:
    inLinearSequence(visit, begin = 1, by = pid)

rule visit_after_start:
    visit_date >= date("2024-01-01")
"#;

    let rules = RuleSet::from_dsl(dsl).expect("failed to parse DSL");
    for rule in rules.iter() {
        println!("{rule}");
    }

    let day = |d| chrono::NaiveDate::from_ymd_opt(2024, 1, d);
    let dataset = Dataset::new([
        Column::int("pid", [Some(1), Some(1), Some(2)]),
        Column::int("visit", [Some(1), Some(3), Some(1)]),
        Column::date("visit_date", [day(3), day(20), None]),
        Column::int("age", [Some(34), Some(34), Some(17)]),
        Column::text("sex", [Some("F"), Some("F"), Some("U")]),
    ])
    .expect("columns share one length");
    let references = References::new().codelist("sex_codes", ["F", "M"]);

    let result = rules
        .confront(&dataset, &references)
        .expect("all references supplied");
    print!("{result}");
}
