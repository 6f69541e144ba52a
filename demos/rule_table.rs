use confront::{Column, Dataset, References, RuleRecord, RuleSet};

fn main() {
    // Rows as a collaborator would keep them in a spreadsheet
    let table = [
        ("pid_unique", "allUnique(pid)", "One row per subject"),
        ("age_range", "inRange(age, 0, 120)", "Plausible age"),
        ("bmi_range", "inRange(bmi, 10, 60, strict = true)", ""),
        ("sex_code", "inCodelist(sex, sex_codes)", "Sex coded F/M"),
    ];
    let records = table.iter().map(|(name, rule, description)| {
        let record = RuleRecord::new(*name, *rule);
        if description.is_empty() {
            record
        } else {
            record.with_description(*description)
        }
    });

    let rules = RuleSet::from_table(records).expect("rule table is valid");
    println!("columns used: {:?}", rules.columns());
    println!("references needed: {:?}", rules.references());

    let dataset = Dataset::new([
        Column::int("pid", [Some(1), Some(2), Some(2)]),
        Column::int("age", [Some(44), Some(130), Some(61)]),
        Column::float("bmi", [Some(22.1), Some(60.0), None]),
        Column::text("sex", [Some("F"), Some("M"), Some("female")]),
    ])
    .expect("columns share one length");
    let references = References::new().codelist("sex_codes", ["F", "M"]);

    let result = rules
        .confront(&dataset, &references)
        .expect("all references supplied");
    for line in result.summary() {
        println!(
            "{:<10} {:>7} unit(s): {} pass, {} fail, {} na, {} error",
            line.rule, line.units, line.passes, line.fails, line.nas, line.errors
        );
    }
}
