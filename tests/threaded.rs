use std::sync::Arc;
use std::thread;

use confront::{
    confront, confront_with, in_codelist, in_range, is_unique_key, not_missing, Column,
    ConfrontOptions, Dataset, References, RuleSetBuilder,
};

#[test]
fn confront_across_threads() {
    let rules = Arc::new(
        RuleSetBuilder::new()
            .rule("age_range", |r| r.check(in_range("age", 18, 95)))
            .rule("sex_code", |r| r.check(in_codelist("sex", "sex_codes")))
            .rule("pid_present", |r| r.check(not_missing("pid")))
            .build()
            .unwrap(),
    );
    let refs = Arc::new(References::new().codelist("sex_codes", ["F", "M"]));

    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let rules = Arc::clone(&rules);
            let refs = Arc::clone(&refs);
            thread::spawn(move || {
                let ds = Dataset::new([
                    Column::int("pid", [Some(i)]),
                    Column::int("age", [Some(10 + i * 20)]),
                    Column::text("sex", [Some(if i % 2 == 0 { "F" } else { "X" })]),
                ])
                .unwrap();
                confront(&ds, &rules, &refs).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let fails: Vec<usize> = results.iter().map(|r| r.tally().fails).collect();
    // ages 10, 30, 50, 70; odd threads carry an unknown sex code
    assert_eq!(fails, vec![1, 1, 0, 1]);
}

#[test]
fn shared_dataset_parallel_rules() {
    let ds = Dataset::new([
        Column::int("pid", (0..1_000).map(|i| Some(i / 10))),
        Column::int("visit", (0..1_000).map(|i| Some(i % 10 + 1))),
        Column::int("age", (0..1_000).map(|i| Some(i % 100))),
    ])
    .unwrap();

    let mut builder = RuleSetBuilder::new();
    for i in 0..24_i64 {
        builder = builder.rule(&format!("age_{i}"), move |r| {
            r.check(in_range("age", i, 90 + i))
        });
    }
    let rules = builder
        .rule("unique_visit", |r| r.check(is_unique_key(["visit"]).by(["pid"])))
        .build()
        .unwrap();

    let refs = References::new();
    let seq = confront(&ds, &rules, &refs).unwrap();
    for threads in [2, 3, 8, 64] {
        let par = confront_with(&ds, &rules, &refs, &ConfrontOptions::parallel(threads)).unwrap();
        assert_eq!(seq, par, "threads = {threads}");
    }
    assert_eq!(seq.get("unique_visit").unwrap().tally().passes, 1_000);
}

#[test]
fn results_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dataset>();
    assert_send_sync::<confront::RuleSet>();
    assert_send_sync::<References>();
    assert_send_sync::<confront::Confrontation>();
}
