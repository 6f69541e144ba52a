use std::sync::Arc;
use std::thread;

use confront::{
    confront_with, in_range, is_unique_key, not_missing, Column, ConfrontOptions, Dataset,
    References, RuleSetBuilder,
};

fn main() {
    let rules = Arc::new(
        RuleSetBuilder::new()
            .rule("age_present", |r| r.check(not_missing("age")))
            .rule("age_range", |r| r.check(in_range("age", 18, 95)))
            .rule("visit_key", |r| r.check(is_unique_key(["visit"]).by(["pid"])))
            .build()
            .expect("failed to build rule set"),
    );
    let references = Arc::new(References::new());

    // One site per thread, each confronting its own extract with the shared rules
    let handles: Vec<_> = (0..4_i64)
        .map(|site| {
            let rules = Arc::clone(&rules);
            let references = Arc::clone(&references);
            thread::spawn(move || {
                let dataset = Dataset::new([
                    Column::int("pid", (0..100).map(|i| Some(site * 1_000 + i / 4))),
                    Column::int("visit", (0..100).map(|i| Some(i % 4 + 1))),
                    Column::int("age", (0..100).map(|i| (i % 9 != 0).then_some(15 + i + site))),
                ])
                .expect("columns share one length");

                // Rules within one call spread over two workers as well
                let options = ConfrontOptions::parallel(2);
                let result = confront_with(&dataset, &rules, &references, &options)
                    .expect("no references needed");
                println!("site {site}: {}", result.tally());
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
