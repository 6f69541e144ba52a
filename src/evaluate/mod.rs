//! Confrontation: evaluating a [`RuleSet`] against a [`Dataset`].
//!
//! Each rule is dispatched to the evaluator for its [`Strategy`]. A fault
//! while evaluating one rule becomes an [`Outcome::Error`] for every unit of
//! that rule and never aborts the remaining rules.

mod grouped;
mod row;

use std::thread;

use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::{
    Check, CompareOp, ConfrontError, ConfrontOptions, Confrontation, Dataset, DatasetError,
    Outcome, References, Rule, RuleOutcomes, RuleSet, Strategy, Tally,
};

/// A fault that prevents a single rule from being evaluated.
#[derive(Debug, Error)]
pub(crate) enum Fault {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("reference '{name}' is a {found}, expected a {expected}")]
    ReferenceKind {
        name: String,
        found: &'static str,
        expected: &'static str,
    },

    #[error("cannot compare {left} with {right} (column '{column}')")]
    Incomparable {
        column: String,
        left: String,
        right: String,
    },

    #[error("logical column '{column}' only supports == and !=, not {op}")]
    Unordered { column: String, op: CompareOp },

    #[error("column '{column}' holds {value}; sequences need integers or dates")]
    NotSequential { column: String, value: String },
}

/// Everything a rule may read while it is evaluated.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Env<'a> {
    pub(crate) dataset: &'a Dataset,
    pub(crate) references: &'a References,
    pub(crate) tolerance: f64,
}

/// Confront `dataset` with `rules` using default options.
///
/// # Errors
///
/// Returns [`ConfrontError::MissingReference`] if a rule needs a reference
/// absent from `references`. Faults inside individual rules are reported as
/// [`Outcome::Error`] instead.
pub fn confront(
    dataset: &Dataset,
    rules: &RuleSet,
    references: &References,
) -> Result<Confrontation, ConfrontError> {
    confront_with(dataset, rules, references, &ConfrontOptions::default())
}

/// Confront `dataset` with `rules` using the given options.
///
/// # Errors
///
/// Returns [`ConfrontError::MissingReference`] if a rule needs a reference
/// absent from `references`.
pub fn confront_with(
    dataset: &Dataset,
    rules: &RuleSet,
    references: &References,
    options: &ConfrontOptions,
) -> Result<Confrontation, ConfrontError> {
    check_references(rules, references)?;

    let span = info_span!(
        "confront",
        rules = rules.len(),
        rows = dataset.row_count(),
        threads = options.threads.get()
    );
    let _enter = span.enter();

    let env = Env {
        dataset,
        references,
        tolerance: options.tolerance,
    };

    let threads = options.threads.get().min(rules.len());
    let entries = if threads > 1 {
        evaluate_parallel(&rules.rules, env, options, threads)
    } else {
        rules
            .iter()
            .map(|rule| evaluate_rule(rule, env, options))
            .collect()
    };

    let confrontation = Confrontation::new(dataset.clone(), entries);
    let total = confrontation.tally();
    info!(
        units = total.units,
        passes = total.passes,
        fails = total.fails,
        nas = total.nas,
        errors = total.errors,
        "confrontation complete"
    );
    Ok(confrontation)
}

fn check_references(rules: &RuleSet, references: &References) -> Result<(), ConfrontError> {
    for rule in rules.iter() {
        if let Some(reference) = rule.reference() {
            if !references.contains(reference) {
                return Err(ConfrontError::MissingReference {
                    rule: rule.name().to_owned(),
                    reference: reference.to_owned(),
                });
            }
        }
    }
    Ok(())
}

/// Spread rules over scoped workers in contiguous chunks; chunks are joined
/// back in order so the result matches sequential evaluation.
fn evaluate_parallel(
    rules: &[std::sync::Arc<Rule>],
    env: Env<'_>,
    options: &ConfrontOptions,
    threads: usize,
) -> Vec<RuleOutcomes> {
    let chunk = rules.len().div_ceil(threads);
    let span = tracing::Span::current();
    thread::scope(|scope| {
        let handles: Vec<_> = rules
            .chunks(chunk)
            .map(|batch| {
                let span = span.clone();
                scope.spawn(move || {
                    let _enter = span.enter();
                    batch
                        .iter()
                        .map(|rule| evaluate_rule(rule, env, options))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

fn evaluate_rule(rule: &Rule, env: Env<'_>, options: &ConfrontOptions) -> RuleOutcomes {
    let strategy = rule.strategy();
    let outcomes = match dispatch(rule.check(), env) {
        Ok(outcomes) => outcomes,
        Err(fault) => {
            warn!(rule = rule.name(), error = %fault, "rule could not be evaluated");
            let units = match strategy {
                Strategy::WholeDataset => 1,
                _ => env.dataset.row_count(),
            };
            vec![Outcome::Error(fault.to_string().into()); units]
        }
    };
    let entry = RuleOutcomes::new(rule.name().to_owned(), strategy, outcomes);
    log_entry(rule, &entry.tally(), options);
    entry
}

fn log_entry(rule: &Rule, tally: &Tally, options: &ConfrontOptions) {
    if options.log_rule_details {
        debug!(
            rule = rule.name(),
            check = %rule.check(),
            strategy = %rule.strategy(),
            units = tally.units,
            passes = tally.passes,
            fails = tally.fails,
            nas = tally.nas,
            errors = tally.errors,
            "rule evaluated"
        );
    } else {
        debug!(rule = rule.name(), fails = tally.fails, "rule evaluated");
    }
}

fn dispatch(check: &Check, env: Env<'_>) -> Result<Vec<Outcome>, Fault> {
    match check {
        Check::Row(c) => row::evaluate(c, env),
        Check::UniqueKey(c) => grouped::unique_key(c, env),
        Check::AllUnique(c) => grouped::all_unique(c, env),
        Check::LinearSequence(c) => grouped::linear_sequence(c, env),
        Check::ContainsExactly(c) => grouped::contains_exactly(c, env),
    }
}

/// Resolve a list of column names against the dataset.
pub(crate) fn resolve<'a>(
    dataset: &'a Dataset,
    names: &[String],
) -> Result<Vec<&'a crate::Column>, Fault> {
    names
        .iter()
        .map(|name| dataset.column(name).map_err(Fault::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{in_codelist, in_range, not_missing, Column, RuleSetBuilder};

    fn ages() -> Dataset {
        Dataset::new([
            Column::int("pid", [Some(1), Some(2), Some(3)]),
            Column::int("age", [Some(99), Some(40), None]),
        ])
        .unwrap()
    }

    #[test]
    fn one_entry_per_rule_in_order() {
        let rules = RuleSetBuilder::new()
            .rule("b", |r| r.check(not_missing("age")))
            .rule("a", |r| r.check(in_range("age", 18, 95)))
            .build()
            .unwrap();
        let result = confront(&ages(), &rules, &References::new()).unwrap();
        let names: Vec<&str> = result.iter().map(RuleOutcomes::name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn missing_reference_fails_fast() {
        let rules = RuleSetBuilder::new()
            .rule("sex_code", |r| r.check(in_codelist("sex", "sex_codes")))
            .build()
            .unwrap();
        let err = confront(&ages(), &rules, &References::new()).unwrap_err();
        assert_eq!(
            err,
            ConfrontError::MissingReference {
                rule: "sex_code".into(),
                reference: "sex_codes".into(),
            }
        );
    }

    #[test]
    fn unknown_column_becomes_error_outcomes() {
        let rules = RuleSetBuilder::new()
            .rule("weight", |r| r.check(not_missing("weight")))
            .rule("age", |r| r.check(not_missing("age")))
            .build()
            .unwrap();
        let result = confront(&ages(), &rules, &References::new()).unwrap();
        let weight = result.outcomes_for("weight").unwrap();
        assert_eq!(weight.len(), 3);
        assert!(weight.iter().all(Outcome::is_error));
        assert_eq!(
            result.outcomes_for("age").unwrap(),
            &[Outcome::Pass, Outcome::Pass, Outcome::Fail]
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let rules = RuleSetBuilder::new()
            .rule("r1", |r| r.check(not_missing("age")))
            .rule("r2", |r| r.check(in_range("age", 18, 95)))
            .rule("r3", |r| r.check(not_missing("nope")))
            .rule("r4", |r| r.check(in_range("pid", 1, 2)))
            .rule("r5", |r| r.check(not_missing("pid")))
            .build()
            .unwrap();
        let refs = References::new();
        let seq = confront(&ages(), &rules, &refs).unwrap();
        let par = confront_with(&ages(), &rules, &refs, &ConfrontOptions::parallel(3)).unwrap();
        assert_eq!(seq, par);
    }
}
