//! Rule-based validation of tabular data.
//!
//! A [`RuleSet`] of named checks is confronted with a column-oriented
//! [`Dataset`] and optional [`References`] (codelists and templates). The
//! result is a [`Confrontation`] holding one ordered sequence of
//! [`Outcome`]s per rule: `pass`, `fail`, `na` when a needed value is
//! missing, or `error` when the rule itself could not be evaluated.
//!
//! ```
//! use confront::{column, in_range, not_missing, Column, Dataset, References, RuleSetBuilder};
//!
//! let dataset = Dataset::new([
//!     Column::int("pid", [Some(1), Some(2), Some(3)]),
//!     Column::int("age", [Some(99), Some(40), None]),
//! ])
//! .unwrap();
//!
//! let rules = RuleSetBuilder::new()
//!     .rule("age_range", |r| r.check(in_range("age", 18, 95)))
//!     .rule("age_present", |r| r.check(not_missing("age")))
//!     .rule("pid_positive", |r| r.check(column("pid").gt(0)))
//!     .build()
//!     .unwrap();
//!
//! let result = rules.confront(&dataset, &References::new()).unwrap();
//! assert_eq!(result.summary()[0].fails, 1);
//! assert_eq!(result.violating_row_indices(), vec![0, 2]);
//! ```

mod compile;
mod error;
mod evaluate;
mod group;
mod parse;
mod types;

pub use error::Error;
pub use evaluate::{confront, confront_with};
pub use parse::{parse, ParseError, ParsedRuleSet};
pub use types::{
    all_complete, all_unique, column, conditional, contains_exactly, in_codelist,
    in_linear_sequence, in_range, in_range_strict, is_unique_key, not_missing, type_is, AllUnique,
    Cell, Check, Column, ColumnKind, ColumnRef, CompareOp, ConfrontError, ConfrontOptions,
    Confrontation, ContainsExactly, Dataset, DatasetError, IntoOperand, LinearSequence, Operand,
    Outcome, Reference, References, RowCheck, Rule, RuleBuilder, RuleOutcomes, RuleRecord,
    RuleSelector, RuleSet, RuleSetBuilder, RuleSetError, RuleSummary, Strategy, Tally, UniqueKey,
    Unit, Value, ValueKind, DEFAULT_TOLERANCE,
};
