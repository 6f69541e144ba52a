mod check;
mod column;
mod confrontation;
mod dataset;
mod error;
mod options;
mod outcome;
mod reference;
mod rule;
mod ruleset;
mod value;

pub use check::{
    all_complete, all_unique, column, conditional, contains_exactly, in_codelist,
    in_linear_sequence, in_range, in_range_strict, is_unique_key, not_missing, type_is, AllUnique,
    Check, ColumnRef, CompareOp, ContainsExactly, IntoOperand, LinearSequence, Operand, RowCheck,
    Strategy, UniqueKey,
};
pub use column::{Column, ColumnKind};
pub use confrontation::{Confrontation, RuleOutcomes, RuleSummary};
pub use dataset::Dataset;
pub use error::{ConfrontError, DatasetError, RuleSetError};
pub use options::{ConfrontOptions, DEFAULT_TOLERANCE};
pub use outcome::{Outcome, Tally, Unit};
pub use reference::{Reference, References};
pub use rule::Rule;
pub use ruleset::{RuleBuilder, RuleRecord, RuleSelector, RuleSet, RuleSetBuilder};
pub use value::{Cell, Value, ValueKind};
