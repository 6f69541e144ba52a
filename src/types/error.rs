use thiserror::Error;

/// Errors raised while building or reading a [`Dataset`](super::Dataset).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    InconsistentColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{column}'")]
    DuplicateColumn { column: String },

    #[error("column '{column}' row {row}: value does not match declared kind {expected}")]
    KindMismatch {
        column: String,
        row: usize,
        expected: String,
    },

    #[error("row {row} out of bounds for dataset with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },
}

/// Errors raised while building, parsing or composing a
/// [`RuleSet`](super::RuleSet).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleSetError {
    #[error("unknown rule '{selector}'")]
    UnknownRule { selector: String },

    #[error("duplicate rule name(s): {}", names.join(", "))]
    DuplicateRuleName { names: Vec<String> },

    #[error("cannot parse rule '{rule}': {message}")]
    UnparsableRule { rule: String, message: String },

    #[error("rule '{rule}' has no check; call `.check(..)` in its definition")]
    MissingCheck { rule: String },
}

/// Errors raised by [`confront`](crate::confront) before any rule is
/// evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfrontError {
    #[error("rule '{rule}' needs reference '{reference}', which was not supplied")]
    MissingReference { rule: String, reference: String },
}
