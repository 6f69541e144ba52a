use thiserror::Error;

use crate::parse::ParseError;
use crate::{ConfrontError, DatasetError, RuleSetError};

/// Unified error type covering parsing, rule set construction, dataset
/// construction and confrontation.
///
/// Returned by convenience methods like
/// [`RuleSet::from_dsl()`](crate::RuleSet::from_dsl).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Confront(#[from] ConfrontError),
}
