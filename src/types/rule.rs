use std::fmt;

use super::check::{Check, Strategy};

/// A named, immutable validation rule.
///
/// Rules are created via [`RuleSetBuilder`](super::RuleSetBuilder), parsed from
/// a rule table with [`RuleSet::from_table()`](super::RuleSet::from_table), or
/// from DSL text with [`RuleSet::from_dsl()`](super::RuleSet::from_dsl).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) check: Check,
}

impl Rule {
    pub fn new(name: impl Into<String>, check: impl Into<Check>) -> Self {
        Self {
            name: name.into(),
            description: None,
            check: check.into(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn check(&self) -> &Check {
        &self.check
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.check.strategy()
    }

    #[must_use]
    pub fn group_by(&self) -> &[String] {
        self.check.group_by()
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.check.reference()
    }

    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.check.columns()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.check)
    }
}
