use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Add;
use std::sync::Arc;

use super::check::Check;
use super::confrontation::Confrontation;
use super::dataset::Dataset;
use super::error::{ConfrontError, RuleSetError};
use super::options::ConfrontOptions;
use super::reference::References;
use super::rule::Rule;

/// Builder for constructing a [`RuleSet`].
///
/// # Example
///
/// ```
/// use confront::{RuleSetBuilder, in_range, is_unique_key, not_missing};
///
/// let rules = RuleSetBuilder::new()
///     .rule("pid_present", |r| r.check(not_missing("pid")))
///     .rule("age_range", |r| {
///         r.check(in_range("age", 18, 95)).description("Adults up to 95")
///     })
///     .rule("one_visit_per_day", |r| r.check(is_unique_key(["visit_date"]).by(["pid"])))
///     .build()
///     .unwrap();
/// assert_eq!(rules.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<(String, RuleBuilder)>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    check: Option<Check>,
    description: Option<String>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. The closure must call `.check(..)` to set its body.
    ///
    /// If `.check()` is not called, [`build()`](Self::build) fails with
    /// [`RuleSetError::MissingCheck`].
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder::default());
        self.rules.push((name.to_owned(), builder));
        self
    }

    /// Build the immutable `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError::MissingCheck`] or
    /// [`RuleSetError::DuplicateRuleName`].
    pub fn build(self) -> Result<RuleSet, RuleSetError> {
        let rules = self
            .rules
            .into_iter()
            .map(|(name, builder)| {
                let check = builder
                    .check
                    .ok_or_else(|| RuleSetError::MissingCheck { rule: name.clone() })?;
                Ok(Arc::new(Rule {
                    name,
                    description: builder.description,
                    check,
                }))
            })
            .collect::<Result<Vec<_>, RuleSetError>>()?;
        crate::compile::compile(rules)
    }
}

impl RuleBuilder {
    /// Set the body of this rule.
    #[must_use]
    pub fn check(mut self, check: impl Into<Check>) -> Self {
        self.check = Some(check.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
}

/// Selects a rule by position or by name in [`RuleSet::subset()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for RuleSelector {
    fn from(i: usize) -> Self {
        RuleSelector::Index(i)
    }
}

impl From<&str> for RuleSelector {
    fn from(name: &str) -> Self {
        RuleSelector::Name(name.to_owned())
    }
}

impl From<String> for RuleSelector {
    fn from(name: String) -> Self {
        RuleSelector::Name(name)
    }
}

impl fmt::Display for RuleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSelector::Index(i) => write!(f, "#{i}"),
            RuleSelector::Name(name) => write!(f, "{name}"),
        }
    }
}

/// One row of a rule table: a name, a rule expression, and a description.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleRecord {
    pub name: String,
    pub rule: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

impl RuleRecord {
    pub fn new(name: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule: rule.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered, immutable collection of uniquely named rules.
///
/// Thread-safe and cheap to clone: rules are shared between a set and every
/// set derived from it by [`subset`](Self::subset) or [`union`](Self::union).
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<Arc<Rule>>,
    pub(crate) index: HashMap<String, usize>,
}

impl RuleSet {
    /// Build a rule set from rules in order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError::DuplicateRuleName`] if two rules share a name.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Result<Self, RuleSetError> {
        crate::compile::compile(rules.into_iter().map(Arc::new).collect())
    }

    /// Parse a rule table, as loaded by a collaborator from a spreadsheet or
    /// rule file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError::UnparsableRule`] for an empty name, an unknown
    /// predicate or malformed arguments, and
    /// [`RuleSetError::DuplicateRuleName`] for repeated names.
    pub fn from_table(records: impl IntoIterator<Item = RuleRecord>) -> Result<Self, RuleSetError> {
        let rules = records
            .into_iter()
            .map(|record| {
                if record.name.trim().is_empty() {
                    return Err(RuleSetError::UnparsableRule {
                        rule: record.name,
                        message: "rule name is empty".to_owned(),
                    });
                }
                let check = crate::parse::parse_check(&record.rule).map_err(|message| {
                    RuleSetError::UnparsableRule {
                        rule: record.name.clone(),
                        message,
                    }
                })?;
                Ok(Arc::new(Rule {
                    name: record.name.trim().to_owned(),
                    description: record.description,
                    check,
                }))
            })
            .collect::<Result<Vec<_>, RuleSetError>>()?;
        crate::compile::compile(rules)
    }

    /// Parse DSL text into a `RuleSet`.
    ///
    /// ```text
    /// # demographics
    /// rule age_range "Adults up to 95":
    ///     inRange(age, 18, 95)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on a syntax error or duplicate names.
    pub fn from_dsl(input: &str) -> Result<Self, crate::Error> {
        let parsed = crate::parse::parse(input)?;
        let ruleset = crate::compile::compile(parsed.rules.into_iter().map(Arc::new).collect())?;
        Ok(ruleset)
    }

    /// A new rule set holding the selected rules, in this set's order.
    /// Selecting a rule more than once selects it once.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError::UnknownRule`] for an out-of-bounds index or an
    /// absent name.
    pub fn subset<S: Into<RuleSelector>>(
        &self,
        selectors: impl IntoIterator<Item = S>,
    ) -> Result<Self, RuleSetError> {
        let mut picked = BTreeSet::new();
        for selector in selectors {
            let selector = selector.into();
            let idx = match &selector {
                RuleSelector::Index(i) if *i < self.rules.len() => Some(*i),
                RuleSelector::Index(_) => None,
                RuleSelector::Name(name) => self.index.get(name).copied(),
            };
            let idx = idx.ok_or_else(|| RuleSetError::UnknownRule {
                selector: selector.to_string(),
            })?;
            picked.insert(idx);
        }
        crate::compile::compile(picked.into_iter().map(|i| Arc::clone(&self.rules[i])).collect())
    }

    /// All rules of `self` followed by all rules of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError::DuplicateRuleName`] listing every name the two
    /// sets share.
    pub fn union(&self, other: &RuleSet) -> Result<Self, RuleSetError> {
        crate::compile::union(self, other)
    }

    /// Confront `dataset` with these rules using default options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfrontError::MissingReference`] if a rule needs a reference
    /// absent from `references`.
    pub fn confront(
        &self,
        dataset: &Dataset,
        references: &References,
    ) -> Result<Confrontation, ConfrontError> {
        crate::evaluate::confront_with(dataset, self, references, &ConfrontOptions::default())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.index.get(name).map(|&i| self.rules[i].as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Every dataset column referenced by any rule, sorted and deduplicated.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.rules.iter().flat_map(|r| r.columns()).collect();
        set.into_iter().collect()
    }

    /// Every reference name needed by any rule, sorted and deduplicated.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.rules.iter().filter_map(|r| r.reference()).collect();
        set.into_iter().collect()
    }
}

impl Add for &RuleSet {
    type Output = Result<RuleSet, RuleSetError>;

    fn add(self, other: &RuleSet) -> Self::Output {
        self.union(other)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({} rules)", self.rules.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{all_unique, column, in_codelist, in_range, not_missing, Strategy};

    fn demo() -> RuleSet {
        RuleSetBuilder::new()
            .rule("pid_present", |r| r.check(not_missing("pid")))
            .rule("age_range", |r| r.check(in_range("age", 18, 95)))
            .rule("sex_code", |r| r.check(in_codelist("sex", "sex_codes")))
            .rule("pid_unique", |r| r.check(all_unique(["pid"])))
            .build()
            .unwrap()
    }

    #[test]
    fn builder_collects_rules_in_order() {
        let rules = demo();
        assert_eq!(
            rules.names(),
            vec!["pid_present", "age_range", "sex_code", "pid_unique"]
        );
        assert_eq!(
            rules.get("pid_unique").map(Rule::strategy),
            Some(Strategy::WholeDataset)
        );
    }

    #[test]
    fn builder_rule_without_check_returns_error() {
        let result = RuleSetBuilder::new().rule("bad_rule", |r| r).build();
        assert!(matches!(
            result,
            Err(RuleSetError::MissingCheck { rule }) if rule == "bad_rule"
        ));
    }

    #[test]
    fn builder_keeps_description() {
        let rules = RuleSetBuilder::new()
            .rule("r", |r| r.check(not_missing("x")).description("x is required"))
            .build()
            .unwrap();
        assert_eq!(rules.get("r").unwrap().description(), Some("x is required"));
    }

    #[test]
    fn subset_by_name_and_index_keeps_set_order() {
        let rules = demo();
        let picked = rules.subset(vec![
            RuleSelector::from("pid_unique"),
            RuleSelector::from(0),
        ]);
        assert_eq!(picked.unwrap().names(), vec!["pid_present", "pid_unique"]);
    }

    #[test]
    fn subset_repeated_selector_selects_once() {
        let picked = demo().subset(["age_range", "age_range"]).unwrap();
        assert_eq!(picked.names(), vec!["age_range"]);
    }

    #[test]
    fn subset_unknown_name() {
        let err = demo().subset(["nope"]).unwrap_err();
        assert_eq!(
            err,
            RuleSetError::UnknownRule {
                selector: "nope".into()
            }
        );
    }

    #[test]
    fn subset_index_out_of_bounds() {
        let err = demo().subset([4_usize]).unwrap_err();
        assert_eq!(
            err,
            RuleSetError::UnknownRule {
                selector: "#4".into()
            }
        );
    }

    #[test]
    fn subset_leaves_original_untouched() {
        let rules = demo();
        let _ = rules.subset([1_usize]).unwrap();
        assert_eq!(rules.len(), 4);
    }

    #[test]
    fn add_operator_is_union() {
        let a = demo().subset([0_usize, 1]).unwrap();
        let b = demo().subset([2_usize, 3]).unwrap();
        let both = (&a + &b).unwrap();
        assert_eq!(both.names(), demo().names());
    }

    #[test]
    fn columns_and_references() {
        let rules = RuleSetBuilder::new()
            .rule("a", |r| r.check(column("start").lte(column("end"))))
            .rule("b", |r| r.check(in_codelist("sex", "sex_codes")))
            .rule("c", |r| r.check(not_missing("end")))
            .build()
            .unwrap();
        assert_eq!(rules.columns(), vec!["end", "sex", "start"]);
        assert_eq!(rules.references(), vec!["sex_codes"]);
    }

    #[test]
    fn from_table_rejects_empty_name() {
        let err = RuleSet::from_table([RuleRecord::new("  ", "notMissing(x)")]).unwrap_err();
        assert!(matches!(err, RuleSetError::UnparsableRule { .. }));
    }

    #[test]
    fn display() {
        assert_eq!(demo().to_string(), "RuleSet(4 rules)");
    }
}
