use std::collections::HashMap;
use std::fmt;

use super::check::Strategy;
use super::dataset::Dataset;
use super::outcome::{Outcome, Tally, Unit};

/// Outcomes of one rule, aligned to its evaluation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcomes {
    name: String,
    strategy: Strategy,
    outcomes: Vec<Outcome>,
    tally: Tally,
}

impl RuleOutcomes {
    pub(crate) fn new(name: String, strategy: Strategy, outcomes: Vec<Outcome>) -> Self {
        let tally = Tally::of(&outcomes);
        Self {
            name,
            strategy,
            outcomes,
            tally,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn unit(&self) -> Unit {
        match self.strategy {
            Strategy::WholeDataset => Unit::Dataset,
            Strategy::RowWise | Strategy::Grouped | Strategy::Template => Unit::Row,
        }
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// The error message, if this rule could not be evaluated.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.outcomes.iter().find_map(|o| match o {
            Outcome::Error(message) => Some(message.as_ref()),
            _ => None,
        })
    }
}

/// One line of [`Confrontation::summary()`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleSummary {
    pub rule: String,
    pub unit: Unit,
    pub units: usize,
    pub passes: usize,
    pub fails: usize,
    pub nas: usize,
    pub errors: usize,
}

/// The immutable result of confronting a dataset with a rule set.
///
/// Entries follow the rule set's order regardless of how evaluation was
/// scheduled.
#[derive(Debug, Clone)]
#[must_use]
pub struct Confrontation {
    dataset: Dataset,
    entries: Vec<RuleOutcomes>,
    index: HashMap<String, usize>,
}

impl Confrontation {
    pub(crate) fn new(dataset: Dataset, entries: Vec<RuleOutcomes>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self {
            dataset,
            entries,
            index,
        }
    }

    /// Outcome counts per rule, in rule set order.
    #[must_use]
    pub fn summary(&self) -> Vec<RuleSummary> {
        self.entries
            .iter()
            .map(|e| RuleSummary {
                rule: e.name.clone(),
                unit: e.unit(),
                units: e.tally.units,
                passes: e.tally.passes,
                fails: e.tally.fails,
                nas: e.tally.nas,
                errors: e.tally.errors,
            })
            .collect()
    }

    /// Outcomes of the named rule, or `None` if no such rule was confronted.
    #[must_use]
    pub fn outcomes_for(&self, rule: &str) -> Option<&[Outcome]> {
        self.get(rule).map(RuleOutcomes::outcomes)
    }

    #[must_use]
    pub fn get(&self, rule: &str) -> Option<&RuleOutcomes> {
        self.index.get(rule).map(|&i| &self.entries[i])
    }

    /// Indices of rows with at least one `fail` from a row-unit rule, ascending.
    #[must_use]
    pub fn violating_row_indices(&self) -> Vec<usize> {
        let mut violating = vec![false; self.dataset.row_count()];
        for entry in self.entries.iter().filter(|e| e.unit() == Unit::Row) {
            for (row, outcome) in entry.outcomes.iter().enumerate() {
                if outcome.is_fail() {
                    violating[row] = true;
                }
            }
        }
        violating
            .iter()
            .enumerate()
            .filter_map(|(row, &v)| v.then_some(row))
            .collect()
    }

    /// The sub-dataset of violating rows, in row order.
    #[must_use]
    pub fn violating_rows(&self) -> Dataset {
        self.dataset.select_rows(&self.violating_row_indices())
    }

    /// `(rule, message)` for every rule that could not be evaluated.
    #[must_use]
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.error().map(|m| (e.name.as_str(), m)))
            .collect()
    }

    /// True if every outcome of every rule is `pass`.
    #[must_use]
    pub fn all_pass(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.tally.passes == e.tally.units)
    }

    /// Outcome counts summed over all rules.
    pub fn tally(&self) -> Tally {
        self.entries
            .iter()
            .fold(Tally::default(), |acc, e| acc.add(e.tally))
    }

    /// The confronted dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleOutcomes> {
        self.entries.iter()
    }
}

impl PartialEq for Confrontation {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.dataset == other.dataset
    }
}

impl fmt::Display for Confrontation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
            .max("rule".len());
        writeln!(
            f,
            "{:<width$}  {:>7}  {:>6}  {:>6}  {:>6}  {:>6}",
            "rule", "units", "pass", "fail", "na", "error"
        )?;
        for e in &self.entries {
            let t = e.tally;
            writeln!(
                f,
                "{:<width$}  {:>7}  {:>6}  {:>6}  {:>6}  {:>6}",
                e.name, t.units, t.passes, t.fails, t.nas, t.errors
            )?;
        }
        Ok(())
    }
}
