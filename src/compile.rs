use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{Rule, RuleSet, RuleSetError};

/// Index rules by name, rejecting any name that appears more than once.
pub(crate) fn compile(rules: Vec<Arc<Rule>>) -> Result<RuleSet, RuleSetError> {
    check_duplicates(&rules)?;

    let index: HashMap<String, usize> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| (rule.name.clone(), i))
        .collect();

    Ok(RuleSet { rules, index })
}

/// Concatenate two rule sets: all of `a`, then all of `b`.
pub(crate) fn union(a: &RuleSet, b: &RuleSet) -> Result<RuleSet, RuleSetError> {
    let shared: Vec<String> = b
        .rules
        .iter()
        .filter(|r| a.index.contains_key(&r.name))
        .map(|r| r.name.clone())
        .collect();
    if !shared.is_empty() {
        return Err(RuleSetError::DuplicateRuleName { names: shared });
    }
    compile(a.rules.iter().chain(&b.rules).cloned().collect())
}

fn check_duplicates(rules: &[Arc<Rule>]) -> Result<(), RuleSetError> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for rule in rules {
        if !seen.insert(rule.name.as_str()) && !duplicates.contains(&rule.name) {
            duplicates.push(rule.name.clone());
        }
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(RuleSetError::DuplicateRuleName { names: duplicates })
    }
}
