use std::collections::HashMap;

use super::dataset::Dataset;
use super::value::Value;

/// Auxiliary data a rule can refer to by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// Permitted values of a categorical column.
    Codelist(Vec<Value>),
    /// Expected key tuples per group. The template's column names designate
    /// the dataset columns the tuples are read from.
    Template(Dataset),
}

impl Reference {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Reference::Codelist(_) => "codelist",
            Reference::Template(_) => "template",
        }
    }
}

/// Named references supplied to a single [`confront`](crate::confront) call.
#[derive(Debug, Clone, Default)]
pub struct References {
    entries: HashMap<String, Reference>,
}

impl References {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a codelist of permitted values.
    #[must_use]
    pub fn codelist<V: Into<Value>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.insert(
            name,
            Reference::Codelist(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Add a template of expected key tuples.
    #[must_use]
    pub fn template(mut self, name: &str, keys: Dataset) -> Self {
        self.insert(name, Reference::Template(keys));
        self
    }

    pub fn insert(&mut self, name: &str, reference: Reference) {
        self.entries.insert(name.to_owned(), reference);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Reference> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
