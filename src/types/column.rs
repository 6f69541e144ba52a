use std::fmt;

use chrono::NaiveDate;

use super::error::DatasetError;
use super::value::{Cell, Value, ValueKind};

/// Declared type of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Date,
    Logical,
    /// Text restricted to a fixed, ordered set of levels.
    Categorical { levels: Vec<String> },
}

impl ColumnKind {
    /// Whether a present value is admissible in a column of this kind.
    #[must_use]
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (ColumnKind::Numeric, Value::Int(_) | Value::Float(_))
            | (ColumnKind::Text, Value::String(_))
            | (ColumnKind::Date, Value::Date(_))
            | (ColumnKind::Logical, Value::Bool(_)) => true,
            (ColumnKind::Categorical { levels }, Value::String(s)) => levels.contains(s),
            _ => false,
        }
    }

    /// The kind of value stored in this column. Categorical columns hold text.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ColumnKind::Numeric => ValueKind::Numeric,
            ColumnKind::Text | ColumnKind::Categorical { .. } => ValueKind::Text,
            ColumnKind::Date => ValueKind::Date,
            ColumnKind::Logical => ValueKind::Logical,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Logical => write!(f, "logical"),
            ColumnKind::Categorical { levels } => write!(f, "categorical[{}]", levels.join(", ")),
        }
    }
}

/// A named, typed sequence of cells.
///
/// Every present cell matches the column's [`ColumnKind`]; floating-point NaN
/// is stored as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    /// Build a column, checking every present cell against `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::KindMismatch`] for the first inadmissible cell.
    pub fn new(
        name: impl Into<String>,
        kind: ColumnKind,
        cells: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        let cells: Vec<Cell> = cells.into_iter().map(normalize).collect();
        if let Some(row) = cells
            .iter()
            .position(|c| c.as_ref().is_some_and(|v| !kind.admits(v)))
        {
            return Err(DatasetError::KindMismatch {
                column: name,
                row,
                expected: kind.to_string(),
            });
        }
        Ok(Self { name, kind, cells })
    }

    /// Integer column. `None` marks a missing cell.
    pub fn int(name: impl Into<String>, cells: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::unchecked(name, ColumnKind::Numeric, cells, Value::Int)
    }

    /// Floating-point column. `None` and NaN mark a missing cell.
    pub fn float(name: impl Into<String>, cells: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::unchecked(name, ColumnKind::Numeric, cells, Value::Float)
    }

    pub fn text<S: Into<String>>(
        name: impl Into<String>,
        cells: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::unchecked(name, ColumnKind::Text, cells, |s| Value::String(s.into()))
    }

    pub fn date(
        name: impl Into<String>,
        cells: impl IntoIterator<Item = Option<NaiveDate>>,
    ) -> Self {
        Self::unchecked(name, ColumnKind::Date, cells, Value::Date)
    }

    pub fn logical(name: impl Into<String>, cells: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::unchecked(name, ColumnKind::Logical, cells, Value::Bool)
    }

    /// Categorical column with the given levels.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::KindMismatch`] if a value is not one of `levels`.
    pub fn categorical<L: Into<String>, S: Into<String>>(
        name: impl Into<String>,
        levels: impl IntoIterator<Item = L>,
        cells: impl IntoIterator<Item = Option<S>>,
    ) -> Result<Self, DatasetError> {
        let levels = levels.into_iter().map(Into::into).collect();
        Self::new(
            name,
            ColumnKind::Categorical { levels },
            cells.into_iter().map(|c| c.map(|s| Value::String(s.into()))),
        )
    }

    fn unchecked<T>(
        name: impl Into<String>,
        kind: ColumnKind,
        cells: impl IntoIterator<Item = Option<T>>,
        wrap: impl Fn(T) -> Value,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            cells: cells.into_iter().map(|c| normalize(c.map(&wrap))).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The value at `row`, or `None` if the cell is missing or out of range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.cells.get(row).and_then(Option::as_ref)
    }

    /// A copy of this column holding only the given rows, in the given order.
    pub(crate) fn take(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind.clone(),
            cells: rows.iter().map(|&r| self.cells[r].clone()).collect(),
        }
    }
}

fn normalize(cell: Cell) -> Cell {
    match cell {
        Some(Value::Float(f)) if f.is_nan() => None,
        other => other,
    }
}
