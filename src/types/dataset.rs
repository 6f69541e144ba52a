use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::column::Column;
use super::error::DatasetError;
use super::value::Value;

/// An immutable table of named, typed columns sharing one row count.
///
/// Columns are reference-counted, so deriving a dataset with one column
/// replaced shares every other column with the original.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Arc<Column>>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from columns in order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InconsistentColumnLength`] if the columns do not
    /// all have the same length, or [`DatasetError::DuplicateColumn`] if two
    /// columns share a name.
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Result<Self, DatasetError> {
        let mut dataset = Dataset::default();
        for (i, column) in columns.into_iter().enumerate() {
            if i == 0 {
                dataset.rows = column.len();
            }
            dataset.push(Arc::new(column))?;
        }
        Ok(dataset)
    }

    fn push(&mut self, column: Arc<Column>) -> Result<(), DatasetError> {
        if column.len() != self.rows {
            return Err(DatasetError::InconsistentColumnLength {
                column: column.name().to_owned(),
                expected: self.rows,
                found: column.len(),
            });
        }
        if self.index.contains_key(column.name()) {
            return Err(DatasetError::DuplicateColumn {
                column: column.name().to_owned(),
            });
        }
        self.index
            .insert(column.name().to_owned(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Column names in column order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownColumn`] if absent.
    pub fn column(&self, name: &str) -> Result<&Column, DatasetError> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].as_ref())
            .ok_or_else(|| DatasetError::UnknownColumn {
                column: name.to_owned(),
            })
    }

    /// Read one cell. `Ok(None)` means the cell is missing.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownColumn`] or
    /// [`DatasetError::RowOutOfBounds`].
    pub fn get(&self, column: &str, row: usize) -> Result<Option<&Value>, DatasetError> {
        let col = self.column(column)?;
        if row >= self.rows {
            return Err(DatasetError::RowOutOfBounds {
                row,
                rows: self.rows,
            });
        }
        Ok(col.get(row))
    }

    /// Iterate over columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(AsRef::as_ref)
    }

    /// Derive a dataset with `column` replacing the column of the same name,
    /// or appended if no such column exists.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InconsistentColumnLength`] if the column length
    /// differs from the row count (unless the dataset has no columns yet).
    pub fn with_column(&self, column: Column) -> Result<Self, DatasetError> {
        let mut derived = self.clone();
        if derived.columns.is_empty() {
            derived.rows = column.len();
        }
        if column.len() != derived.rows {
            return Err(DatasetError::InconsistentColumnLength {
                column: column.name().to_owned(),
                expected: derived.rows,
                found: column.len(),
            });
        }
        match derived.index.get(column.name()) {
            Some(&i) => derived.columns[i] = Arc::new(column),
            None => derived.push(Arc::new(column))?,
        }
        Ok(derived)
    }

    /// Derive a dataset holding only the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if a row index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Arc::new(c.take(rows)))
                .collect(),
            index: self.index.clone(),
            rows: rows.len(),
        }
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset({} rows, {} columns)",
            self.rows,
            self.columns.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patients() -> Dataset {
        Dataset::new([
            Column::int("pid", [Some(1), Some(2), Some(3)]),
            Column::int("age", [Some(99), Some(40), None]),
        ])
        .unwrap()
    }

    #[test]
    fn accessors() {
        let ds = patients();
        assert_eq!(ds.column_names(), vec!["pid", "age"]);
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.get("age", 0).unwrap(), Some(&Value::Int(99)));
        assert_eq!(ds.get("age", 2).unwrap(), None);
    }

    #[test]
    fn unknown_column() {
        let ds = patients();
        assert_eq!(
            ds.column("weight").unwrap_err(),
            DatasetError::UnknownColumn {
                column: "weight".into()
            }
        );
    }

    #[test]
    fn row_out_of_bounds() {
        let ds = patients();
        assert_eq!(
            ds.get("age", 3).unwrap_err(),
            DatasetError::RowOutOfBounds { row: 3, rows: 3 }
        );
    }

    #[test]
    fn inconsistent_lengths_rejected() {
        let err = Dataset::new([
            Column::int("pid", [Some(1), Some(2)]),
            Column::int("age", [Some(30)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::InconsistentColumnLength {
                column: "age".into(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn duplicate_column_rejected() {
        let err = Dataset::new([
            Column::int("pid", [Some(1)]),
            Column::int("pid", [Some(2)]),
        ])
        .unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateColumn { .. }));
    }

    #[test]
    fn with_column_replaces_without_touching_original() {
        let ds = patients();
        let derived = ds
            .with_column(Column::int("age", [Some(1), Some(2), Some(3)]))
            .unwrap();
        assert_eq!(derived.get("age", 2).unwrap(), Some(&Value::Int(3)));
        assert_eq!(ds.get("age", 2).unwrap(), None);
        assert_eq!(derived.column_names(), vec!["pid", "age"]);
    }

    #[test]
    fn with_column_appends() {
        let ds = patients();
        let derived = ds
            .with_column(Column::text("site", [Some("a"), Some("b"), Some("c")]))
            .unwrap();
        assert_eq!(derived.column_names(), vec!["pid", "age", "site"]);
        assert_eq!(ds.column_count(), 2);
    }

    #[test]
    fn with_column_checks_length() {
        let ds = patients();
        assert!(ds.with_column(Column::int("x", [Some(1)])).is_err());
    }

    #[test]
    fn select_rows_in_order() {
        let ds = patients();
        let picked = ds.select_rows(&[2, 0]);
        assert_eq!(picked.row_count(), 2);
        assert_eq!(picked.get("pid", 0).unwrap(), Some(&Value::Int(3)));
        assert_eq!(picked.get("pid", 1).unwrap(), Some(&Value::Int(1)));
    }

    #[test]
    fn empty_dataset() {
        let ds = Dataset::new(Vec::new()).unwrap();
        assert_eq!(ds.row_count(), 0);
        assert!(ds.column_names().is_empty());
    }
}
