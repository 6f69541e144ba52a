use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{Column, Value};

/// Hashable form of one cell, used for key tuples.
///
/// Numeric values with an integral value collapse onto `Int`, so `1` and
/// `1.0` form the same key. Missing is a key value equal only to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum KeyPart {
    Missing,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

pub(crate) type Key = Vec<KeyPart>;

impl KeyPart {
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn of(cell: Option<&Value>) -> Self {
        match cell {
            None => KeyPart::Missing,
            Some(Value::Int(i)) => KeyPart::Int(*i),
            Some(Value::Float(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                KeyPart::Int(*f as i64)
            }
            Some(Value::Float(f)) => KeyPart::Float(f.to_bits()),
            Some(Value::Bool(b)) => KeyPart::Bool(*b),
            Some(Value::String(s)) => KeyPart::Text(s.clone()),
            Some(Value::Date(d)) => KeyPart::Date(*d),
        }
    }
}

/// The key tuple of `row` over `columns`.
pub(crate) fn row_key(columns: &[&Column], row: usize) -> Key {
    columns.iter().map(|c| KeyPart::of(c.get(row))).collect()
}

/// Partition rows `0..rows` by equal key tuples over `columns`.
///
/// Groups are returned in order of first appearance and each group lists its
/// rows ascending. With no columns every row falls in one group.
pub(crate) fn partition(columns: &[&Column], rows: usize) -> Vec<Vec<usize>> {
    if rows == 0 {
        return Vec::new();
    }
    if columns.is_empty() {
        return vec![(0..rows).collect()];
    }
    let mut slots: HashMap<Key, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for row in 0..rows {
        let slot = *slots.entry(row_key(columns, row)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }
    groups
}

/// Count occurrences of each key tuple.
pub(crate) fn count_keys(keys: impl IntoIterator<Item = Key>) -> HashMap<Key, usize> {
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
