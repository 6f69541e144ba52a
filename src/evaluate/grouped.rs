use std::collections::HashSet;

use crate::group::{count_keys, partition, row_key};
use crate::{
    AllUnique, Column, ContainsExactly, LinearSequence, Outcome, Reference, UniqueKey, Value,
    ValueKind,
};

use super::{resolve, Env, Fault};

fn has_missing(columns: &[&Column], row: usize) -> bool {
    columns.iter().any(|c| c.get(row).is_none())
}

/// Rows whose `(by, keys)` tuple repeats fail. Rows missing a key cell are
/// `na` and take no part in the count.
pub(super) fn unique_key(check: &UniqueKey, env: Env<'_>) -> Result<Vec<Outcome>, Fault> {
    let keys = resolve(env.dataset, &check.keys)?;
    let mut tuple = resolve(env.dataset, &check.by)?;
    tuple.extend(keys.iter().copied());

    let rows = env.dataset.row_count();
    let counts = count_keys(
        (0..rows)
            .filter(|&row| !has_missing(&keys, row))
            .map(|row| row_key(&tuple, row)),
    );
    Ok((0..rows)
        .map(|row| {
            if has_missing(&keys, row) {
                Outcome::Na
            } else {
                Outcome::from_bool(counts[&row_key(&tuple, row)] == 1)
            }
        })
        .collect())
}

pub(super) fn all_unique(check: &AllUnique, env: Env<'_>) -> Result<Vec<Outcome>, Fault> {
    let keys = resolve(env.dataset, &check.keys)?;
    let rows = env.dataset.row_count();
    let mut seen = HashSet::new();
    let mut incomplete = false;
    for row in 0..rows {
        if has_missing(&keys, row) {
            incomplete = true;
        } else if !seen.insert(row_key(&keys, row)) {
            return Ok(vec![Outcome::Fail]);
        }
    }
    Ok(vec![if incomplete { Outcome::Na } else { Outcome::Pass }])
}

fn ordinal(column: &Column, value: &Value) -> Result<i64, Fault> {
    value.as_ordinal().ok_or_else(|| Fault::NotSequential {
        column: column.name().to_owned(),
        value: value.to_string(),
    })
}

fn bound(column: &Column, value: Option<&Value>) -> Result<Option<i64>, Fault> {
    let Some(value) = value else {
        return Ok(None);
    };
    let kind = column.kind().value_kind();
    if value.kind() != kind {
        return Err(Fault::Incomparable {
            column: column.name().to_owned(),
            left: kind.to_string(),
            right: value.kind().to_string(),
        });
    }
    ordinal(column, value).map(Some)
}

/// Per group, the distinct present values must cover `[begin, end]` exactly.
pub(super) fn linear_sequence(
    check: &LinearSequence,
    env: Env<'_>,
) -> Result<Vec<Outcome>, Fault> {
    let column = env.dataset.column(&check.column)?;
    let kind = column.kind().value_kind();
    if !matches!(kind, ValueKind::Numeric | ValueKind::Date) {
        return Err(Fault::NotSequential {
            column: column.name().to_owned(),
            value: format!("{kind} values"),
        });
    }
    let begin = bound(column, check.begin.as_ref())?;
    let end = bound(column, check.end.as_ref())?;
    let by = resolve(env.dataset, &check.by)?;

    let rows = env.dataset.row_count();
    let values: Vec<Option<i64>> = column
        .cells()
        .iter()
        .map(|cell| cell.as_ref().map(|v| ordinal(column, v)).transpose())
        .collect::<Result<_, _>>()?;

    let mut outcomes = vec![Outcome::Na; rows];
    for group in partition(&by, rows) {
        let present: HashSet<i64> = group.iter().filter_map(|&row| values[row]).collect();
        let (Some(&min), Some(&max)) = (present.iter().min(), present.iter().max()) else {
            continue;
        };
        let lo = begin.unwrap_or(min);
        let hi = end.unwrap_or(max);
        let complete = lo <= hi
            && min >= lo
            && max <= hi
            && i128::from(hi) - i128::from(lo) + 1 == present.len() as i128;
        for &row in &group {
            if values[row].is_some() {
                outcomes[row] = Outcome::from_bool(complete);
            }
        }
    }
    Ok(outcomes)
}

/// Per group, the key tuples over the template's columns must equal the
/// template's rows as a multiset. Every row of a group shares its outcome.
pub(super) fn contains_exactly(
    check: &ContainsExactly,
    env: Env<'_>,
) -> Result<Vec<Outcome>, Fault> {
    let template = match env.references.get(&check.reference) {
        Some(Reference::Template(template)) => template,
        Some(other) => {
            return Err(Fault::ReferenceKind {
                name: check.reference.clone(),
                found: other.kind_name(),
                expected: "template",
            })
        }
        None => return Ok(vec![Outcome::Na; env.dataset.row_count()]),
    };

    let template_columns: Vec<&Column> = template.columns().collect();
    let names: Vec<String> = template_columns
        .iter()
        .map(|c| c.name().to_owned())
        .collect();
    let keys = resolve(env.dataset, &names)?;
    let by = resolve(env.dataset, &check.by)?;

    let expected = count_keys((0..template.row_count()).map(|row| row_key(&template_columns, row)));

    let mut outcomes = vec![Outcome::Na; env.dataset.row_count()];
    for group in partition(&by, env.dataset.row_count()) {
        let found = count_keys(group.iter().map(|&row| row_key(&keys, row)));
        let outcome = Outcome::from_bool(found == expected);
        for &row in &group {
            outcomes[row] = outcome.clone();
        }
    }
    Ok(outcomes)
}
