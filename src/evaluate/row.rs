use crate::{Column, CompareOp, Operand, Outcome, Reference, RowCheck, Value, ValueKind};

use super::{Env, Fault};

/// A row check with its columns and references resolved.
enum Bound<'a> {
    TypeIs {
        column: &'a Column,
        kind: ValueKind,
    },
    NotMissing(&'a Column),
    AllComplete(Vec<&'a Column>),
    InRange {
        column: &'a Column,
        min: &'a Value,
        max: &'a Value,
        strict: bool,
    },
    InCodelist {
        column: &'a Column,
        codes: &'a [Value],
    },
    Compare {
        column: &'a Column,
        op: CompareOp,
        rhs: Rhs<'a>,
    },
    Conditional {
        column: &'a Column,
        value: &'a Value,
        then: Box<Bound<'a>>,
    },
}

enum Rhs<'a> {
    Column(&'a Column),
    Literal(&'a Value),
}

pub(super) fn evaluate(check: &RowCheck, env: Env<'_>) -> Result<Vec<Outcome>, Fault> {
    let bound = bind(check, env)?;
    (0..env.dataset.row_count())
        .map(|row| judge(&bound, row, env.tolerance))
        .collect()
}

fn bind<'a>(check: &'a RowCheck, env: Env<'a>) -> Result<Bound<'a>, Fault> {
    let dataset = env.dataset;
    Ok(match check {
        RowCheck::TypeIs { column, kind } => Bound::TypeIs {
            column: dataset.column(column)?,
            kind: *kind,
        },
        RowCheck::NotMissing { column } => Bound::NotMissing(dataset.column(column)?),
        RowCheck::AllComplete { columns } => Bound::AllComplete(super::resolve(dataset, columns)?),
        RowCheck::InRange {
            column,
            min,
            max,
            strict,
        } => {
            let col = dataset.column(column)?;
            let kind = col.kind().value_kind();
            if !matches!(kind, ValueKind::Numeric | ValueKind::Date) {
                return Err(incomparable(col, kind, min.kind()));
            }
            for bound in [min, max] {
                if bound.kind() != kind {
                    return Err(incomparable(col, kind, bound.kind()));
                }
            }
            Bound::InRange {
                column: col,
                min,
                max,
                strict: *strict,
            }
        }
        RowCheck::InCodelist { column, reference } => {
            let col = dataset.column(column)?;
            match env.references.get(reference) {
                Some(Reference::Codelist(codes)) => Bound::InCodelist { column: col, codes },
                Some(other) => {
                    return Err(Fault::ReferenceKind {
                        name: reference.clone(),
                        found: other.kind_name(),
                        expected: "codelist",
                    })
                }
                // References are checked before any rule runs.
                None => Bound::InCodelist {
                    column: col,
                    codes: &[],
                },
            }
        }
        RowCheck::Compare {
            column,
            op,
            operand,
        } => {
            let col = dataset.column(column)?;
            let kind = col.kind().value_kind();
            let (rhs, rhs_kind) = match operand {
                Operand::Column(other) => {
                    let other = dataset.column(other)?;
                    (Rhs::Column(other), other.kind().value_kind())
                }
                Operand::Literal(value) => (Rhs::Literal(value), value.kind()),
            };
            if rhs_kind != kind {
                return Err(incomparable(col, kind, rhs_kind));
            }
            if kind == ValueKind::Logical && !matches!(op, CompareOp::Eq | CompareOp::Neq) {
                return Err(Fault::Unordered {
                    column: col.name().to_owned(),
                    op: *op,
                });
            }
            Bound::Compare {
                column: col,
                op: *op,
                rhs,
            }
        }
        RowCheck::Conditional {
            column,
            value,
            then,
        } => {
            let col = dataset.column(column)?;
            let kind = col.kind().value_kind();
            if value.kind() != kind {
                return Err(incomparable(col, kind, value.kind()));
            }
            Bound::Conditional {
                column: col,
                value,
                then: Box::new(bind(then, env)?),
            }
        }
    })
}

fn incomparable(column: &Column, left: ValueKind, right: ValueKind) -> Fault {
    Fault::Incomparable {
        column: column.name().to_owned(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

fn compare(
    column: &Column,
    left: &Value,
    op: CompareOp,
    right: &Value,
    tolerance: f64,
) -> Result<bool, Fault> {
    left.compare_within(op, right, tolerance)
        .ok_or_else(|| Fault::Incomparable {
            column: column.name().to_owned(),
            left: left.to_string(),
            right: right.to_string(),
        })
}

fn judge(bound: &Bound<'_>, row: usize, tolerance: f64) -> Result<Outcome, Fault> {
    Ok(match bound {
        Bound::TypeIs { column, kind } => match column.get(row) {
            None => Outcome::Na,
            Some(v) => Outcome::from_bool(v.kind() == *kind),
        },
        Bound::NotMissing(column) => Outcome::from_bool(column.get(row).is_some()),
        Bound::AllComplete(columns) => {
            Outcome::from_bool(columns.iter().all(|c| c.get(row).is_some()))
        }
        Bound::InRange {
            column,
            min,
            max,
            strict,
        } => match column.get(row) {
            None => Outcome::Na,
            Some(v) => {
                let (lo, hi) = if *strict {
                    (CompareOp::Gt, CompareOp::Lt)
                } else {
                    (CompareOp::Gte, CompareOp::Lte)
                };
                let ok = compare(column, v, lo, min, 0.0)? && compare(column, v, hi, max, 0.0)?;
                Outcome::from_bool(ok)
            }
        },
        Bound::InCodelist { column, codes } => match column.get(row) {
            None => Outcome::Na,
            Some(v) => Outcome::from_bool(
                codes
                    .iter()
                    .any(|code| v.compare(CompareOp::Eq, code) == Some(true)),
            ),
        },
        Bound::Compare { column, op, rhs } => {
            let right = match rhs {
                Rhs::Column(other) => other.get(row),
                Rhs::Literal(value) => Some(*value),
            };
            match (column.get(row), right) {
                (Some(left), Some(right)) => {
                    Outcome::from_bool(compare(column, left, *op, right, tolerance)?)
                }
                _ => Outcome::Na,
            }
        }
        Bound::Conditional {
            column,
            value,
            then,
        } => match column.get(row) {
            None => Outcome::Na,
            Some(v) if compare(column, v, CompareOp::Eq, value, tolerance)? => {
                judge(then, row, tolerance)?
            }
            Some(_) => Outcome::Pass,
        },
    })
}
