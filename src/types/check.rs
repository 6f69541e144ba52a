use std::fmt;

use super::value::{Value, ValueKind};

/// Comparison operators supported in `inequality` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// How a check is evaluated and what its outcomes line up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One outcome per row, each row judged on its own.
    RowWise,
    /// Rows partitioned by key columns; one outcome per row.
    Grouped,
    /// A single outcome for the whole dataset.
    WholeDataset,
    /// Per-group comparison against a template reference; one outcome per row.
    Template,
}

/// Right-hand side of a comparison: another column or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Literal(Value),
}

/// Checks judged on each row independently.
#[derive(Debug, Clone, PartialEq)]
pub enum RowCheck {
    TypeIs {
        column: String,
        kind: ValueKind,
    },
    NotMissing {
        column: String,
    },
    AllComplete {
        columns: Vec<String>,
    },
    InRange {
        column: String,
        min: Value,
        max: Value,
        strict: bool,
    },
    InCodelist {
        column: String,
        reference: String,
    },
    Compare {
        column: String,
        op: CompareOp,
        operand: Operand,
    },
    Conditional {
        column: String,
        value: Value,
        then: Box<RowCheck>,
    },
}

/// `isUniqueKey`: every row whose key tuple repeats fails.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueKey {
    pub keys: Vec<String>,
    pub by: Vec<String>,
}

/// `allUnique`: one outcome, failing if any key tuple repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct AllUnique {
    pub keys: Vec<String>,
}

/// `inLinearSequence`: per group, the present values of `column` must cover
/// exactly the integer range `[begin, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSequence {
    pub column: String,
    pub begin: Option<Value>,
    pub end: Option<Value>,
    pub by: Vec<String>,
}

/// `containsExactly`: per group, the key tuples must match the named
/// template's rows as a multiset.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainsExactly {
    pub reference: String,
    pub by: Vec<String>,
}

/// The body of a rule: one predicate from the fixed vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Row(RowCheck),
    UniqueKey(UniqueKey),
    AllUnique(AllUnique),
    LinearSequence(LinearSequence),
    ContainsExactly(ContainsExactly),
}

impl Check {
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Check::Row(_) => Strategy::RowWise,
            Check::UniqueKey(_) | Check::LinearSequence(_) => Strategy::Grouped,
            Check::AllUnique(_) => Strategy::WholeDataset,
            Check::ContainsExactly(_) => Strategy::Template,
        }
    }

    /// Grouping columns. Empty for ungrouped checks.
    #[must_use]
    pub fn group_by(&self) -> &[String] {
        match self {
            Check::UniqueKey(c) => &c.by,
            Check::LinearSequence(c) => &c.by,
            Check::ContainsExactly(c) => &c.by,
            Check::Row(_) | Check::AllUnique(_) => &[],
        }
    }

    /// Name of the reference this check needs at confrontation time.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Check::Row(row) => row.reference(),
            Check::ContainsExactly(c) => Some(&c.reference),
            _ => None,
        }
    }

    /// Dataset columns read by this check, in first-mention order.
    ///
    /// Template checks also read the template's columns, which are only known
    /// once references are supplied.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let out: Vec<&str> = match self {
            Check::Row(row) => row.columns(),
            Check::UniqueKey(c) => c.by.iter().chain(&c.keys).map(String::as_str).collect(),
            Check::AllUnique(c) => c.keys.iter().map(String::as_str).collect(),
            Check::LinearSequence(c) => c
                .by
                .iter()
                .chain([&c.column])
                .map(String::as_str)
                .collect(),
            Check::ContainsExactly(c) => c.by.iter().map(String::as_str).collect(),
        };
        dedup_in_order(out)
    }
}

impl RowCheck {
    fn reference(&self) -> Option<&str> {
        match self {
            RowCheck::InCodelist { reference, .. } => Some(reference),
            RowCheck::Conditional { then, .. } => then.reference(),
            _ => None,
        }
    }

    fn columns(&self) -> Vec<&str> {
        match self {
            RowCheck::TypeIs { column, .. }
            | RowCheck::NotMissing { column }
            | RowCheck::InRange { column, .. }
            | RowCheck::InCodelist { column, .. } => vec![column.as_str()],
            RowCheck::AllComplete { columns } => columns.iter().map(String::as_str).collect(),
            RowCheck::Compare {
                column, operand, ..
            } => match operand {
                Operand::Column(other) => vec![column.as_str(), other.as_str()],
                Operand::Literal(_) => vec![column.as_str()],
            },
            RowCheck::Conditional { column, then, .. } => {
                let mut cols = vec![column.as_str()];
                cols.extend(then.columns());
                cols
            }
        }
    }
}

fn dedup_in_order(names: Vec<&str>) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

impl From<RowCheck> for Check {
    fn from(c: RowCheck) -> Self {
        Check::Row(c)
    }
}

impl From<UniqueKey> for Check {
    fn from(c: UniqueKey) -> Self {
        Check::UniqueKey(c)
    }
}

impl From<AllUnique> for Check {
    fn from(c: AllUnique) -> Self {
        Check::AllUnique(c)
    }
}

impl From<LinearSequence> for Check {
    fn from(c: LinearSequence) -> Self {
        Check::LinearSequence(c)
    }
}

impl From<ContainsExactly> for Check {
    fn from(c: ContainsExactly) -> Self {
        Check::ContainsExactly(c)
    }
}

fn names<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl UniqueKey {
    /// Restrict uniqueness to within groups of the given columns.
    #[must_use]
    pub fn by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by = names(columns);
        self
    }
}

impl LinearSequence {
    #[must_use]
    pub fn by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by = names(columns);
        self
    }
}

impl ContainsExactly {
    #[must_use]
    pub fn by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by = names(columns);
        self
    }
}

// -- Builders ---------------------------------------------------------------

#[must_use]
pub fn type_is(column: &str, kind: ValueKind) -> RowCheck {
    RowCheck::TypeIs {
        column: column.to_owned(),
        kind,
    }
}

#[must_use]
pub fn not_missing(column: &str) -> RowCheck {
    RowCheck::NotMissing {
        column: column.to_owned(),
    }
}

#[must_use]
pub fn all_complete<I, S>(columns: I) -> RowCheck
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RowCheck::AllComplete {
        columns: names(columns),
    }
}

/// Inclusive range check. Use [`in_range_strict`] for open bounds.
#[must_use]
pub fn in_range(column: &str, min: impl Into<Value>, max: impl Into<Value>) -> RowCheck {
    RowCheck::InRange {
        column: column.to_owned(),
        min: min.into(),
        max: max.into(),
        strict: false,
    }
}

#[must_use]
pub fn in_range_strict(column: &str, min: impl Into<Value>, max: impl Into<Value>) -> RowCheck {
    RowCheck::InRange {
        column: column.to_owned(),
        min: min.into(),
        max: max.into(),
        strict: true,
    }
}

#[must_use]
pub fn in_codelist(column: &str, reference: &str) -> RowCheck {
    RowCheck::InCodelist {
        column: column.to_owned(),
        reference: reference.to_owned(),
    }
}

#[must_use]
pub fn conditional(column: &str, value: impl Into<Value>, then: RowCheck) -> RowCheck {
    RowCheck::Conditional {
        column: column.to_owned(),
        value: value.into(),
        then: Box::new(then),
    }
}

#[must_use]
pub fn is_unique_key<I, S>(keys: I) -> UniqueKey
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    UniqueKey {
        keys: names(keys),
        by: Vec::new(),
    }
}

#[must_use]
pub fn all_unique<I, S>(keys: I) -> AllUnique
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    AllUnique { keys: names(keys) }
}

/// Linear-sequence check over `[begin, end]`. Pass `None` for a bound to use
/// each group's observed minimum or maximum.
#[must_use]
pub fn in_linear_sequence(
    column: &str,
    begin: Option<Value>,
    end: Option<Value>,
) -> LinearSequence {
    LinearSequence {
        column: column.to_owned(),
        begin,
        end,
        by: Vec::new(),
    }
}

#[must_use]
pub fn contains_exactly(reference: &str) -> ContainsExactly {
    ContainsExactly {
        reference: reference.to_owned(),
        by: Vec::new(),
    }
}

/// Intermediate builder for comparisons. Created by [`column()`]; requires a
/// comparison method to produce a [`RowCheck`].
#[derive(Debug, Clone)]
pub struct ColumnRef {
    name: String,
}

/// Right-hand side accepted by [`ColumnRef`] comparisons.
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl IntoOperand for ColumnRef {
    fn into_operand(self) -> Operand {
        Operand::Column(self.name)
    }
}

macro_rules! literal_operand {
    ($($t:ty),*) => {
        $(
            impl IntoOperand for $t {
                fn into_operand(self) -> Operand {
                    Operand::Literal(Value::from(self))
                }
            }
        )*
    };
}

literal_operand!(i64, i32, f64, bool, &str, String, chrono::NaiveDate);

impl IntoOperand for Value {
    fn into_operand(self) -> Operand {
        Operand::Literal(self)
    }
}

impl ColumnRef {
    fn compare(self, op: CompareOp, rhs: impl IntoOperand) -> RowCheck {
        RowCheck::Compare {
            column: self.name,
            op,
            operand: rhs.into_operand(),
        }
    }

    #[must_use]
    pub fn eq(self, rhs: impl IntoOperand) -> RowCheck {
        self.compare(CompareOp::Eq, rhs)
    }

    #[must_use]
    pub fn neq(self, rhs: impl IntoOperand) -> RowCheck {
        self.compare(CompareOp::Neq, rhs)
    }

    #[must_use]
    pub fn gt(self, rhs: impl IntoOperand) -> RowCheck {
        self.compare(CompareOp::Gt, rhs)
    }

    #[must_use]
    pub fn gte(self, rhs: impl IntoOperand) -> RowCheck {
        self.compare(CompareOp::Gte, rhs)
    }

    #[must_use]
    pub fn lt(self, rhs: impl IntoOperand) -> RowCheck {
        self.compare(CompareOp::Lt, rhs)
    }

    #[must_use]
    pub fn lte(self, rhs: impl IntoOperand) -> RowCheck {
        self.compare(CompareOp::Lte, rhs)
    }
}

#[must_use]
pub fn column(name: &str) -> ColumnRef {
    ColumnRef {
        name: name.to_owned(),
    }
}

// -- Display (renders the rule expression syntax) ----------------------------

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::RowWise => write!(f, "row-wise"),
            Strategy::Grouped => write!(f, "grouped"),
            Strategy::WholeDataset => write!(f, "whole-dataset"),
            Strategy::Template => write!(f, "template"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(name) => write!(f, "{name}"),
            Operand::Literal(value) => write!(f, "{value}"),
        }
    }
}

fn write_by(f: &mut fmt::Formatter<'_>, by: &[String]) -> fmt::Result {
    match by {
        [] => Ok(()),
        [one] => write!(f, ", by = {one}"),
        many => write!(f, ", by = [{}]", many.join(", ")),
    }
}

impl fmt::Display for RowCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowCheck::TypeIs { column, kind } => write!(f, "typeIs({column}, {kind})"),
            RowCheck::NotMissing { column } => write!(f, "notMissing({column})"),
            RowCheck::AllComplete { columns } => write!(f, "allComplete({})", columns.join(", ")),
            RowCheck::InRange {
                column,
                min,
                max,
                strict,
            } => {
                write!(f, "inRange({column}, {min}, {max}")?;
                if *strict {
                    write!(f, ", strict = true")?;
                }
                write!(f, ")")
            }
            RowCheck::InCodelist { column, reference } => {
                write!(f, "inCodelist({column}, {reference})")
            }
            RowCheck::Compare {
                column,
                op,
                operand,
            } => write!(f, "{column} {op} {operand}"),
            RowCheck::Conditional {
                column,
                value,
                then,
            } => write!(f, "conditional({column}, {value}, {then})"),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Row(row) => write!(f, "{row}"),
            Check::UniqueKey(c) => {
                write!(f, "isUniqueKey({}", c.keys.join(", "))?;
                write_by(f, &c.by)?;
                write!(f, ")")
            }
            Check::AllUnique(c) => write!(f, "allUnique({})", c.keys.join(", ")),
            Check::LinearSequence(c) => {
                write!(f, "inLinearSequence({}", c.column)?;
                if let Some(begin) = &c.begin {
                    write!(f, ", begin = {begin}")?;
                }
                if let Some(end) = &c.end {
                    write!(f, ", end = {end}")?;
                }
                write_by(f, &c.by)?;
                write!(f, ")")
            }
            Check::ContainsExactly(c) => {
                write!(f, "containsExactly({}", c.reference)?;
                write_by(f, &c.by)?;
                write!(f, ")")
            }
        }
    }
}
