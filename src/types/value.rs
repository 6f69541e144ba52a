use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::check::CompareOp;

/// A present cell value. Missing cells are represented as `None` in a
/// [`Cell`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A calendar date without time zone.
    Date(NaiveDate),
}

/// One cell of a column. `None` is the missing marker.
pub type Cell = Option<Value>;

/// The basic type of a single value, as tested by `typeIs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Numeric,
    Text,
    Date,
    Logical,
}

impl Value {
    /// Compare this value to another using the given operator.
    /// Returns `None` for incompatible types or unordered floats (NaN).
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value) -> Option<bool> {
        self.compare_within(op, other, 0.0)
    }

    /// Like [`compare`](Self::compare), but numeric `==` and `!=` treat values
    /// whose absolute difference is at most `tolerance` as equal. Two integers
    /// always compare exactly.
    #[must_use]
    pub fn compare_within(&self, op: CompareOp, other: &Value, tolerance: f64) -> Option<bool> {
        let both_int = matches!((self, other), (Value::Int(_), Value::Int(_)));
        if tolerance > 0.0 && !both_int && matches!(op, CompareOp::Eq | CompareOp::Neq) {
            if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
                let equal = (a - b).abs() <= tolerance;
                return Some(if op == CompareOp::Eq { equal } else { !equal });
            }
        }
        let ord = self.partial_cmp_value(other)?;
        Some(match op {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
        })
    }

    /// The kind of this value. Strings report [`ValueKind::Text`].
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) | Value::Float(_) => ValueKind::Numeric,
            Value::Bool(_) => ValueKind::Logical,
            Value::String(_) => ValueKind::Text,
            Value::Date(_) => ValueKind::Date,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Map the value onto an integer line: integral numbers map to
    /// themselves, dates to their day number. Anything else is `None`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn as_ordinal(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
            Value::Date(d) => Some(i64::from(d.num_days_from_ce())),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Date(v) => write!(f, "date(\"{}\")", v.format("%Y-%m-%d")),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Numeric => write!(f, "numeric"),
            ValueKind::Text => write!(f, "text"),
            ValueKind::Date => write!(f, "date"),
            ValueKind::Logical => write!(f, "logical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_conversions() {
        assert_eq!(Value::from(42_i64), Value::Int(42));
        assert_eq!(Value::from(7_i32), Value::Int(7));
        assert_eq!(Value::from(2.5_f64), Value::Float(2.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_owned()));
        assert_eq!(Value::from(day(2024, 1, 31)), Value::Date(day(2024, 1, 31)));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String("hello".into()).to_string(), "\"hello\"");
        assert_eq!(
            Value::Date(day(2020, 3, 1)).to_string(),
            "date(\"2020-03-01\")"
        );
    }

    #[test]
    fn compare_int() {
        let a = Value::Int(10);
        let b = Value::Int(20);
        assert_eq!(a.compare(CompareOp::Eq, &b), Some(false));
        assert_eq!(a.compare(CompareOp::Neq, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Lt, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Lte, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Gt, &b), Some(false));
        assert_eq!(a.compare(CompareOp::Gte, &a), Some(true));
    }

    #[test]
    fn compare_int_float_cross_type() {
        let i = Value::Int(10);
        let f = Value::Float(10.0);
        assert_eq!(i.compare(CompareOp::Eq, &f), Some(true));
        assert_eq!(f.compare(CompareOp::Eq, &i), Some(true));
        assert_eq!(i.compare(CompareOp::Lt, &Value::Float(10.5)), Some(true));
    }

    #[test]
    fn large_ints_compare_exactly_under_tolerance() {
        let a = Value::Int(9_007_199_254_740_993);
        let b = Value::Int(9_007_199_254_740_992);
        assert_eq!(a.compare_within(CompareOp::Eq, &b, 1e-8), Some(false));
        assert_eq!(a.compare_within(CompareOp::Neq, &b, 1e-8), Some(true));
        assert_eq!(a.compare_within(CompareOp::Eq, &a, 1e-8), Some(true));
        assert_eq!(
            Value::Float(2.000_000_001).compare_within(CompareOp::Eq, &Value::Int(2), 1e-8),
            Some(true)
        );
    }

    #[test]
    fn compare_dates() {
        let early = Value::Date(day(2020, 1, 1));
        let late = Value::Date(day(2021, 6, 30));
        assert_eq!(early.compare(CompareOp::Lt, &late), Some(true));
        assert_eq!(late.compare(CompareOp::Gte, &early), Some(true));
    }

    #[test]
    fn compare_type_mismatch_returns_none() {
        let i = Value::Int(1);
        let s = Value::String("hello".into());
        assert_eq!(i.compare(CompareOp::Eq, &s), None);
        assert_eq!(i.compare(CompareOp::Eq, &Value::Bool(true)), None);
        assert_eq!(s.compare(CompareOp::Eq, &Value::Date(day(2020, 1, 1))), None);
    }

    #[test]
    fn compare_nan_returns_none() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.compare(CompareOp::Eq, &nan), None);
    }

    #[test]
    fn tolerance_applies_to_numeric_equality_only() {
        let a = Value::Float(1.0);
        let b = Value::Float(1.0 + 1e-10);
        assert_eq!(a.compare(CompareOp::Eq, &b), Some(false));
        assert_eq!(a.compare_within(CompareOp::Eq, &b, 1e-8), Some(true));
        assert_eq!(a.compare_within(CompareOp::Neq, &b, 1e-8), Some(false));
        assert_eq!(a.compare_within(CompareOp::Lt, &b, 1e-8), Some(true));
    }

    #[test]
    fn kind_of_values() {
        assert_eq!(Value::Int(1).kind(), ValueKind::Numeric);
        assert_eq!(Value::Float(1.5).kind(), ValueKind::Numeric);
        assert_eq!(Value::Bool(false).kind(), ValueKind::Logical);
        assert_eq!(Value::String("x".into()).kind(), ValueKind::Text);
        assert_eq!(Value::Date(day(2020, 1, 1)).kind(), ValueKind::Date);
    }

    #[test]
    fn ordinal_mapping() {
        assert_eq!(Value::Int(3).as_ordinal(), Some(3));
        assert_eq!(Value::Float(4.0).as_ordinal(), Some(4));
        assert_eq!(Value::Float(4.5).as_ordinal(), None);
        assert_eq!(Value::String("4".into()).as_ordinal(), None);
        let d1 = Value::Date(day(2020, 2, 28)).as_ordinal().unwrap();
        let d2 = Value::Date(day(2020, 2, 29)).as_ordinal().unwrap();
        assert_eq!(d2 - d1, 1);
    }
}
