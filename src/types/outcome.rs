use std::fmt;
use std::sync::Arc;

/// The result of judging one evaluation unit against one rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    Pass,
    Fail,
    /// The unit could not be judged because an input was missing.
    Na,
    /// The rule could not be evaluated at all.
    Error(Arc<str>),
}

impl Outcome {
    pub(crate) fn from_bool(ok: bool) -> Self {
        if ok {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    #[must_use]
    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail)
    }

    #[must_use]
    pub fn is_na(&self) -> bool {
        matches!(self, Outcome::Na)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
            Outcome::Na => write!(f, "na"),
            Outcome::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// What a rule's outcomes line up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Unit {
    /// One outcome per dataset row.
    Row,
    /// A single outcome for the whole dataset.
    Dataset,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Row => write!(f, "row"),
            Unit::Dataset => write!(f, "dataset"),
        }
    }
}

/// Outcome counts for one rule, or summed across rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Tally {
    pub units: usize,
    pub passes: usize,
    pub fails: usize,
    pub nas: usize,
    pub errors: usize,
}

impl Tally {
    pub fn of(outcomes: &[Outcome]) -> Self {
        let mut tally = Tally {
            units: outcomes.len(),
            ..Tally::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Pass => tally.passes += 1,
                Outcome::Fail => tally.fails += 1,
                Outcome::Na => tally.nas += 1,
                Outcome::Error(_) => tally.errors += 1,
            }
        }
        tally
    }

    pub(crate) fn add(self, other: Tally) -> Self {
        Tally {
            units: self.units + other.units,
            passes: self.passes + other.passes,
            fails: self.fails + other.fails,
            nas: self.nas + other.nas,
            errors: self.errors + other.errors,
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} units: {} pass, {} fail, {} na, {} error",
            self.units, self.passes, self.fails, self.nas, self.errors
        )
    }
}
