use std::num::NonZeroUsize;

/// Tolerance used for numeric `==` / `!=` unless configured otherwise.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Settings for a single [`confront_with`](crate::confront_with) call.
///
/// None of these settings change which outcome a rule produces for a given
/// dataset, except `tolerance`, which widens numeric equality.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfrontOptions {
    /// Worker threads used to evaluate rules. `1` evaluates on the calling
    /// thread.
    pub threads: NonZeroUsize,
    /// Absolute tolerance for numeric equality in comparison checks.
    pub tolerance: f64,
    /// Emit a debug event per rule with its check expression and tally.
    pub log_rule_details: bool,
}

impl Default for ConfrontOptions {
    fn default() -> Self {
        Self {
            threads: NonZeroUsize::MIN,
            tolerance: DEFAULT_TOLERANCE,
            log_rule_details: false,
        }
    }
}

impl ConfrontOptions {
    /// Evaluate every rule on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Spread rules over `threads` scoped worker threads. `0` is treated as
    /// `1`.
    #[must_use]
    pub fn parallel(threads: usize) -> Self {
        Self::default().with_threads(threads)
    }

    /// Use one worker per available CPU.
    #[must_use]
    pub fn available_parallelism() -> Self {
        let threads = std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
        Self {
            threads,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = NonZeroUsize::new(threads).unwrap_or(NonZeroUsize::MIN);
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    #[must_use]
    pub fn with_rule_details(mut self, enabled: bool) -> Self {
        self.log_rule_details = enabled;
        self
    }
}
