//! Solver settings.

use crate::tableau::LpShape;

/// Upper bound on the default iteration cap.
pub const MAX_ITERATIONS_CEILING: usize = 100_000;

/// Settings for a simplex run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplexSettings {
    /// Maximum number of pivots per simplex run (None = derived from the tableau shape, see
    /// [SimplexSettings::iteration_limit])
    pub max_iterations: Option<usize>,

    /// Log phase transitions and terminations at info level
    pub verbose: bool,

    /// Keep a snapshot of the tableau after every canonicalization
    pub record_history: bool,
}

impl Default for SimplexSettings {
    fn default() -> Self {
        SimplexSettings {
            max_iterations: None,
            verbose: false,
            record_history: false,
        }
    }
}

impl SimplexSettings {
    /// Iteration cap for a tableau of the given shape.
    ///
    /// Without an explicit `max_iterations` this is twice the number of possible bases,
    /// $ 2 \binom{d}{m-1} $ for `d` decision columns, capped at [MAX_ITERATIONS_CEILING].
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::settings::SimplexSettings;
    /// use tableaurs::tableau::LpShape;
    /// let shape = LpShape { constraints: 2, variables: 2, slacks: 2, ..Default::default() };
    /// assert_eq!(SimplexSettings::default().iteration_limit(&shape), 12);
    /// ```
    pub fn iteration_limit(&self, shape: &LpShape) -> usize {
        self.max_iterations.unwrap_or_else(|| {
            binomial(shape.decision_count(), shape.constraints)
                .saturating_mul(2)
                .clamp(1, MAX_ITERATIONS_CEILING)
        })
    }
}

/// Saturating binomial coefficient.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // exact: the running product of i+1 consecutive integers is divisible by (i+1)!
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    result as usize
}
