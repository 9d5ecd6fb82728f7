//! Solver configuration.

use std::time::Duration;

/// Settings for one [`solve`](super::solve()) call.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pickup::solver::SolverConfig;
///
/// let config = SolverConfig::default().with_time_budget(Duration::from_secs(2));
/// assert_eq!(config.time_budget, Duration::from_secs(2));
/// assert!(SolverConfig::construction_only().time_budget.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Wall-clock limit for the improvement phase; zero skips it.
    pub time_budget: Duration,
    /// Evaluate local search candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(20),
            parallel: true,
        }
    }
}

impl SolverConfig {
    /// Construction only, no improvement phase.
    pub fn construction_only() -> Self {
        Self {
            time_budget: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Sets the improvement time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Enables or disables parallel move evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
