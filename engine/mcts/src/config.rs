//! MCTS configuration parameters.

use std::time::Duration;

/// Default wall-clock budget for one search.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(3000);

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock budget for one search, measured once when the search starts.
    /// Iterations still running when it expires are discarded.
    pub time_budget: Duration,

    /// Exploration constant C in the UCT formula.
    /// Higher values favor rarely visited children. Defaults to √2.
    pub exploration: f64,

    /// Stop after this many completed iterations even if time remains.
    /// `None` runs until the time budget is spent.
    pub max_iterations: Option<u32>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            exploration: std::f64::consts::SQRT_2,
            max_iterations: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, reproducible config for testing.
    ///
    /// The iteration cap is what ends the search; the time budget is only a
    /// safety net for slow machines.
    pub fn for_testing() -> Self {
        Self {
            time_budget: Duration::from_secs(30),
            exploration: std::f64::consts::SQRT_2,
            max_iterations: Some(200),
        }
    }

    /// Builder pattern: set the time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: cap the number of iterations.
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Builder pattern: remove the iteration cap.
    pub fn unlimited_iterations(mut self) -> Self {
        self.max_iterations = None;
        self
    }
}
