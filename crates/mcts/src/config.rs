//! UCT configuration parameters.
//!
//! These parameters control the behavior of the search.

use serde::{Deserialize, Serialize};
use uct_core::{Result, UctError};

/// Default weight of the UCB1 exploration term.
pub const DEFAULT_EXPLORATION: f64 = 1.0;

/// UCT configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UctConfig {
    /// Number of select/expand/simulate/backpropagate iterations per search.
    pub iterations: usize,

    /// UCB1 exploration constant `K`.
    /// Higher values = more exploration of rarely visited moves,
    /// 0 = pure exploitation of the best mean.
    pub exploration: f64,
}

impl Default for UctConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: DEFAULT_EXPLORATION,
        }
    }
}

impl UctConfig {
    /// Create a new config with the specified number of iterations.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Replace the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Check that the exploration constant is usable.
    ///
    /// # Errors
    /// Returns `UctError::InvalidConfig` if it is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(UctError::InvalidConfig(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}
