//! Value types with enforced invariants.
//!
//! - Player: one of two alternating seats
//! - Reward: game result in range [0, 1]

use crate::{Result, UctError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two players. `First` always opens the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Get the opposing player.
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Zero-based seat index (0 for `First`, 1 for `Second`).
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "first"),
            Player::Second => write!(f, "second"),
        }
    }
}

/// A game result seen from one player.
///
/// Invariant: the value is in range [0, 1] where:
/// - 1 means that player won
/// - 0 means that player lost
/// - 0.5 means a draw
///
/// # Example
/// ```
/// use uct_core::Reward;
///
/// let reward = Reward::new(0.5).unwrap();
/// assert_eq!(reward, Reward::DRAW);
/// assert_eq!(Reward::WIN.flipped(), Reward::LOSS);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(f64);

impl Reward {
    /// Value for a win.
    pub const WIN: Self = Self(1.0);

    /// Value for a loss.
    pub const LOSS: Self = Self(0.0);

    /// Value for a draw.
    pub const DRAW: Self = Self(0.5);

    /// Create a new reward.
    ///
    /// # Errors
    /// Returns `UctError::InvalidReward` if the value is outside [0, 1].
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(UctError::InvalidReward(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// The same result seen by the opponent.
    pub fn flipped(self) -> Self {
        Self(1.0 - self.0)
    }

    /// Check if this represents a win.
    pub fn is_win(self) -> bool {
        self.0 > 0.5
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
