//! Nim with a single pile.
//!
//! Players alternately take 1, 2 or 3 chips; whoever takes the last chip
//! wins. Positions with a multiple of four chips are lost for the player to
//! move, which gives the search an easy target to check against.

use std::fmt;
use uct_core::{Game, Player, Result, Reward, UctError};

/// Largest number of chips a single move may take.
pub const MAX_TAKE: u32 = 3;

/// Nim position.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct NimState {
    chips: u32,
    current: Player,
}

impl NimState {
    /// Chips left on the pile.
    pub fn chips(&self) -> u32 {
        self.chips
    }
}

impl fmt::Display for NimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chips: {} ({} to move)", self.chips, self.current)
    }
}

/// Nim move: the number of chips taken.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NimMove(pub u32);

impl fmt::Display for NimMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take {}", self.0)
    }
}

/// Nim game with a configurable starting pile.
#[derive(Clone, Debug)]
pub struct Nim {
    chips: u32,
}

impl Nim {
    /// Create a game starting with `chips` on the pile.
    pub fn new(chips: u32) -> Self {
        Self { chips }
    }
}

impl Default for Nim {
    fn default() -> Self {
        Self::new(15)
    }
}

impl Game for Nim {
    type State = NimState;
    type Move = NimMove;

    fn initial_state(&self) -> Self::State {
        NimState {
            chips: self.chips,
            current: Player::First,
        }
    }

    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move> {
        (1..=MAX_TAKE.min(state.chips)).map(NimMove).collect()
    }

    fn apply(&self, state: &mut Self::State, mv: Self::Move) -> Result<()> {
        if mv.0 == 0 || mv.0 > MAX_TAKE || mv.0 > state.chips {
            return Err(UctError::IllegalMove(format!(
                "cannot take {} chips from {}",
                mv.0, state.chips
            )));
        }
        state.chips -= mv.0;
        state.current = state.current.opponent();
        Ok(())
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.chips == 0
    }

    fn result(&self, state: &Self::State, perspective: Player) -> Option<Reward> {
        if state.chips > 0 {
            return None;
        }
        // The player who just moved took the last chip.
        if self.player_just_moved(state) == perspective {
            Some(Reward::WIN)
        } else {
            Some(Reward::LOSS)
        }
    }

    fn current_player(&self, state: &Self::State) -> Player {
        state.current
    }
}
