//! UCT Core - Game abstractions and common types
//!
//! This crate provides the `Game` trait that a rule engine implements to be
//! searched by `uct_mcts`, together with the small value types both sides
//! agree on.
//!
//! # Types
//!
//! - [`Game`] - Trait for game implementations
//! - [`Player`] - One of the two seats at the table
//! - [`Reward`] - Game result in [0, 1] from one player's point of view

mod error;
mod game;
mod types;

pub use error::{Result, UctError};
pub use game::Game;
pub use types::{Player, Reward};
