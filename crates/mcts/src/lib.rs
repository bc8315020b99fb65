//! Monte Carlo Tree Search with UCB1 selection (UCT).
//!
//! This crate provides a generic UCT implementation that can be used with
//! any game implementing the `uct_core::Game` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `Game` implementation
//! - **UCB1 Selection**: `W/N + K * sqrt(2 ln N_parent / N)` with a tunable `K`
//! - **Random Rollouts**: Playouts to the end of the game through a
//!   pluggable `RolloutPolicy`
//! - **Seedable**: All randomness comes from a caller-supplied `Rng`
//! - **Inspectable**: The finished tree can be kept and dumped
//!
//! # Example
//!
//! ```
//! use uct_mcts::{Uct, UctConfig, games::TicTacToe};
//! use uct_core::Game;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let game = TicTacToe;
//! let state = game.initial_state();
//!
//! let config = UctConfig::with_iterations(200);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut uct = Uct::with_uniform_rollouts(config, rng);
//!
//! let result = uct.search(&game, &state).unwrap();
//! println!("Best move: {:?}", result.best_move);
//! for child in &result.children {
//!     println!("{:?}: {}/{}", child.mv, child.win_score, child.visits);
//! }
//! ```

pub mod config;
pub mod games;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;
pub mod ucb;

pub use config::{UctConfig, DEFAULT_EXPLORATION};
pub use node::{Node, NodeId};
pub use rollout::{RolloutPolicy, UniformRollout};
pub use search::{backpropagate, search, ChildStats, SearchResult, Uct};
pub use tree::Tree;
