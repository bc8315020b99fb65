//! Rollout policy abstraction for the simulation phase.
//!
//! The search plays each simulation to the end of the game, asking a
//! `RolloutPolicy` for every move. `UniformRollout` is the plain UCT choice;
//! other policies can bias playouts without touching the search.

use rand::Rng;
use uct_core::Game;

/// Trait for choosing playout moves.
pub trait RolloutPolicy<G: Game> {
    /// Pick one of `legal_moves` for the player to move in `state`.
    ///
    /// `legal_moves` is never empty and is exactly `game.legal_moves(state)`.
    fn choose<R: Rng + ?Sized>(
        &self,
        game: &G,
        state: &G::State,
        legal_moves: &[G::Move],
        rng: &mut R,
    ) -> G::Move;
}

/// Picks every legal move with equal probability.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformRollout;

impl<G: Game> RolloutPolicy<G> for UniformRollout {
    fn choose<R: Rng + ?Sized>(
        &self,
        _game: &G,
        _state: &G::State,
        legal_moves: &[G::Move],
        rng: &mut R,
    ) -> G::Move {
        legal_moves[rng.gen_range(0..legal_moves.len())]
    }
}
