use crate::{Player, Result, Reward};
use std::fmt::Debug;
use std::hash::Hash;

/// A two-player, zero-sum, perfect-information game.
///
/// This trait is the rule engine the search is generic over. The search never
/// looks inside `State`; it only asks for legal moves, applies them to its own
/// clones, and reads the result once a playout has finished.
pub trait Game: Clone + Send + Sync {
    /// The game state (e.g., a board plus the player to move).
    ///
    /// `Clone` must produce an independent deep copy: mutating the clone never
    /// affects the original.
    type State: Clone + Send;

    /// A game move (e.g., a cell index).
    type Move: Clone + Copy + Send + Eq + Hash + Debug;

    /// Returns the starting position.
    fn initial_state(&self) -> Self::State;

    /// Returns all moves playable from `state`.
    ///
    /// Empty iff the game is over (decided or board full).
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Plays `mv` in place.
    ///
    /// # Errors
    /// Returns [`UctError::IllegalMove`](crate::UctError::IllegalMove) if `mv`
    /// is not in `legal_moves(state)`. The state is left unchanged in that case.
    fn apply(&self, state: &mut Self::State, mv: Self::Move) -> Result<()>;

    /// Returns true once the game has ended.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Returns the result from `perspective`'s point of view:
    /// - `Some(Reward::WIN)` if that player won
    /// - `Some(Reward::LOSS)` if that player lost
    /// - `Some(Reward::DRAW)` for a draw
    /// - `None` if the game is not terminal
    fn result(&self, state: &Self::State, perspective: Player) -> Option<Reward>;

    /// The player whose turn it is.
    fn current_player(&self, state: &Self::State) -> Player;

    /// The player who made the last move.
    ///
    /// For the starting position this is the player who did *not* move first,
    /// so that turns strictly alternate along any line of play.
    fn player_just_moved(&self, state: &Self::State) -> Player {
        self.current_player(state).opponent()
    }
}
