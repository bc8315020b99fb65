//! Game implementations for exercising the search.
//!
//! Small, fully known games make the search easy to check: Nim has a
//! closed-form solution and tic-tac-toe is a forced draw.

pub mod gomoku;
pub mod nim;
pub mod tictactoe;

pub use gomoku::{Gomoku, GomokuMove, GomokuState};
pub use nim::{Nim, NimMove, NimState};
pub use tictactoe::{TicTacToe, TicTacToeMove, TicTacToeState};
