//! Free-style Gomoku on a square board.
//!
//! Black (`Player::First`) and white alternate placing stones; the first to
//! line up `win_length` stones horizontally, vertically or diagonally wins.
//! Overlines count. A full board without a line is a draw.

use std::fmt;
use uct_core::{Game, Player, Result, Reward, UctError};

/// Default board edge.
pub const DEFAULT_SIZE: usize = 10;

/// Default number of stones in a row needed to win.
pub const DEFAULT_WIN_LENGTH: usize = 5;

const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Gomoku position.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct GomokuState {
    size: usize,
    cells: Vec<Option<Player>>,
    current: Player,
    winner: Option<Player>,
    stones: usize,
}

impl GomokuState {
    /// Board edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Stone at `(row, col)`, if any.
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[row * self.size + col]
    }

    /// Get the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    fn is_full(&self) -> bool {
        self.stones == self.cells.len()
    }

    /// Length of the run through `(row, col)` along `(dr, dc)`, both ways.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        let mut count = 1;
        for sign in [1isize, -1] {
            let mut r = row as isize + sign * dr;
            let mut c = col as isize + sign * dc;
            while r >= 0
                && c >= 0
                && (r as usize) < self.size
                && (c as usize) < self.size
                && self.cells[r as usize * self.size + c as usize] == Some(player)
            {
                count += 1;
                r += sign * dr;
                c += sign * dc;
            }
        }
        count
    }
}

impl fmt::Display for GomokuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let c = match self.cells[row * self.size + col] {
                    Some(Player::First) => 'X',
                    Some(Player::Second) => 'O',
                    None => '_',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Gomoku move: cell index `row * size + col`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GomokuMove(pub usize);

impl fmt::Display for GomokuMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gomoku game with a configurable board and winning line length.
#[derive(Clone, Debug)]
pub struct Gomoku {
    size: usize,
    win_length: usize,
}

impl Gomoku {
    /// Create a game on a `size` x `size` board needing `win_length` in a row.
    ///
    /// # Errors
    /// Returns `UctError::InvalidConfig` if `win_length` is zero.
    pub fn new(size: usize, win_length: usize) -> Result<Self> {
        if win_length == 0 {
            return Err(UctError::InvalidConfig(
                "win length must be at least 1".to_string(),
            ));
        }
        Ok(Self { size, win_length })
    }

    /// Move for the cell at `(row, col)`.
    pub fn move_at(&self, row: usize, col: usize) -> GomokuMove {
        GomokuMove(row * self.size + col)
    }
}

impl Default for Gomoku {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            win_length: DEFAULT_WIN_LENGTH,
        }
    }
}

impl Game for Gomoku {
    type State = GomokuState;
    type Move = GomokuMove;

    fn initial_state(&self) -> Self::State {
        GomokuState {
            size: self.size,
            cells: vec![None; self.size * self.size],
            current: Player::First,
            winner: None,
            stones: 0,
        }
    }

    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move> {
        if state.winner.is_some() {
            return Vec::new();
        }
        state
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| GomokuMove(i))
            .collect()
    }

    fn apply(&self, state: &mut Self::State, mv: Self::Move) -> Result<()> {
        let index = mv.0;
        if state.winner.is_some() || index >= state.cells.len() || state.cells[index].is_some() {
            return Err(UctError::IllegalMove(format!("cell {} is not playable", mv.0)));
        }

        let player = state.current;
        state.cells[index] = Some(player);
        state.stones += 1;
        state.current = player.opponent();

        let (row, col) = (index / state.size, index % state.size);
        if DIRECTIONS
            .iter()
            .any(|&(dr, dc)| state.run_length(row, col, dr, dc, player) >= self.win_length)
        {
            state.winner = Some(player);
        }
        Ok(())
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.winner.is_some() || state.is_full()
    }

    fn result(&self, state: &Self::State, perspective: Player) -> Option<Reward> {
        match state.winner {
            Some(winner) if winner == perspective => Some(Reward::WIN),
            Some(_) => Some(Reward::LOSS),
            None if state.is_full() => Some(Reward::DRAW),
            None => None,
        }
    }

    fn current_player(&self, state: &Self::State) -> Player {
        state.current
    }
}
