use thiserror::Error;

/// Errors that can occur while searching or applying moves
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UctError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Game is not terminal")]
    NotTerminal,

    #[error("Child node {0} has no visits and cannot be scored")]
    UnvisitedChild(usize),

    #[error("Reward {0} is outside range [0, 1]")]
    InvalidReward(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result type for UCT operations
pub type Result<T> = std::result::Result<T, UctError>;
