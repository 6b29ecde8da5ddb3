//! Error types for the engine.
//!
//! Only recoverable failures live here: bad input strings, bad parameters,
//! rejected game moves and orchestrator misuse. Broken invariants inside the
//! search (making a move onto an occupied node, overflowing the move buffer)
//! panic instead.

use thiserror::Error;

use crate::position::Move;

/// Errors produced while parsing a position snapshot string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePositionError {
    #[error("expected 5 `;`-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid color `{0}` (expected `w` or `b`)")]
    InvalidColor(String),

    #[error("both stone lists are for the same color")]
    DuplicateColor,

    #[error("invalid node `{0}`")]
    InvalidNode(String),

    #[error("node {0} is out of range (must be 0-23)")]
    NodeOutOfRange(usize),

    #[error("node {0} is occupied twice")]
    NodeOccupied(usize),

    #[error("{count} stones for one color (at most 9)")]
    TooManyStones { count: usize },

    #[error("invalid counter `{0}`")]
    InvalidCounter(String),
}

/// Errors produced when reading or setting a search parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("unknown parameter `{0}`")]
    UnknownName(String),

    #[error("invalid value {value} for {name}")]
    InvalidValue { name: &'static str, value: i64 },
}

/// Errors produced when committing moves to a game record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("the game is already over")]
    GameOver,
}

/// Errors produced by the search orchestrator.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("a search is already running")]
    Busy,

    #[error("failed to spawn the search worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("the search worker stopped without a result")]
    WorkerGone,
}
