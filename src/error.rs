//! Error types shared by the board adapter, the controller and the input layer.

use thiserror::Error;

use crate::domain::{Coord, Key};

/// Failures reported by a board adapter
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("illegal move {from}-{to}")]
    IllegalMove { from: Coord, to: Coord },
    #[error("square {0:?} is not on the board")]
    InvalidSquare(Coord),
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("no menu entry at index {0}")]
    NoMenuEntry(usize),
}

/// Failures raised while a handler runs
#[derive(Debug, Error)]
pub enum VimError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("key {key} carries no {expected}")]
    UnexpectedKey { key: Key, expected: &'static str },
}

/// A key script token that could not be understood
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unterminated key name starting at byte {0}")]
    Unterminated(usize),
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
}
