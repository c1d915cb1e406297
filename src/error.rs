use thiserror::Error;

use crate::game::Phase;
use crate::piece::PieceType;

/// Why a request was refused. A refused request never changes the game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game already over")]
    GameOver,
    #[error("Expected phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: &'static str, actual: Phase },
    #[error("No piece on {0}")]
    EmptySquare(String),
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: String, to: String },
    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(PieceType),
    #[error("Unknown piece type {0:?}")]
    UnknownPieceType(String),
    #[error("Square {0} is occupied")]
    SquareOccupied(String),
    #[error("The duck must move away from {0}")]
    DuckNotMoved(String),
    #[error("Square ({0}, {1}) is off the board")]
    OutOfBounds(usize, usize),
    #[error("No legal moves available")]
    NoLegalMoves,
}
