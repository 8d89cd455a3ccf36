//! Errors used throughout the engine.
//!
//! `EngineError` is the single error type of the crate. Parse, structural and
//! legality variants are recoverable input problems: a rejected move never
//! leaves the game state modified. `Invariant` marks a defect in the caller or
//! in the engine itself and should not be recovered from.

use crate::engines::engine_session::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A square string was not two characters long.
    #[error("malformed square '{0}': expected a file letter and a rank digit")]
    MalformedSquare(String),

    #[error("invalid file '{0}': expected a letter between a and h")]
    InvalidFile(char),

    #[error("invalid rank '{0}': expected a digit between 1 and 8")]
    InvalidRank(char),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),

    #[error("invalid board description: {0}")]
    InvalidFen(String),

    /// No piece stands on the origin square of a submitted move.
    #[error("no piece on {square}")]
    EmptyOrigin { square: String },

    /// The origin square holds a piece of the side that is not moving.
    #[error("the piece on {square} belongs to the other side")]
    WrongSide { square: String },

    /// A move was submitted for the side that is not to move.
    #[error("it is not that side's turn to move")]
    OutOfTurn,

    /// The destination is not geometrically reachable for that piece.
    #[error("{from} to {to} is not a move of that piece")]
    NotACandidate { from: String, to: String },

    /// Self-capture, king capture, or moving a captured piece.
    #[error("{from} to {to} captures an own piece or the king")]
    StructurallyInvalid { from: String, to: String },

    #[error("castling {from} to {to} passes through an attacked square")]
    CastlingThroughAttack { from: String, to: String },

    #[error("{from} to {to} leaves the king in check")]
    SelfCheck { from: String, to: String },

    /// `my_move` was requested while the game is already decided.
    #[error("no move can be made, game status is {0:?}")]
    GameOver(GameStatus),

    #[error("opening line '{line}' could not be primed: {reason}")]
    OpeningBook { line: String, reason: String },

    /// Internal bookkeeping fault such as applying a move from an empty square.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
