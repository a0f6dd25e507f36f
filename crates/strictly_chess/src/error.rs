//! Errors raised by the rules engine.
//!
//! An illegal but well-formed move is not an error: it yields a rejected
//! [`MoveOutcome`](crate::MoveOutcome). These variants mark contract
//! violations by the caller or a corrupted position.

use crate::{Color, Position};

/// Error raised by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RulesError {
    /// A square token is not a file `a`-`h` followed by a rank `1`-`8`.
    #[display("Invalid square notation: {:?}", _0)]
    InvalidSquare(String),

    /// A pawn reached the last rank without a usable promotion token.
    #[display("Invalid promotion request: {:?}", _0)]
    InvalidPromotion(Option<String>),

    /// There is no piece on the origin square.
    #[display("No piece on {}", _0)]
    EmptySquare(Position),

    /// A FEN string could not be parsed.
    #[display("Invalid FEN: {}", _0)]
    InvalidFen(String),

    /// The position has no king of the given color.
    #[display("No {:?} king on the board", _0)]
    MissingKing(Color),
}

impl std::error::Error for RulesError {}
