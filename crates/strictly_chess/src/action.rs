//! Move requests and their outcomes.

use crate::{PieceId, Position, RulesError, parse_long_algebraic};
use derive_getters::Getters;

/// A request to move the piece on `from` to `to`.
///
/// `promotion` is a two-character token whose second character selects the
/// promoted kind (`q`, `r`, `n` or `b`). It is required exactly when a pawn
/// reaches the last rank and ignored otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveRequest {
    /// Origin square.
    from: Position,
    /// Destination square.
    to: Position,
    /// Promotion token such as `xq`.
    promotion: Option<String>,
}

impl MoveRequest {
    /// Creates a request without a promotion token.
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Attaches a promotion token.
    pub fn with_promotion(mut self, token: impl Into<String>) -> Self {
        self.promotion = Some(token.into());
        self
    }

    /// Parses a long-algebraic move such as `e2e4` or `e7e8q`.
    pub fn parse(text: &str) -> Result<Self, RulesError> {
        let (from, to, promotion) = parse_long_algebraic(text)?;
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

/// Rook relocation performed by a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct Castle {
    /// Id of the rook that moved.
    rook: PieceId,
    /// Rook's square before the castle.
    rook_from: Position,
    /// Rook's square after the castle.
    rook_to: Position,
}

impl Castle {
    pub(crate) fn new(rook: PieceId, rook_from: Position, rook_to: Position) -> Self {
        Self {
            rook,
            rook_from,
            rook_to,
        }
    }
}

/// Result of a single move attempt.
///
/// A rejected move has `valid == false` and every other field empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
pub struct MoveOutcome {
    /// Whether the move was legal and applied.
    valid: bool,
    /// Id of the piece that moved.
    moved: Option<PieceId>,
    /// Id of the captured piece, if any.
    captured: Option<PieceId>,
    /// Square of a pawn removed by en passant.
    en_passant_capture: Option<Position>,
    /// Id of the piece a pawn promoted into.
    promotion: Option<PieceId>,
    /// Rook side channel of a castle.
    castle: Option<Castle>,
}

impl MoveOutcome {
    /// Outcome of an illegal move.
    pub fn rejected() -> Self {
        Self::default()
    }

    pub(crate) fn accepted(moved: PieceId) -> Self {
        Self {
            valid: true,
            moved: Some(moved),
            ..Self::default()
        }
    }

    pub(crate) fn set_captured(&mut self, captured: Option<PieceId>) {
        if captured.is_some() {
            self.captured = captured;
        }
    }

    pub(crate) fn set_en_passant_capture(&mut self, square: Position) {
        self.en_passant_capture = Some(square);
    }

    pub(crate) fn set_promotion(&mut self, id: PieceId) {
        self.promotion = Some(id);
    }

    pub(crate) fn set_castle(&mut self, castle: Castle) {
        self.castle = Some(castle);
    }
}
