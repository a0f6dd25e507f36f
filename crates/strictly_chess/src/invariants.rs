//! First-class invariants of a chess position.
//!
//! Invariants are logical properties that must hold after every accepted
//! move. They are asserted in debug builds and can be tested independently.

use crate::{Color, GameState, PieceKind, Position};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        collect(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if !I4::holds(state) {
            violations.push(InvariantViolation::new(I4::description()));
        }
        collect(violations)
    }
}

/// Invariant: every piece on the board has a matching id-map entry and
/// the maps hold nothing else.
pub struct ActivePiecesMatchBoard;

impl Invariant<GameState> for ActivePiecesMatchBoard {
    fn holds(state: &GameState) -> bool {
        let mut on_board = 0;
        for (pos, piece) in state.board().pieces() {
            on_board += 1;
            if state.position_of(piece.id()) != Some(pos) {
                return false;
            }
        }
        let indexed = state.active_pieces(Color::White).len() + state.active_pieces(Color::Black).len();
        on_board == indexed
    }

    fn description() -> &'static str {
        "Active-piece maps agree with the board"
    }
}

/// Invariant: exactly one king per color.
pub struct OneKingPerColor;

impl Invariant<GameState> for OneKingPerColor {
    fn holds(state: &GameState) -> bool {
        let mut kings = [0usize; 2];
        for (_, piece) in state.board().pieces() {
            if piece.kind() == PieceKind::King {
                kings[piece.color().index()] += 1;
            }
        }
        kings == [1, 1]
    }

    fn description() -> &'static str {
        "Each color has exactly one king"
    }
}

/// Invariant: cached king squares hold the kings.
pub struct KingCacheMatchesBoard;

impl Invariant<GameState> for KingCacheMatchesBoard {
    fn holds(state: &GameState) -> bool {
        [Color::White, Color::Black].into_iter().all(|color| {
            state
                .board()
                .get(state.king_position(color))
                .is_some_and(|p| p.kind() == PieceKind::King && p.color() == color)
        })
    }

    fn description() -> &'static str {
        "Cached king positions match the board"
    }
}

/// Invariant: an en passant target is the empty square directly behind a
/// pawn of the side that just moved, on that side's double-step rank.
pub struct EnPassantTargetWellFormed;

impl Invariant<GameState> for EnPassantTargetWellFormed {
    fn holds(state: &GameState) -> bool {
        let Some(target) = state.en_passant_target() else {
            return true;
        };
        let pusher = state.turn().opponent();
        let skipped_rank = pusher.pawn_start_rank() + pusher.pawn_direction();
        let pawn_square = Position::new(target.x(), target.y() + pusher.pawn_direction());
        target.y() == skipped_rank
            && state.board().is_empty(target)
            && pawn_square
                .and_then(|pos| state.board().get(pos))
                .is_some_and(|p| p.kind() == PieceKind::Pawn && p.color() == pusher)
    }

    fn description() -> &'static str {
        "En passant target sits behind the pawn that just double-stepped"
    }
}

/// All chess state invariants as a composable set.
pub type ChessInvariants = (
    ActivePiecesMatchBoard,
    OneKingPerColor,
    KingCacheMatchesBoard,
    EnPassantTargetWellFormed,
);
