//! King steps and castling.

use super::check::{is_in_check, threats};
use crate::position::DIRECTIONS;
use crate::state::Transaction;
use crate::{Castle, GameState, MoveOutcome, Piece, PieceKind, Position, RulesError};
use tracing::debug;

/// Rook start and end squares for a castle of the king on `from` toward `to`.
fn castle_rook_squares(from: Position, to: Position) -> Option<(Position, Position)> {
    let side = (to.x() - from.x()).signum();
    let rook_from = Position::new(if side > 0 { 7 } else { 0 }, from.y())?;
    let rook_to = from.offset(side, 0)?;
    Some((rook_from, rook_to))
}

fn is_castle_attempt(from: Position, to: Position, king: Piece) -> bool {
    to.y() == from.y() && (to.x() - from.x()).abs() == 2 && from.y() == king.color().back_rank()
}

fn castling_allowed(state: &GameState, from: Position, to: Position, king: Piece) -> bool {
    if king.has_moved() || !is_castle_attempt(from, to, king) {
        return false;
    }
    let Some((rook_from, passing)) = castle_rook_squares(from, to) else {
        return false;
    };
    let board = state.board();
    let rook_ready = board.get(rook_from).is_some_and(|rook| {
        rook.kind() == PieceKind::Rook && rook.color() == king.color() && !rook.has_moved()
    });
    if !rook_ready {
        return false;
    }
    if !from.squares_between(rook_from).into_iter().all(|pos| board.is_empty(pos)) {
        return false;
    }
    let color = king.color();
    !is_in_check(board, color, from) && threats(board, color, passing).is_empty()
}

pub(crate) fn is_valid_move(state: &GameState, from: Position, to: Position, piece: Piece) -> bool {
    let dx = (to.x() - from.x()).abs();
    let dy = (to.y() - from.y()).abs();
    if dx <= 1 && dy <= 1 {
        return true;
    }
    castling_allowed(state, from, to, piece)
}

pub(crate) fn candidate_moves(state: &GameState, from: Position, piece: Piece) -> Vec<Position> {
    let mut squares: Vec<Position> = DIRECTIONS
        .iter()
        .filter_map(|(dx, dy)| from.offset(*dx, *dy))
        .filter(|pos| state.board().get(*pos).is_none_or(|p| p.color() != piece.color()))
        .collect();
    if !piece.has_moved() && from.y() == piece.color().back_rank() {
        squares.extend([from.offset(2, 0), from.offset(-2, 0)].into_iter().flatten());
    }
    squares
}

/// Steps the king, or castles when the king moves two files.
///
/// The landing square is re-checked by the caller after the move.
pub(crate) fn apply(
    state: &mut GameState,
    tx: &mut Transaction,
    from: Position,
    to: Position,
    piece: Piece,
    _promotion: Option<&str>,
) -> Result<MoveOutcome, RulesError> {
    let mut outcome = MoveOutcome::accepted(piece.id());
    if is_castle_attempt(from, to, piece)
        && let Some((rook_from, rook_to)) = castle_rook_squares(from, to)
        && let Some(rook) = state.board().get(rook_from)
    {
        state.place(tx, rook_from, None);
        state.place(tx, rook_to, Some(rook.moved()));
        outcome.set_castle(Castle::new(rook.id(), rook_from, rook_to));
        debug!(rook = %rook.id(), from = %rook_from, to = %rook_to, "Castled");
    }
    state.place(tx, from, None);
    let captured = state.place(tx, to, Some(piece.moved()));
    outcome.set_captured(captured.map(|p| p.id()));
    state.en_passant_target = None;
    Ok(outcome)
}
