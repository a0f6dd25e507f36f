//! Pawn moves: single and double steps, captures, en passant, promotion.

use crate::state::Transaction;
use crate::{GameState, MoveOutcome, Piece, PieceKind, Position, RulesError};
use tracing::debug;

/// Promotion token used when the engine simulates pawn moves.
pub(crate) const SIMULATED_PROMOTION: &str = "xq";

/// Square of the pawn an en passant capture onto `to` would remove.
fn en_passant_victim(from: Position, to: Position) -> Option<Position> {
    Position::new(to.x(), from.y())
}

fn is_en_passant(state: &GameState, from: Position, to: Position, piece: Piece) -> bool {
    if state.en_passant_target() != Some(to) || !state.board().is_empty(to) {
        return false;
    }
    en_passant_victim(from, to)
        .and_then(|pos| state.board().get(pos))
        .is_some_and(|victim| victim.kind() == PieceKind::Pawn && victim.color() != piece.color())
}

pub(crate) fn is_valid_move(state: &GameState, from: Position, to: Position, piece: Piece) -> bool {
    let color = piece.color();
    let step = color.pawn_direction();
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let board = state.board();

    if dx == 0 && dy == step {
        board.is_empty(to)
    } else if dx == 0 && dy == 2 * step {
        from.y() == color.pawn_start_rank()
            && from.offset(0, step).is_some_and(|skipped| board.is_empty(skipped))
            && board.is_empty(to)
    } else if dx.abs() == 1 && dy == step {
        match board.get(to) {
            Some(target) => target.color() != color,
            None => is_en_passant(state, from, to, piece),
        }
    } else {
        false
    }
}

pub(crate) fn candidate_moves(_: &GameState, from: Position, piece: Piece) -> Vec<Position> {
    let step = piece.color().pawn_direction();
    [(0, step), (0, 2 * step), (-1, step), (1, step)]
        .into_iter()
        .filter_map(|(dx, dy)| from.offset(dx, dy))
        .collect()
}

/// Reads the promoted kind from a two-character token such as `xq`.
fn promotion_kind(token: Option<&str>) -> Result<PieceKind, RulesError> {
    let invalid = || RulesError::InvalidPromotion(token.map(str::to_string));
    let token = token.ok_or_else(invalid)?;
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(_), Some(letter), None) => PieceKind::from_promotion_letter(letter).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

pub(crate) fn apply(
    state: &mut GameState,
    tx: &mut Transaction,
    from: Position,
    to: Position,
    piece: Piece,
    promotion: Option<&str>,
) -> Result<MoveOutcome, RulesError> {
    let color = piece.color();
    let promoted_kind = if to.y() == color.promotion_rank() {
        Some(promotion_kind(promotion)?)
    } else {
        None
    };

    let mut outcome = MoveOutcome::accepted(piece.id());
    if is_en_passant(state, from, to, piece)
        && let Some(victim) = en_passant_victim(from, to)
    {
        let captured = state.place(tx, victim, None);
        outcome.set_captured(captured.map(|p| p.id()));
        outcome.set_en_passant_capture(victim);
    }

    let landing = match promoted_kind {
        Some(kind) => {
            let id = state.mint(color, kind);
            debug!(pawn = %piece.id(), promoted = %id, "Pawn promoted");
            outcome.set_promotion(id);
            Piece::new(id).with_moved(kind == PieceKind::Rook)
        }
        None => piece.moved(),
    };
    state.place(tx, from, None);
    let captured = state.place(tx, to, Some(landing));
    outcome.set_captured(captured.map(|p| p.id()));

    state.en_passant_target = if (to.y() - from.y()).abs() == 2 {
        from.offset(0, color.pawn_direction())
    } else {
        None
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_token_parsing() {
        assert_eq!(promotion_kind(Some("xq")), Ok(PieceKind::Queen));
        assert_eq!(promotion_kind(Some("wn")), Ok(PieceKind::Knight));
        assert_eq!(
            promotion_kind(None),
            Err(RulesError::InvalidPromotion(None))
        );
        assert_eq!(
            promotion_kind(Some("q")),
            Err(RulesError::InvalidPromotion(Some("q".to_string())))
        );
        assert_eq!(
            promotion_kind(Some("xk")),
            Err(RulesError::InvalidPromotion(Some("xk".to_string())))
        );
        assert!(promotion_kind(Some("xqq")).is_err());
    }

    #[test]
    fn test_double_step_needs_clear_path() {
        let state = GameState::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").expect("fen");
        let e2 = Position::from_notation("e2").expect("e2");
        let e4 = Position::from_notation("e4").expect("e4");
        let pawn = state.board().get(e2).expect("pawn");
        assert!(!is_valid_move(&state, e2, e4, pawn));
    }
}
