//! Knight and sliding pieces.

use crate::position::{DIAGONAL, DIRECTIONS, KNIGHT_OFFSETS, ORTHOGONAL};
use crate::state::Transaction;
use crate::{GameState, MoveOutcome, Piece, Position, RulesError};

fn path_is_clear(state: &GameState, from: Position, to: Position) -> bool {
    from.squares_between(to)
        .into_iter()
        .all(|pos| state.board().is_empty(pos))
}

pub(crate) fn knight_is_valid_move(_: &GameState, from: Position, to: Position, _: Piece) -> bool {
    let dx = (to.x() - from.x()).abs();
    let dy = (to.y() - from.y()).abs();
    matches!((dx, dy), (1, 2) | (2, 1))
}

pub(crate) fn bishop_is_valid_move(state: &GameState, from: Position, to: Position, _: Piece) -> bool {
    let dx = (to.x() - from.x()).abs();
    let dy = (to.y() - from.y()).abs();
    dx == dy && dx > 0 && path_is_clear(state, from, to)
}

pub(crate) fn rook_is_valid_move(state: &GameState, from: Position, to: Position, _: Piece) -> bool {
    let straight = (from.x() == to.x()) != (from.y() == to.y());
    straight && path_is_clear(state, from, to)
}

pub(crate) fn queen_is_valid_move(state: &GameState, from: Position, to: Position, piece: Piece) -> bool {
    bishop_is_valid_move(state, from, to, piece) || rook_is_valid_move(state, from, to, piece)
}

/// Walks each ray up to and including the first occupied square.
fn ray_candidates(state: &GameState, from: Position, piece: Piece, directions: &[(i8, i8)]) -> Vec<Position> {
    let mut squares = Vec::new();
    for &(dx, dy) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dx, dy) {
            match state.board().get(next) {
                None => squares.push(next),
                Some(other) => {
                    if other.color() != piece.color() {
                        squares.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    squares
}

pub(crate) fn knight_candidate_moves(state: &GameState, from: Position, piece: Piece) -> Vec<Position> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|(dx, dy)| from.offset(*dx, *dy))
        .filter(|pos| state.board().get(*pos).is_none_or(|p| p.color() != piece.color()))
        .collect()
}

pub(crate) fn bishop_candidate_moves(state: &GameState, from: Position, piece: Piece) -> Vec<Position> {
    ray_candidates(state, from, piece, &DIAGONAL)
}

pub(crate) fn rook_candidate_moves(state: &GameState, from: Position, piece: Piece) -> Vec<Position> {
    ray_candidates(state, from, piece, &ORTHOGONAL)
}

pub(crate) fn queen_candidate_moves(state: &GameState, from: Position, piece: Piece) -> Vec<Position> {
    ray_candidates(state, from, piece, &DIRECTIONS)
}

/// Plain relocation with optional capture. Clears the en passant target.
pub(crate) fn apply(
    state: &mut GameState,
    tx: &mut Transaction,
    from: Position,
    to: Position,
    piece: Piece,
    _promotion: Option<&str>,
) -> Result<MoveOutcome, RulesError> {
    let mut outcome = MoveOutcome::accepted(piece.id());
    state.place(tx, from, None);
    let captured = state.place(tx, to, Some(piece.moved()));
    outcome.set_captured(captured.map(|p| p.id()));
    state.en_passant_target = None;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(token: &str) -> Position {
        Position::from_notation(token).expect("valid square")
    }

    #[test]
    fn test_sliders_stop_at_blockers() {
        let state = GameState::new();
        let rook = state.board().get(sq("a1")).expect("rook");
        assert!(!rook_is_valid_move(&state, sq("a1"), sq("a3"), rook));
        assert!(rook_candidate_moves(&state, sq("a1"), rook).is_empty());

        let state = GameState::from_fen("4k3/8/8/8/3p4/8/8/Q3K3 w - - 0 1").expect("fen");
        let queen = state.board().get(sq("a1")).expect("queen");
        let reach = queen_candidate_moves(&state, sq("a1"), queen);
        assert!(reach.contains(&sq("d4")));
        assert!(!reach.contains(&sq("e5")));
        assert!(!reach.contains(&sq("e1")), "own king blocks the rank");
    }

    #[test]
    fn test_knight_jumps_over_pieces() {
        let state = GameState::new();
        let knight = state.board().get(sq("b1")).expect("knight");
        assert!(knight_is_valid_move(&state, sq("b1"), sq("c3"), knight));
        assert!(!knight_is_valid_move(&state, sq("b1"), sq("b3"), knight));
        let reach = knight_candidate_moves(&state, sq("b1"), knight);
        assert_eq!(reach.len(), 2, "d2 holds a friendly pawn");
    }
}
