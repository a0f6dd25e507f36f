//! Attack detection around a king.

use crate::position::{DIAGONAL, DIRECTIONS, KNIGHT_OFFSETS, ORTHOGONAL};
use crate::{Board, Color, PieceKind, Position};
use tracing::instrument;

/// Squares of enemy pieces that attack `square` on behalf of `defender`'s
/// opponent: sliders on the first occupied square of each ray, knights, and
/// pawns on the two squares they capture from.
pub fn threats(board: &Board, defender: Color, square: Position) -> Vec<Position> {
    let enemy = defender.opponent();
    let mut found = Vec::new();

    for (directions, slider) in [(ORTHOGONAL, PieceKind::Rook), (DIAGONAL, PieceKind::Bishop)] {
        for (dx, dy) in directions {
            if let Some((pos, piece)) = first_occupied(board, square, dx, dy)
                && piece.color() == enemy
                && (piece.kind() == slider || piece.kind() == PieceKind::Queen)
            {
                found.push(pos);
            }
        }
    }

    for (dx, dy) in KNIGHT_OFFSETS {
        if let Some(pos) = square.offset(dx, dy)
            && board
                .get(pos)
                .is_some_and(|p| p.color() == enemy && p.kind() == PieceKind::Knight)
        {
            found.push(pos);
        }
    }

    for dx in [-1, 1] {
        if let Some(pos) = square.offset(dx, defender.pawn_direction())
            && board
                .get(pos)
                .is_some_and(|p| p.color() == enemy && p.kind() == PieceKind::Pawn)
        {
            found.push(pos);
        }
    }

    found
}

/// Whether a king of `color` standing on `square` is attacked.
///
/// Also reports adjacency to the enemy king.
#[instrument(skip(board))]
pub fn is_in_check(board: &Board, color: Color, square: Position) -> bool {
    if !threats(board, color, square).is_empty() {
        return true;
    }
    DIRECTIONS.iter().any(|(dx, dy)| {
        square.offset(*dx, *dy).is_some_and(|pos| {
            board
                .get(pos)
                .is_some_and(|p| p.color() != color && p.kind() == PieceKind::King)
        })
    })
}

/// Post-move check for a non-king move: whether the mover's king on
/// `king_square` is free of ray, knight and pawn attacks.
pub fn is_king_safe_after_piece_moved(board: &Board, color: Color, king_square: Position) -> bool {
    threats(board, color, king_square).is_empty()
}

fn first_occupied(
    board: &Board,
    from: Position,
    dx: i8,
    dy: i8,
) -> Option<(Position, crate::Piece)> {
    let mut current = from;
    while let Some(next) = current.offset(dx, dy) {
        if let Some(piece) = board.get(next) {
            return Some((next, piece));
        }
        current = next;
    }
    None
}
