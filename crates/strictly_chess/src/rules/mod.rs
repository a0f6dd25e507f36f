//! Per-piece move rules.
//!
//! Each piece kind contributes a [`KindRules`] entry: a legality test, a
//! generator of candidate destinations, and the board mutation that applies
//! an accepted move. [`rules_for`] selects the entry for a kind, and
//! [`move_piece`] drives the common protocol around it:
//!
//! 1. reject moves onto a friendly piece or an enemy king
//! 2. run the kind's legality test
//! 3. apply inside a [`Transaction`]
//! 4. verify the mover's king is safe, rolling back otherwise

pub mod check;
pub mod endgame;
mod king;
mod pawn;
mod pieces;

use crate::state::Transaction;
use crate::{GameState, MoveOutcome, Piece, PieceKind, Position, RulesError};
use tracing::{debug, instrument};

pub use check::{is_in_check, is_king_safe_after_piece_moved, threats};
pub use endgame::{Termination, evaluate};

/// Legality test: geometry and path for the kind, without king safety.
pub(crate) type IsValidMove = fn(&GameState, Position, Position, Piece) -> bool;

/// Geometrically reachable destinations, before legality is checked.
pub(crate) type CandidateMoves = fn(&GameState, Position, Piece) -> Vec<Position>;

/// Applies an accepted move, recording writes in the transaction.
pub(crate) type ApplyMove = fn(
    &mut GameState,
    &mut Transaction,
    Position,
    Position,
    Piece,
    Option<&str>,
) -> Result<MoveOutcome, RulesError>;

/// Rule functions of one piece kind.
pub(crate) struct KindRules {
    pub(crate) is_valid_move: IsValidMove,
    pub(crate) candidate_moves: CandidateMoves,
    pub(crate) apply: ApplyMove,
}

const PAWN: KindRules = KindRules {
    is_valid_move: pawn::is_valid_move,
    candidate_moves: pawn::candidate_moves,
    apply: pawn::apply,
};

const KNIGHT: KindRules = KindRules {
    is_valid_move: pieces::knight_is_valid_move,
    candidate_moves: pieces::knight_candidate_moves,
    apply: pieces::apply,
};

const BISHOP: KindRules = KindRules {
    is_valid_move: pieces::bishop_is_valid_move,
    candidate_moves: pieces::bishop_candidate_moves,
    apply: pieces::apply,
};

const ROOK: KindRules = KindRules {
    is_valid_move: pieces::rook_is_valid_move,
    candidate_moves: pieces::rook_candidate_moves,
    apply: pieces::apply,
};

const QUEEN: KindRules = KindRules {
    is_valid_move: pieces::queen_is_valid_move,
    candidate_moves: pieces::queen_candidate_moves,
    apply: pieces::apply,
};

const KING: KindRules = KindRules {
    is_valid_move: king::is_valid_move,
    candidate_moves: king::candidate_moves,
    apply: king::apply,
};

/// Rule table entry for a piece kind.
pub(crate) fn rules_for(kind: PieceKind) -> &'static KindRules {
    match kind {
        PieceKind::Pawn => &PAWN,
        PieceKind::Knight => &KNIGHT,
        PieceKind::Bishop => &BISHOP,
        PieceKind::Rook => &ROOK,
        PieceKind::Queen => &QUEEN,
        PieceKind::King => &KING,
    }
}

/// Moves the piece on `from` to `to` if the move is legal.
///
/// An illegal move yields [`MoveOutcome::rejected`] and leaves the state
/// unchanged. Side-to-move ownership is the caller's concern. Errors are
/// reserved for contract violations: an empty origin square or a missing or
/// malformed promotion token on a pawn move that reaches the last rank.
#[instrument(skip(state), fields(from = %from, to = %to))]
pub fn move_piece(
    state: &mut GameState,
    from: Position,
    to: Position,
    promotion: Option<&str>,
) -> Result<MoveOutcome, RulesError> {
    match attempt(state, from, to, promotion)? {
        Some((outcome, _committed)) => Ok(outcome),
        None => {
            debug!("Move rejected");
            Ok(MoveOutcome::rejected())
        }
    }
}

/// Applies a move and returns its undo log, or `None` if it is illegal.
///
/// On `None` the state is exactly as it was before the call.
pub(crate) fn attempt(
    state: &mut GameState,
    from: Position,
    to: Position,
    promotion: Option<&str>,
) -> Result<Option<(MoveOutcome, Transaction)>, RulesError> {
    let piece = state.board().get(from).ok_or(RulesError::EmptySquare(from))?;
    if from == to {
        return Ok(None);
    }
    if let Some(target) = state.board().get(to)
        && (target.color() == piece.color() || target.kind() == PieceKind::King)
    {
        return Ok(None);
    }

    let rules = rules_for(piece.kind());
    if !(rules.is_valid_move)(state, from, to, piece) {
        return Ok(None);
    }

    let mut tx = Transaction::begin(state);
    let outcome = match (rules.apply)(state, &mut tx, from, to, piece, promotion) {
        Ok(outcome) => outcome,
        Err(error) => {
            state.rollback(tx);
            return Err(error);
        }
    };

    let color = piece.color();
    let king = state.king_position(color);
    let safe = if piece.kind() == PieceKind::King {
        !is_in_check(state.board(), color, king)
    } else {
        is_king_safe_after_piece_moved(state.board(), color, king)
    };
    if !safe {
        state.rollback(tx);
        return Ok(None);
    }
    Ok(Some((outcome, tx)))
}

/// Legal destinations of the piece on `from`, found by trial application.
///
/// Pawn moves onto the last rank are tried as queen promotions.
pub fn legal_moves(state: &mut GameState, from: Position) -> Result<Vec<Position>, RulesError> {
    let piece = state.board().get(from).ok_or(RulesError::EmptySquare(from))?;
    let mut legal = Vec::new();
    for to in (rules_for(piece.kind()).candidate_moves)(state, from, piece) {
        if let Some((_, tx)) = attempt(state, from, to, Some(pawn::SIMULATED_PROMOTION))? {
            state.rollback(tx);
            legal.push(to);
        }
    }
    Ok(legal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn sq(token: &str) -> Position {
        Position::from_notation(token).expect("valid square")
    }

    #[test]
    fn test_rules_table_covers_every_kind() {
        use strum::IntoEnumIterator;
        let state = GameState::new();
        for kind in PieceKind::iter() {
            let rules = rules_for(kind);
            let from = sq("d4");
            let piece = Piece::new(crate::PieceId::new(Color::White, kind, 1));
            let candidates = (rules.candidate_moves)(&state, from, piece);
            assert!(!candidates.is_empty(), "{kind:?} has candidates from d4");
        }
    }

    #[test]
    fn test_empty_origin_is_error() {
        let mut state = GameState::new();
        let result = move_piece(&mut state, sq("e4"), sq("e5"), None);
        assert_eq!(result, Err(RulesError::EmptySquare(sq("e4"))));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let mut state = GameState::from_fen("4r2k/8/8/8/8/8/4B3/4K3 w - - 0 1").expect("fen");
        let before = state.clone();
        let outcome = move_piece(&mut state, sq("e2"), sq("d3"), None).expect("no error");
        assert!(!*outcome.valid());
        assert_eq!(state, before);
    }

    #[test]
    fn test_legal_moves_from_start() {
        let mut state = GameState::new();
        let knight = legal_moves(&mut state, sq("g1")).expect("knight");
        assert_eq!(knight.len(), 2);
        let pawn = legal_moves(&mut state, sq("e2")).expect("pawn");
        assert_eq!(pawn.len(), 2);
        assert!(legal_moves(&mut state, sq("e1")).expect("king").is_empty());
        assert_eq!(state, GameState::new());
    }
}
