//! Checkmate and stalemate detection.
//!
//! Both searches work by trial: each candidate escape is applied through
//! the normal move protocol and rolled back immediately, so the state is
//! unchanged when evaluation returns.

use super::check::threats;
use super::pawn::SIMULATED_PROMOTION;
use super::{attempt, rules_for};
use crate::position::DIRECTIONS;
use crate::{Color, GameState, PieceKind, Position, RulesError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Terminal result detected after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Termination {
    /// The side to move is in check with no escape.
    #[display("Checkmate")]
    Checkmate {
        /// Side that delivered mate.
        winner: Color,
    },
    /// The side to move is not in check and has no legal move.
    #[display("Stalemate")]
    Stalemate,
}

/// Evaluates whether `color`, about to move, is checkmated or stalemated.
#[instrument(skip(state))]
pub fn evaluate(state: &mut GameState, color: Color) -> Result<Option<Termination>, RulesError> {
    let king = state.king_position(color);
    let checkers = threats(state.board(), color, king);

    if checkers.is_empty() {
        if has_any_legal_move(state, color)? {
            return Ok(None);
        }
        debug!(?color, "Stalemate");
        return Ok(Some(Termination::Stalemate));
    }

    if king_can_flee(state, king)? {
        return Ok(None);
    }
    if let [checker] = checkers.as_slice() {
        if checker_can_be_captured(state, color, *checker)? {
            return Ok(None);
        }
        if check_can_be_blocked(state, color, king, *checker)? {
            return Ok(None);
        }
    }
    debug!(?color, checkers = checkers.len(), "Checkmate");
    Ok(Some(Termination::Checkmate {
        winner: color.opponent(),
    }))
}

/// Tries a move and undoes it, reporting whether it was legal.
fn try_move(state: &mut GameState, from: Position, to: Position) -> Result<bool, RulesError> {
    match attempt(state, from, to, Some(SIMULATED_PROMOTION))? {
        Some((_, tx)) => {
            state.rollback(tx);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn king_can_flee(state: &mut GameState, king: Position) -> Result<bool, RulesError> {
    for (dx, dy) in DIRECTIONS {
        if let Some(to) = king.offset(dx, dy)
            && try_move(state, king, to)?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Squares of `color`'s pieces other than the king.
fn defenders(state: &GameState, color: Color) -> Vec<Position> {
    state
        .active_pieces(color)
        .iter()
        .filter(|(id, _)| id.kind() != PieceKind::King)
        .map(|(_, pos)| *pos)
        .collect()
}

fn checker_can_be_captured(
    state: &mut GameState,
    color: Color,
    checker: Position,
) -> Result<bool, RulesError> {
    let mut targets = vec![checker];
    let checker_is_pawn = state
        .board()
        .get(checker)
        .is_some_and(|p| p.kind() == PieceKind::Pawn);
    if checker_is_pawn
        && let Some(target) = state.en_passant_target()
        && target.x() == checker.x()
    {
        targets.push(target);
    }
    for from in defenders(state, color) {
        for &to in &targets {
            if try_move(state, from, to)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn check_can_be_blocked(
    state: &mut GameState,
    color: Color,
    king: Position,
    checker: Position,
) -> Result<bool, RulesError> {
    let is_knight = state
        .board()
        .get(checker)
        .is_some_and(|p| p.kind() == PieceKind::Knight);
    if is_knight {
        return Ok(false);
    }
    let gaps = king.squares_between(checker);
    for from in defenders(state, color) {
        for &to in &gaps {
            if try_move(state, from, to)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn has_any_legal_move(state: &mut GameState, color: Color) -> Result<bool, RulesError> {
    let pieces: Vec<Position> = state.active_pieces(color).values().copied().collect();
    for from in pieces {
        let Some(piece) = state.board().get(from) else {
            continue;
        };
        for to in (rules_for(piece.kind()).candidate_moves)(state, from, piece) {
            if try_move(state, from, to)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_rank_mate() {
        let mut state = GameState::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("fen");
        let before = state.clone();
        let result = evaluate(&mut state, Color::Black).expect("evaluates");
        assert_eq!(
            result,
            Some(Termination::Checkmate {
                winner: Color::White
            })
        );
        assert_eq!(state, before, "evaluation leaves the state untouched");
    }

    #[test]
    fn test_check_resolved_by_block() {
        let mut state = GameState::from_fen("3R2k1/5ppp/8/8/8/8/4r3/6K1 b - - 0 1").expect("fen");
        assert_eq!(evaluate(&mut state, Color::Black).expect("evaluates"), None);
    }

    #[test]
    fn test_double_check_only_king_flight() {
        // Rook e8 and knight d3 both hit the king on e1; c2xd3 removes only
        // one of them.
        let mut state = GameState::from_fen("k3r3/8/8/8/8/3n4/2PP1P2/3QKB2 w - - 0 1").expect("fen");
        let result = evaluate(&mut state, Color::White).expect("evaluates");
        assert_eq!(
            result,
            Some(Termination::Checkmate {
                winner: Color::Black
            })
        );
    }

    #[test]
    fn test_en_passant_resolves_pawn_check() {
        // d7d5 checks the boxed-in king on e4; only exd6 en passant helps.
        let mut state =
            GameState::from_fen("8/8/2p5/3pPP2/3PKP2/3PPP2/8/k7 w - d6 0 1").expect("fen");
        assert_eq!(evaluate(&mut state, Color::White).expect("evaluates"), None);

        let mut no_window =
            GameState::from_fen("8/8/2p5/3pPP2/3PKP2/3PPP2/8/k7 w - - 0 1").expect("fen");
        assert_eq!(
            evaluate(&mut no_window, Color::White).expect("evaluates"),
            Some(Termination::Checkmate {
                winner: Color::Black
            })
        );
    }

    #[test]
    fn test_stalemate_not_checkmate() {
        let mut state = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("fen");
        assert_eq!(
            evaluate(&mut state, Color::Black).expect("evaluates"),
            Some(Termination::Stalemate)
        );
    }
}
