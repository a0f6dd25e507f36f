//! Turn processing: ownership check, move application, bookkeeping and
//! terminal-state evaluation for one half-move.

use crate::invariants::{ChessInvariants, InvariantSet};
use crate::rules::{self, Termination};
use crate::{Color, GameState, MoveOutcome, MoveRequest, RulesError};
use derive_getters::Getters;
use tracing::{debug, info, instrument};

/// Everything a caller needs to report one processed half-move.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveReport {
    /// Side that attempted the move.
    mover: Color,
    /// Engine result of the attempt.
    outcome: MoveOutcome,
    /// Checkmate or stalemate of the side now to move.
    termination: Option<Termination>,
    /// Whether the side now to move is in check.
    check: bool,
}

impl MoveReport {
    fn rejected(mover: Color) -> Self {
        Self {
            mover,
            outcome: MoveOutcome::rejected(),
            termination: None,
            check: false,
        }
    }

    /// Whether the move was accepted.
    pub fn is_valid(&self) -> bool {
        *self.outcome.valid()
    }
}

impl GameState {
    /// Processes one half-move for the side to move.
    ///
    /// A request whose origin is empty or holds a piece of the wrong color
    /// is rejected like any other illegal move. An accepted move is logged,
    /// its capture recorded, the turn passed, and the opponent evaluated for
    /// checkmate and stalemate.
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn process_move(&mut self, request: &MoveRequest) -> Result<MoveReport, RulesError> {
        let mover = self.turn;
        let from = *request.from();
        let to = *request.to();

        let Some(piece) = self.board.get(from) else {
            debug!(%from, "No piece on origin square");
            return Ok(MoveReport::rejected(mover));
        };
        if piece.color() != mover {
            debug!(piece = %piece.id(), "Piece does not belong to the side to move");
            return Ok(MoveReport::rejected(mover));
        }

        let outcome = rules::move_piece(self, from, to, request.promotion().as_deref())?;
        if !*outcome.valid() {
            return Ok(MoveReport::rejected(mover));
        }

        let captured = *outcome.captured();
        if let Some(id) = captured {
            self.captures[mover.index()].push(id);
        }
        let captured_label = captured.map_or_else(|| "em".to_string(), |id| id.to_string());
        self.log_half_move(mover, format!("{}:{}:{}:{}", piece.id(), from, to, captured_label));

        self.turn = mover.opponent();
        let next = self.turn;
        let check = rules::is_in_check(&self.board, next, self.king_position(next));
        let termination = rules::evaluate(self, next)?;

        debug_assert!(
            ChessInvariants::check_all(self).is_ok(),
            "state invariants violated after {from}{to}"
        );

        match termination {
            Some(result) => info!(%result, %from, %to, "Game reached a terminal position"),
            None => debug!(piece = %piece.id(), %from, %to, check, "Move accepted"),
        }

        Ok(MoveReport {
            mover,
            outcome,
            termination,
            check,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn play(state: &mut GameState, text: &str) -> MoveReport {
        let request = MoveRequest::parse(text).expect("valid notation");
        state.process_move(&request).expect("no contract violation")
    }

    #[test]
    fn test_wrong_color_rejected() {
        let mut state = GameState::new();
        let report = play(&mut state, "e7e5");
        assert!(!report.is_valid());
        assert_eq!(state.turn(), Color::White);
    }

    #[test]
    fn test_history_and_captures() {
        let mut state = GameState::new();
        for text in ["e2e4", "d7d5", "e4d5"] {
            assert!(play(&mut state, text).is_valid(), "{text} accepted");
        }
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].white().as_deref(), Some("wp5:e2:e4:em"));
        assert_eq!(state.history()[0].black().as_deref(), Some("bp4:d7:d5:em"));
        assert_eq!(state.history()[1].white().as_deref(), Some("wp5:e4:d5:bp4"));
        let captured: Vec<String> = state.captures(Color::White).iter().map(|id| id.to_string()).collect();
        assert_eq!(captured, vec!["bp4"]);
        assert!(state.captures(Color::Black).is_empty());
    }

    #[test]
    fn test_check_reported() {
        let mut state = GameState::new();
        for text in ["e2e4", "f7f6"] {
            play(&mut state, text);
        }
        let report = play(&mut state, "d1h5");
        assert!(report.is_valid());
        assert!(*report.check());
        assert_eq!(report.termination(), &None);
        assert_eq!(state.king_position(Color::Black), Position::from_notation("e8").expect("e8"));
    }
}
