//! Authoritative per-game chess state.
//!
//! `GameState` owns the board together with the indexes derived from it:
//! per-color maps from piece id to square, cached king squares, capture
//! lists and the move history. Every board write goes through
//! [`GameState::put`], which keeps the indexes in step with the board.
//!
//! Move attempts mutate the state inside a [`Transaction`]. A transaction
//! records the prior contents of every square it touches, so a rejected
//! attempt is undone exactly, including en passant victims and promoted
//! pawns.

use crate::{Board, Color, Piece, PieceId, PieceKind, Position, RulesError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// One full move of the history log.
///
/// Entries read `"<pieceId>:<from>:<to>:<capturedId|em>"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct MoveLog {
    /// White's half-move.
    white: Option<String>,
    /// Black's half-move.
    black: Option<String>,
}

/// Board, side to move, en passant target and derived indexes of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) en_passant_target: Option<Position>,
    pub(crate) active: [BTreeMap<PieceId, Position>; 2],
    pub(crate) captures: [Vec<PieceId>; 2],
    pub(crate) history: Vec<MoveLog>,
    pub(crate) king_positions: [Position; 2],
    pub(crate) minted: [[u8; 6]; 2],
}

impl GameState {
    /// Creates the standard starting position with White to move.
    #[instrument]
    pub fn new() -> Self {
        let board = Board::standard();
        let mut state = Self::blank(Color::White);
        for (pos, piece) in board.pieces() {
            state.adopt(pos, piece);
        }
        state
    }

    /// Builds a state from an arbitrary board.
    ///
    /// Fails with [`RulesError::MissingKing`] unless each color has a king.
    #[instrument(skip(board))]
    pub fn from_board(
        board: Board,
        turn: Color,
        en_passant_target: Option<Position>,
    ) -> Result<Self, RulesError> {
        let mut state = Self::blank(turn);
        let mut kings = [false; 2];
        for (pos, piece) in board.pieces() {
            if piece.kind() == PieceKind::King {
                kings[piece.color().index()] = true;
            }
            state.adopt(pos, piece);
        }
        for color in [Color::White, Color::Black] {
            if !kings[color.index()] {
                return Err(RulesError::MissingKing(color));
            }
        }
        state.en_passant_target = en_passant_target;
        Ok(state)
    }

    /// Builds a state from the first four fields of a FEN record
    /// (placement, side to move, castling rights, en passant square).
    ///
    /// Kings and rooks are flagged as moved unless a castling right keeps
    /// them on their home squares. Ids are minted in `a1`..`h8` scan order.
    #[instrument]
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let invalid = |reason: &str| RulesError::InvalidFen(format!("{reason}: {fen:?}"));
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or_else(|| invalid("missing placement"))?;
        let turn = match fields.next().unwrap_or("w") {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("bad side to move")),
        };
        let castling = fields.next().unwrap_or("-");
        let en_passant = match fields.next().unwrap_or("-") {
            "-" => None,
            square => Some(Position::from_notation(square)?),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("expected 8 ranks"));
        }
        let mut placed: Vec<(Position, Color, PieceKind)> = Vec::new();
        for (row, rank) in ranks.iter().enumerate() {
            let y = 7 - row as i8;
            let mut x = 0i8;
            for symbol in rank.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    if skip > 8 || x + skip as i8 > 8 {
                        return Err(invalid("rank too long"));
                    }
                    x += skip as i8;
                    continue;
                }
                let kind = PieceKind::from_letter(symbol).ok_or_else(|| invalid("bad piece letter"))?;
                let color = if symbol.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let pos = Position::new(x, y).ok_or_else(|| invalid("rank too long"))?;
                placed.push((pos, color, kind));
                x += 1;
            }
            if x != 8 {
                return Err(invalid("rank does not cover 8 files"));
            }
        }
        placed.sort_by_key(|(pos, _, _)| (pos.y(), pos.x()));

        let mut board = Board::empty();
        let mut counts = [[0u8; 6]; 2];
        for (pos, color, kind) in placed {
            let count = &mut counts[color.index()][kind.index()];
            *count += 1;
            let unmoved = castling_keeps_unmoved(castling, color, kind, pos);
            let piece = Piece::new(PieceId::new(color, kind, *count)).with_moved(
                matches!(kind, PieceKind::King | PieceKind::Rook) && !unmoved,
            );
            board.set(pos, Some(piece));
        }
        Self::from_board(board, turn, en_passant)
    }

    fn blank(turn: Color) -> Self {
        Self {
            board: Board::empty(),
            turn,
            en_passant_target: None,
            active: [BTreeMap::new(), BTreeMap::new()],
            captures: [Vec::new(), Vec::new()],
            history: Vec::new(),
            king_positions: [Position::A1, Position::A1],
            minted: [[0; 6]; 2],
        }
    }

    /// Places a piece during setup and raises the id counter past it.
    fn adopt(&mut self, pos: Position, piece: Piece) {
        let id = piece.id();
        let counter = &mut self.minted[id.color().index()][id.kind().index()];
        *counter = (*counter).max(id.number());
        self.put(pos, Some(piece));
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Square skipped by the last double pawn step, if the previous
    /// half-move was one.
    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant_target
    }

    /// Live pieces of one color keyed by id.
    pub fn active_pieces(&self, color: Color) -> &BTreeMap<PieceId, Position> {
        &self.active[color.index()]
    }

    /// Square of a live piece.
    pub fn position_of(&self, id: PieceId) -> Option<Position> {
        self.active[id.color().index()].get(&id).copied()
    }

    /// Cached square of a color's king.
    pub fn king_position(&self, color: Color) -> Position {
        self.king_positions[color.index()]
    }

    /// Ids of enemy pieces captured by `color`, in capture order.
    pub fn captures(&self, color: Color) -> &[PieceId] {
        &self.captures[color.index()]
    }

    /// Full-move history.
    pub fn history(&self) -> &[MoveLog] {
        &self.history
    }

    /// Writes a square and updates the id map and king cache.
    ///
    /// Returns the previous occupant.
    pub(crate) fn put(&mut self, pos: Position, square: Option<Piece>) -> Option<Piece> {
        let previous = self.board.set(pos, square);
        if let Some(old) = previous {
            let map = &mut self.active[old.color().index()];
            if map.get(&old.id()) == Some(&pos) {
                map.remove(&old.id());
            }
        }
        if let Some(new) = square {
            self.active[new.color().index()].insert(new.id(), pos);
            if new.kind() == PieceKind::King {
                self.king_positions[new.color().index()] = pos;
            }
        }
        previous
    }

    /// Writes a square, recording its prior contents in the transaction.
    pub(crate) fn place(
        &mut self,
        tx: &mut Transaction,
        pos: Position,
        square: Option<Piece>,
    ) -> Option<Piece> {
        tx.saved.push((pos, self.board.get(pos)));
        self.put(pos, square)
    }

    /// Undoes every write of a transaction in reverse order.
    pub(crate) fn rollback(&mut self, tx: Transaction) {
        for (pos, square) in tx.saved.into_iter().rev() {
            self.put(pos, square);
        }
        self.en_passant_target = tx.en_passant_target;
        self.minted = tx.minted;
    }

    /// Mints a fresh id for a piece created by promotion.
    pub(crate) fn mint(&mut self, color: Color, kind: PieceKind) -> PieceId {
        let counter = &mut self.minted[color.index()][kind.index()];
        *counter = counter.saturating_add(1);
        PieceId::new(color, kind, *counter)
    }

    /// Appends one half-move to the history log.
    pub(crate) fn log_half_move(&mut self, color: Color, entry: String) {
        match color {
            Color::White => self.history.push(MoveLog {
                white: Some(entry),
                black: None,
            }),
            Color::Black => match self.history.last_mut() {
                Some(last) if last.black.is_none() => last.black = Some(entry),
                _ => self.history.push(MoveLog {
                    white: None,
                    black: Some(entry),
                }),
            },
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn castling_keeps_unmoved(rights: &str, color: Color, kind: PieceKind, pos: Position) -> bool {
    let (king_side, queen_side) = match color {
        Color::White => ('K', 'Q'),
        Color::Black => ('k', 'q'),
    };
    if pos.y() != color.back_rank() {
        return false;
    }
    match kind {
        PieceKind::King => pos.x() == 4 && (rights.contains(king_side) || rights.contains(queen_side)),
        PieceKind::Rook => {
            (pos.x() == 7 && rights.contains(king_side)) || (pos.x() == 0 && rights.contains(queen_side))
        }
        _ => false,
    }
}

/// Undo log for one move attempt.
#[derive(Debug)]
pub(crate) struct Transaction {
    saved: Vec<(Position, Option<Piece>)>,
    en_passant_target: Option<Position>,
    minted: [[u8; 6]; 2],
}

impl Transaction {
    /// Opens a transaction against the current state.
    pub(crate) fn begin(state: &GameState) -> Self {
        Self {
            saved: Vec::with_capacity(4),
            en_passant_target: state.en_passant_target,
            minted: state.minted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(token: &str) -> Position {
        Position::from_notation(token).expect("valid square")
    }

    #[test]
    fn test_new_indexes_all_pieces() {
        let state = GameState::new();
        assert_eq!(state.active_pieces(Color::White).len(), 16);
        assert_eq!(state.active_pieces(Color::Black).len(), 16);
        assert_eq!(state.king_position(Color::White), sq("e1"));
        assert_eq!(state.king_position(Color::Black), sq("e8"));
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.en_passant_target(), None);
    }

    #[test]
    fn test_rollback_restores_exactly() {
        let mut state = GameState::new();
        let before = state.clone();
        let mut tx = Transaction::begin(&state);
        let pawn = state.place(&mut tx, sq("e2"), None);
        state.place(&mut tx, sq("e7"), pawn);
        let id = state.mint(Color::White, PieceKind::Queen);
        assert_eq!(id.to_string(), "wq2");
        state.en_passant_target = Some(sq("e3"));
        assert_ne!(state, before);
        state.rollback(tx);
        assert_eq!(state, before);
    }

    #[test]
    fn test_from_fen_castling_flags() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/R3K2R w K - 0 1").expect("valid fen");
        let board = state.board();
        assert!(!board.get(sq("e1")).expect("king").has_moved());
        assert!(!board.get(sq("h1")).expect("rook").has_moved());
        assert!(board.get(sq("a1")).expect("rook").has_moved());
        assert!(board.get(sq("e8")).expect("king").has_moved());
    }

    #[test]
    fn test_from_fen_requires_kings() {
        let result = GameState::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(result, Err(RulesError::MissingKing(Color::Black)));
        assert!(matches!(
            GameState::from_fen("8/8/8 w - - 0 1"),
            Err(RulesError::InvalidFen(_))
        ));
    }

    #[test]
    fn test_from_fen_rejects_overlong_rank() {
        for fen in [
            "99999999999999999/8/8/8/8/8/8/4K2k w - - 0 1",
            "44p/8/8/8/8/8/8/4K2k w - - 0 1",
            "9/8/8/8/8/8/8/4K2k w - - 0 1",
        ] {
            assert!(
                matches!(GameState::from_fen(fen), Err(RulesError::InvalidFen(_))),
                "{fen}"
            );
        }
    }

    #[test]
    fn test_history_pairs_half_moves() {
        let mut state = GameState::new();
        state.log_half_move(Color::White, "wp5:e2:e4:em".to_string());
        state.log_half_move(Color::Black, "bp5:e7:e5:em".to_string());
        state.log_half_move(Color::White, "wn2:g1:f3:em".to_string());
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].black().as_deref(), Some("bp5:e7:e5:em"));
        assert_eq!(state.history()[1].black(), &None);
    }
}
