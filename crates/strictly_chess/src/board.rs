//! The 8x8 grid of piece slots.

use crate::{Color, Piece, PieceId, PieceKind, Position};

/// Back-rank piece order from the `a` file to the `h` file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 chess board. `None` marks an empty square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Squares indexed `[y][x]`.
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Creates the standard starting position.
    ///
    /// Ids are numbered in `a`-to-`h` order per kind: `wp1` stands on `a2`,
    /// `wr2` on `h1`, `bn1` on `b8`.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let mut counts = [0u8; 6];
            let mut mint = |kind: PieceKind| {
                counts[kind.index()] += 1;
                Piece::new(PieceId::new(color, kind, counts[kind.index()]))
            };
            let back = color.back_rank() as usize;
            let pawns = color.pawn_start_rank() as usize;
            for (x, kind) in BACK_RANK.iter().enumerate() {
                board.squares[back][x] = Some(mint(*kind));
            }
            for x in 0..8 {
                board.squares[pawns][x] = Some(mint(PieceKind::Pawn));
            }
        }
        board
    }

    /// Returns the piece on a square.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.y() as usize][pos.x() as usize]
    }

    /// Replaces the contents of a square, returning what was there.
    pub fn set(&mut self, pos: Position, square: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[pos.y() as usize][pos.x() as usize], square)
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Iterates over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Formats the board as a text diagram, rank 8 on top.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for y in (0..8).rev() {
            result.push(char::from(b'1' + y as u8));
            result.push(' ');
            for x in 0..8 {
                let symbol = Position::new(x, y)
                    .and_then(|pos| self.get(pos))
                    .map(|piece| piece.fen_letter())
                    .unwrap_or('.');
                result.push(symbol);
                if x < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h");
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
