//! Core domain types for chess: colors, piece kinds, piece identities.

use serde::{Deserialize, Serialize};

/// Side of the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Color {
    /// White moves first.
    #[serde(rename = "w")]
    #[display("w")]
    White,
    /// Black.
    #[serde(rename = "b")]
    #[display("b")]
    Black,
}

impl Color {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index into per-color tables (White = 0, Black = 1).
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Lowercase letter used in piece ids and notation.
    pub fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Rank step of a pawn of this color.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank a pawn of this color starts on (and may double-step from).
    pub fn pawn_start_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank on which a pawn of this color promotes.
    pub fn promotion_rank(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank the king and rooks of this color start on.
    pub fn back_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

/// Kind of chess piece.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
    /// Queen.
    Queen,
    /// King.
    King,
}

impl PieceKind {
    /// Index into per-kind tables.
    pub fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lowercase letter used in piece ids and FEN.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Parses a piece letter, case-insensitive.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Kinds a pawn may promote to, selected by `q`, `r`, `n` or `b`.
    pub fn from_promotion_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            _ => None,
        }
    }
}

/// Stable identity of a piece for the lifetime of a game, e.g. `wp3`.
///
/// Ids are assigned when a game is set up and survive every move. A promoted
/// pawn is replaced by a piece with a freshly minted id of the new kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    color: Color,
    kind: PieceKind,
    number: u8,
}

impl PieceId {
    /// Creates an id from its parts.
    pub fn new(color: Color, kind: PieceKind, number: u8) -> Self {
        Self {
            color,
            kind,
            number,
        }
    }

    /// Color of the identified piece.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Kind of the identified piece.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Ordinal among pieces of the same color and kind.
    pub fn number(&self) -> u8 {
        self.number
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.color.letter(), self.kind.letter(), self.number)
    }
}

/// A piece standing on the board.
///
/// `has_moved` only matters for kings and rooks (castling eligibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    has_moved: bool,
}

impl Piece {
    /// Creates an unmoved piece.
    pub fn new(id: PieceId) -> Self {
        Self {
            id,
            has_moved: false,
        }
    }

    /// Returns the piece's id.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Returns the piece's color.
    pub fn color(&self) -> Color {
        self.id.color
    }

    /// Returns the piece's kind.
    pub fn kind(&self) -> PieceKind {
        self.id.kind
    }

    /// Whether the piece has moved since setup.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Returns a copy flagged as moved.
    pub fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    /// Returns a copy with the given moved flag.
    pub fn with_moved(self, has_moved: bool) -> Self {
        Self { has_moved, ..self }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn fen_letter(&self) -> char {
        match self.color() {
            Color::White => self.kind().letter().to_ascii_uppercase(),
            Color::Black => self.kind().letter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_id_display() {
        let id = PieceId::new(Color::White, PieceKind::Pawn, 3);
        assert_eq!(id.to_string(), "wp3");
        let id = PieceId::new(Color::Black, PieceKind::Knight, 2);
        assert_eq!(id.to_string(), "bn2");
    }

    #[test]
    fn test_pawn_geometry_by_color() {
        assert_eq!(Color::White.pawn_direction(), 1);
        assert_eq!(Color::Black.pawn_direction(), -1);
        assert_eq!(Color::White.promotion_rank(), 7);
        assert_eq!(Color::Black.pawn_start_rank(), 6);
    }

    #[test]
    fn test_promotion_letters() {
        assert_eq!(PieceKind::from_promotion_letter('Q'), Some(PieceKind::Queen));
        assert_eq!(PieceKind::from_promotion_letter('n'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_promotion_letter('k'), None);
        assert_eq!(PieceKind::from_promotion_letter('p'), None);
    }

    #[test]
    fn test_moved_flag_is_sticky() {
        let rook = Piece::new(PieceId::new(Color::White, PieceKind::Rook, 1));
        assert!(!rook.has_moved());
        assert!(rook.moved().has_moved());
        assert!(!rook.moved().with_moved(false).has_moved());
    }
}
