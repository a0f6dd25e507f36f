//! Board coordinates and square notation.
//!
//! `x` is the file index (`a` = 0 .. `h` = 7) and `y` the rank index
//! (`1` = 0 .. `8` = 7). Parsing and formatting use the same mapping, so
//! `Position::from_notation(s)?.to_notation() == s` for every square.

use crate::RulesError;
use tracing::instrument;

/// Rook directions.
pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Bishop directions.
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// All eight king/queen directions.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Knight jumps.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// A square on the 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: i8,
    y: i8,
}

impl Position {
    /// The `a1` corner.
    pub const A1: Position = Position { x: 0, y: 0 };

    /// Creates a position, or `None` when off the board.
    pub fn new(x: i8, y: i8) -> Option<Self> {
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// File index, 0 for `a`.
    pub fn x(self) -> i8 {
        self.x
    }

    /// Rank index, 0 for rank `1`.
    pub fn y(self) -> i8 {
        self.y
    }

    /// The square `(dx, dy)` away, if still on the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Iterates over all 64 squares, rank by rank from `a1`.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8).flat_map(|y| (0..8).map(move |x| Position { x, y }))
    }

    /// Parses a two-character square token such as `e4`.
    #[instrument]
    pub fn from_notation(token: &str) -> Result<Self, RulesError> {
        let invalid = || RulesError::InvalidSquare(token.to_string());
        let mut chars = token.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let x = match file {
            'a'..='h' => (file as u8 - b'a') as i8,
            _ => return Err(invalid()),
        };
        let y = match rank {
            '1'..='8' => (rank as u8 - b'1') as i8,
            _ => return Err(invalid()),
        };
        Ok(Self { x, y })
    }

    /// Formats the square as a two-character token.
    pub fn to_notation(self) -> String {
        let file = (b'a' + self.x as u8) as char;
        let rank = (b'1' + self.y as u8) as char;
        format!("{file}{rank}")
    }

    /// Unit step from `self` toward `other` when both lie on a common line.
    pub fn direction_to(self, other: Position) -> Option<(i8, i8)> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if (dx, dy) == (0, 0) {
            return None;
        }
        if dx == 0 || dy == 0 || dx.abs() == dy.abs() {
            Some((dx.signum(), dy.signum()))
        } else {
            None
        }
    }

    /// Squares strictly between `self` and `other` along a common line.
    pub fn squares_between(self, other: Position) -> Vec<Position> {
        let Some((dx, dy)) = self.direction_to(other) else {
            return Vec::new();
        };
        let mut squares = Vec::new();
        let mut current = self;
        while let Some(next) = current.offset(dx, dy) {
            if next == other {
                break;
            }
            squares.push(next);
            current = next;
        }
        squares
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

impl std::str::FromStr for Position {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

/// Splits a long-algebraic move such as `e7e8q` into origin, destination and
/// a promotion token in the two-character form the engine expects (`xq`).
#[instrument]
pub fn parse_long_algebraic(
    text: &str,
) -> Result<(Position, Position, Option<String>), RulesError> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(RulesError::InvalidSquare(text.to_string()));
    }
    let from = Position::from_notation(&text[0..2])?;
    let to = Position::from_notation(&text[2..4])?;
    let promotion = text.get(4..5).map(|letter| format!("x{letter}"));
    Ok((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_round_trip_all_squares() {
        for file in 'a'..='h' {
            for rank in '1'..='8' {
                let token = format!("{file}{rank}");
                let pos = Position::from_notation(&token).expect("valid square");
                assert_eq!(pos.to_notation(), token);
            }
        }
    }

    #[test]
    fn test_conventional_mapping() {
        let a1 = Position::from_notation("a1").expect("a1");
        assert_eq!((a1.x(), a1.y()), (0, 0));
        let h8 = Position::from_notation("h8").expect("h8");
        assert_eq!((h8.x(), h8.y()), (7, 7));
        let e2 = Position::from_notation("e2").expect("e2");
        assert_eq!((e2.x(), e2.y()), (4, 1));
    }

    #[test]
    fn test_invalid_notation_rejected() {
        for token in ["", "e", "i1", "a0", "a9", "e22", "E2", "22"] {
            assert!(
                matches!(Position::from_notation(token), Err(RulesError::InvalidSquare(_))),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_squares_between() {
        let a1 = Position::from_notation("a1").expect("a1");
        let d4 = Position::from_notation("d4").expect("d4");
        let between: Vec<String> = a1.squares_between(d4).iter().map(|p| p.to_notation()).collect();
        assert_eq!(between, vec!["b2", "c3"]);

        let b1 = Position::from_notation("b1").expect("b1");
        assert!(a1.squares_between(b1).is_empty());

        let c2 = Position::from_notation("c2").expect("c2");
        assert!(a1.squares_between(c2).is_empty(), "knight geometry has no line");
    }

    #[test]
    fn test_parse_long_algebraic() {
        let (from, to, promo) = parse_long_algebraic("e7e8q").expect("valid");
        assert_eq!(from.to_notation(), "e7");
        assert_eq!(to.to_notation(), "e8");
        assert_eq!(promo.as_deref(), Some("xq"));

        let (_, _, promo) = parse_long_algebraic("g1f3").expect("valid");
        assert_eq!(promo, None);

        assert!(parse_long_algebraic("e9e8").is_err());
    }
}
