//! Square-pair move notation.
//!
//! Converts between coordinates such as `e4` and square indices, and parses
//! the moves a human submits: `e2 e4`, `e2e4`, or `e7e8q` with a promotion
//! letter.

use std::fmt;
use std::str::FromStr;

use crate::chess_errors::{EngineError, EngineResult};
use crate::game_state::chess_types::{Move, PieceKind, Square};

/// Convert a coordinate such as "e4" to a square index.
pub fn algebraic_to_square(square: &str) -> EngineResult<Square> {
    let mut chars = square.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(EngineError::MalformedSquare(square.to_owned()));
    };

    if !('a'..='h').contains(&file) {
        return Err(EngineError::InvalidFile(file));
    }
    if !('1'..='8').contains(&rank) {
        return Err(EngineError::InvalidRank(rank));
    }

    Ok((rank as u8 - b'1') * 8 + (file as u8 - b'a'))
}

/// Coordinate name of a square index, e.g. `28 -> "e4"`.
pub fn square_name(square: Square) -> String {
    let file = char::from(b'a' + square % 8);
    let rank = char::from(b'1' + square / 8);
    format!("{file}{rank}")
}

/// A move as exchanged with the human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl UserMove {
    /// Parse origin and destination given separately.
    pub fn parse(from: &str, to: &str) -> EngineResult<Self> {
        Ok(Self {
            from: algebraic_to_square(from)?,
            to: algebraic_to_square(to)?,
            promotion: None,
        })
    }

    pub fn with_promotion(self, kind: PieceKind) -> Self {
        Self {
            promotion: Some(kind),
            ..self
        }
    }

    /// Whether `mv` has these squares and this promotion kind.
    #[inline]
    pub fn matches(&self, mv: &Move) -> bool {
        Move::from(*self).same_squares(mv)
    }
}

impl From<Move> for UserMove {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

/// Parse a promotion letter. Only q, r, b and n are accepted.
pub fn parse_promotion(letter: char) -> EngineResult<PieceKind> {
    match PieceKind::from_char(letter) {
        Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
            Ok(kind)
        }
        _ => Err(EngineError::InvalidPromotion(letter)),
    }
}

impl FromStr for UserMove {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if !compact.is_ascii() {
            return Err(EngineError::MalformedSquare(s.trim().to_owned()));
        }
        let (squares, promotion) = match compact.len() {
            4 => (compact.as_str(), None),
            5 => {
                let (squares, letter) = compact.split_at(4);
                let letter = letter
                    .chars()
                    .next()
                    .ok_or_else(|| EngineError::MalformedSquare(s.to_owned()))?;
                (squares, Some(parse_promotion(letter)?))
            }
            _ => return Err(EngineError::MalformedSquare(s.trim().to_owned())),
        };

        let (from, to) = squares.split_at(2);
        let parsed = Self::parse(from, to)?;
        Ok(Self { promotion, ..parsed })
    }
}

impl From<UserMove> for Move {
    fn from(user_move: UserMove) -> Self {
        Self {
            promotion: user_move.promotion,
            ..Move::new(user_move.from, user_move.to)
        }
    }
}

impl fmt::Display for UserMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from), square_name(self.to))?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_squares_convert_both_ways() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(square_name(0), "a1");
        assert_eq!(square_name(28), "e4");
    }

    #[test]
    fn malformed_squares_are_rejected() {
        assert_eq!(
            algebraic_to_square("e"),
            Err(EngineError::MalformedSquare("e".to_owned()))
        );
        assert_eq!(algebraic_to_square("i4"), Err(EngineError::InvalidFile('i')));
        assert_eq!(algebraic_to_square("e9"), Err(EngineError::InvalidRank('9')));
        assert!(algebraic_to_square("e44").is_err());
    }

    #[test]
    fn user_move_accepts_spaced_and_compact_forms() {
        let spaced: UserMove = "e2 e4".parse().expect("spaced form should parse");
        let compact: UserMove = "e2e4".parse().expect("compact form should parse");
        assert_eq!(spaced, compact);
        assert_eq!(compact, UserMove::parse("e2", "e4").expect("pair should parse"));
    }

    #[test]
    fn promotion_letter_is_parsed_and_printed() {
        let mv: UserMove = "e7e8q".parse().expect("promotion should parse");
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!("e7e8k".parse::<UserMove>(), Err(EngineError::InvalidPromotion('k')));
    }

    #[test]
    fn user_move_matches_squares_and_promotion_only() {
        let mut capture = Move::new(52, 60);
        capture.captured = Some(30);
        let plain: UserMove = "e7e8".parse().expect("move should parse");
        assert!(plain.matches(&capture));

        let queen = plain.with_promotion(PieceKind::Queen);
        assert!(!queen.matches(&capture));
        assert!(queen.matches(&Move { promotion: Some(PieceKind::Queen), ..capture }));
        assert_eq!(Move::from(queen).promotion, Some(PieceKind::Queen));
    }
}
