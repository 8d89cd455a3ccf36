//! Canonical chess-rule constants.
//!
//! Starting layout, promotion choices and the fixed castling geometry shared
//! by move generation, legality checks and hashing.

use crate::game_state::chess_types::{Color, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Kinds a pawn may promote to, in the order candidates are emitted.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Kind order used when generating every move of one side.
pub const GENERATION_ORDER: [PieceKind; 6] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::King,
    PieceKind::Pawn,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastlingWing {
    King,
    Queen,
}

impl CastlingWing {
    pub const BOTH: [CastlingWing; 2] = [CastlingWing::King, CastlingWing::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastlingWing::King => 0,
            CastlingWing::Queen => 1,
        }
    }
}

/// Fixed squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingGeometry {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub empty: &'static [Square],
    /// Squares the king crosses or lands on; none may be attacked.
    pub king_path: [Square; 2],
}

const LIGHT_KINGSIDE: CastlingGeometry = CastlingGeometry {
    king_from: 4,
    king_to: 6,
    rook_from: 7,
    rook_to: 5,
    empty: &[5, 6],
    king_path: [5, 6],
};

const LIGHT_QUEENSIDE: CastlingGeometry = CastlingGeometry {
    king_from: 4,
    king_to: 2,
    rook_from: 0,
    rook_to: 3,
    empty: &[1, 2, 3],
    king_path: [3, 2],
};

const DARK_KINGSIDE: CastlingGeometry = CastlingGeometry {
    king_from: 60,
    king_to: 62,
    rook_from: 63,
    rook_to: 61,
    empty: &[61, 62],
    king_path: [61, 62],
};

const DARK_QUEENSIDE: CastlingGeometry = CastlingGeometry {
    king_from: 60,
    king_to: 58,
    rook_from: 56,
    rook_to: 59,
    empty: &[57, 58, 59],
    king_path: [59, 58],
};

#[inline]
pub const fn castling_geometry(color: Color, wing: CastlingWing) -> CastlingGeometry {
    match (color, wing) {
        (Color::Light, CastlingWing::King) => LIGHT_KINGSIDE,
        (Color::Light, CastlingWing::Queen) => LIGHT_QUEENSIDE,
        (Color::Dark, CastlingWing::King) => DARK_KINGSIDE,
        (Color::Dark, CastlingWing::Queen) => DARK_QUEENSIDE,
    }
}
