use crate::game_state::chess_types::{Color, PieceId, PieceKind, Square};

/// One piece of the game. Records are never removed while a game is running,
/// only flagged `captured`; promotion appends a fresh record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRecord {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub captured: bool,
    pub move_count: u16,
    /// Ply at which this pawn advanced two squares.
    pub double_push_ply: Option<u16>,
    /// Pawn this piece replaced, for pieces created by promotion.
    pub promoted_from: Option<PieceId>,
}

impl PieceRecord {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
            captured: false,
            move_count: 0,
            double_push_ply: None,
            promoted_from: None,
        }
    }
}
