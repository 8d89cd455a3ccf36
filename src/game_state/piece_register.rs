use crate::game_state::chess_types::{PieceId, PieceKind};

/// Per-colour registry: for every kind, the ids of that colour's pieces in
/// insertion order, captured ones included.
///
/// Promotion appends to the promoted kind's list and undo pops it again, so
/// the lists behave as stacks during search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PieceRegister {
    by_kind: [Vec<PieceId>; 6],
}

impl PieceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ids(&self, kind: PieceKind) -> &[PieceId] {
        &self.by_kind[kind.index()]
    }

    #[inline]
    pub fn push(&mut self, kind: PieceKind, id: PieceId) {
        self.by_kind[kind.index()].push(id);
    }

    /// Remove the most recently appended id of `kind`.
    #[inline]
    pub fn pop(&mut self, kind: PieceKind) -> Option<PieceId> {
        self.by_kind[kind.index()].pop()
    }

    /// The king is always the first (and only) king entry.
    #[inline]
    pub fn king(&self) -> Option<PieceId> {
        self.by_kind[PieceKind::King.index()].first().copied()
    }

    pub fn len(&self) -> usize {
        self.by_kind.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
