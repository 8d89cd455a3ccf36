//! Per-ply refutation weights used for move ordering.
//!
//! Whenever a child node reports a best reply, that reply's origin and
//! destination gain weight at the child's ply. Candidates at a ply are then
//! tried heaviest first.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::game_state::chess_types::{Move, Square};

#[derive(Debug, Clone, Default)]
pub struct RefutationTable {
    by_ply: Vec<HashMap<(Square, Square), u32>>,
}

impl RefutationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, ply: usize, mv: &Move, weight: u32) {
        if self.by_ply.len() <= ply {
            self.by_ply.resize_with(ply + 1, HashMap::new);
        }
        *self.by_ply[ply].entry((mv.from, mv.to)).or_insert(0) += weight;
    }

    pub fn weight(&self, ply: usize, mv: &Move) -> u32 {
        self.by_ply
            .get(ply)
            .and_then(|table| table.get(&(mv.from, mv.to)))
            .copied()
            .unwrap_or(0)
    }

    /// Stable sort: heaviest refutations first, then captures before quiet
    /// moves. Equal moves keep generation order.
    pub fn order(&self, ply: usize, moves: &mut [Move]) {
        moves.sort_by_key(|mv| (Reverse(self.weight(ply, mv)), mv.captured.is_none()));
    }
}

#[cfg(test)]
mod tests {
    use super::RefutationTable;
    use crate::game_state::chess_types::Move;

    #[test]
    fn weights_accumulate_per_ply() {
        let mut table = RefutationTable::new();
        let mv = Move::new(12, 28);
        table.credit(2, &mv, 3);
        table.credit(2, &mv, 2);
        assert_eq!(table.weight(2, &mv), 5);
        assert_eq!(table.weight(1, &mv), 0);
        assert_eq!(table.weight(9, &mv), 0);
    }

    #[test]
    fn weight_leads_then_captures_then_generation_order() {
        let mut table = RefutationTable::new();
        let quiet_a = Move::new(1, 18);
        let quiet_b = Move::new(6, 21);
        let quiet_c = Move::new(12, 20);
        let mut capture = Move::new(3, 39);
        capture.captured = Some(7);

        table.credit(1, &quiet_c, 4);
        let mut moves = vec![quiet_a, quiet_b, capture, quiet_c];
        table.order(1, &mut moves);

        assert_eq!(moves, vec![quiet_c, capture, quiet_a, quiet_b]);
    }
}
