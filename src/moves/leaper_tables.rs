//! Precomputed destination masks for the pieces that jump a fixed offset:
//! king, knight and the two pawn capture patterns.

use crate::game_state::chess_types::{Color, Square};

const KING_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const LIGHT_PAWN_CAPTURES: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const DARK_PAWN_CAPTURES: [(i32, i32); 2] = [(-1, -1), (1, -1)];

pub const KING_TARGETS: [u64; 64] = build_table(&KING_STEPS);
pub const KNIGHT_TARGETS: [u64; 64] = build_table(&KNIGHT_STEPS);
const PAWN_CAPTURE_TARGETS: [[u64; 64]; 2] = [
    build_table(&LIGHT_PAWN_CAPTURES),
    build_table(&DARK_PAWN_CAPTURES),
];

#[inline]
pub const fn king_targets(square: Square) -> u64 {
    KING_TARGETS[square as usize]
}

#[inline]
pub const fn knight_targets(square: Square) -> u64 {
    KNIGHT_TARGETS[square as usize]
}

/// The diagonal squares a pawn of `color` on `square` may capture on.
#[inline]
pub const fn pawn_capture_targets(color: Color, square: Square) -> u64 {
    PAWN_CAPTURE_TARGETS[color.index()][square as usize]
}

const fn build_table(steps: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut mask = 0u64;
        let mut i = 0;

        while i < steps.len() {
            let (df, dr) = steps[i];
            let (f, r) = (file + df, rank + dr);
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                mask |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }

        table[sq] = mask;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_king_has_three_targets() {
        assert_eq!(king_targets(0).count_ones(), 3);
        assert_eq!(king_targets(27).count_ones(), 8);
    }

    #[test]
    fn knight_targets_shrink_near_edges() {
        assert_eq!(knight_targets(27).count_ones(), 8);
        assert_eq!(knight_targets(0).count_ones(), 2);
        assert_eq!(knight_targets(6), (1u64 << 12) | (1u64 << 21) | (1u64 << 23));
    }

    #[test]
    fn pawn_captures_point_forward_for_each_colour() {
        let e2 = 12;
        assert_eq!(pawn_capture_targets(Color::Light, e2), (1u64 << 19) | (1u64 << 21));
        let e7 = 52;
        assert_eq!(pawn_capture_targets(Color::Dark, e7), (1u64 << 43) | (1u64 << 45));
        assert_eq!(pawn_capture_targets(Color::Light, 8), 1u64 << 17);
        assert_eq!(pawn_capture_targets(Color::Light, 60), 0);
    }
}
