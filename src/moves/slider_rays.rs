//! Occupancy-aware reach of the sliding pieces.
//!
//! A ray stops at the first occupied square and includes it; whether that
//! square holds a capturable piece is decided by the legality checks.

use crate::game_state::chess_types::Square;

const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub fn rook_reach(square: Square, occupancy: u64) -> u64 {
    ORTHOGONAL
        .iter()
        .fold(0, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn bishop_reach(square: Square, occupancy: u64) -> u64 {
    DIAGONAL
        .iter()
        .fold(0, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn queen_reach(square: Square, occupancy: u64) -> u64 {
    rook_reach(square, occupancy) | bishop_reach(square, occupancy)
}

fn trace_ray(square: Square, file_step: i32, rank_step: i32, occupancy: u64) -> u64 {
    let mut file = (square % 8) as i32 + file_step;
    let mut rank = (square / 8) as i32 + rank_step;
    let mut reach = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << (rank * 8 + file);
        reach |= bit;

        if occupancy & bit != 0 {
            break;
        }

        file += file_step;
        rank += rank_step;
    }

    reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_board_reach_counts() {
        let d4 = 27;
        assert_eq!(rook_reach(d4, 0).count_ones(), 14);
        assert_eq!(bishop_reach(d4, 0).count_ones(), 13);
        assert_eq!(queen_reach(d4, 0).count_ones(), 27);
    }

    #[test]
    fn blocker_is_included_and_stops_the_ray() {
        let a1 = 0;
        let a4 = 1u64 << 24;
        let reach = rook_reach(a1, a4);
        assert_ne!(reach & a4, 0);
        assert_eq!(reach & (1u64 << 32), 0);
        assert_ne!(reach & (1u64 << 7), 0);
    }

    #[test]
    fn diagonal_blocker() {
        let c1 = 2;
        let e3 = 1u64 << 20;
        let reach = bishop_reach(c1, e3);
        assert_ne!(reach & e3, 0);
        assert_eq!(reach & (1u64 << 29), 0);
        assert_ne!(reach & (1u64 << 16), 0);
    }
}
