//! Static position scoring.
//!
//! Search delegates leaf evaluation to a [`BoardScorer`]. Scores are in
//! tenths of a pawn and always taken from the engine's side, whichever
//! colour is to move.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::legal_move_count;

/// Extreme score returned when one side has no legal move at all.
pub const MATE_SCORE: Score = 1_000_000;

pub trait BoardScorer {
    /// Score from the perspective of the engine's colour. May apply and undo
    /// moves internally; the position is unchanged on return.
    fn score(&self, game_state: &mut GameState) -> Score;
}

/// Material, pawn structure and mobility.
///
/// `10 * material - 5 * (pawn faults difference) + (legal move difference)`.
/// A side without a legal move short-circuits to `-MATE_SCORE` (engine) or
/// `MATE_SCORE` (opponent); whether that is mate or stalemate is decided by
/// the session, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialMobilityScorer;

impl MaterialMobilityScorer {
    pub const MATERIAL_WEIGHT: Score = 10;
    pub const PAWN_FAULT_WEIGHT: Score = 5;
    pub const MOBILITY_WEIGHT: Score = 1;
}

impl BoardScorer for MaterialMobilityScorer {
    fn score(&self, game_state: &mut GameState) -> Score {
        let engine = game_state.engine_color();
        let opponent = engine.opposite();

        let own_moves = legal_move_count(game_state, engine) as Score;
        if own_moves == 0 {
            return -MATE_SCORE;
        }
        let opponent_moves = legal_move_count(game_state, opponent) as Score;
        if opponent_moves == 0 {
            return MATE_SCORE;
        }

        let faults = pawn_faults(game_state, engine).total() - pawn_faults(game_state, opponent).total();

        Self::MATERIAL_WEIGHT * game_state.material_balance()
            - Self::PAWN_FAULT_WEIGHT * faults
            + Self::MOBILITY_WEIGHT * (own_moves - opponent_moves)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnFaults {
    /// No friendly pawn on either adjacent file.
    pub isolated: Score,
    /// Pawns beyond the first on a file.
    pub doubled: Score,
    /// Advance square occupied by an opponent piece.
    pub blocked: Score,
}

impl PawnFaults {
    #[inline]
    pub fn total(&self) -> Score {
        self.isolated + self.doubled + self.blocked
    }
}

pub fn pawn_faults(game_state: &GameState, color: Color) -> PawnFaults {
    let pawns: Vec<Square> = game_state
        .live_pieces(color, PieceKind::Pawn)
        .map(|id| game_state.piece(id).square)
        .collect();

    let mut per_file = [0 as Score; 8];
    for &square in &pawns {
        per_file[file_of(square) as usize] += 1;
    }

    let mut faults = PawnFaults {
        doubled: per_file.iter().map(|&n| (n - 1).max(0)).sum(),
        ..PawnFaults::default()
    };

    for &square in &pawns {
        let file = file_of(square) as usize;
        let left = file.checked_sub(1).map_or(0, |f| per_file[f]);
        let right = per_file.get(file + 1).copied().unwrap_or(0);
        if left + right == 0 {
            faults.isolated += 1;
        }

        let ahead = square as i8 + color.pawn_push();
        if (0..64).contains(&ahead)
            && game_state
                .piece_on(ahead as Square)
                .is_some_and(|p| p.color != color)
        {
            faults.blocked += 1;
        }
    }

    faults
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        let mut game = GameState::new_game(Color::Dark);
        assert_eq!(MaterialMobilityScorer.score(&mut game), 0);
        assert_eq!(pawn_faults(&game, Color::Light), PawnFaults::default());
    }

    #[test]
    fn pawn_faults_follow_their_definitions() {
        // Light: doubled c-pawns (both isolated), lone g-pawn isolated and
        // blocked by a dark knight.
        let game = GameState::from_fen("4k3/8/8/8/6n1/2P3P1/2P5/4K3 w - - 0 1", Color::Light)
            .expect("FEN should parse");
        let faults = pawn_faults(&game, Color::Light);
        assert_eq!(
            faults,
            PawnFaults {
                isolated: 3,
                doubled: 1,
                blocked: 1
            }
        );
    }

    #[test]
    fn extra_material_dominates() {
        let mut up_a_rook = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", Color::Light)
            .expect("FEN should parse");
        let score = MaterialMobilityScorer.score(&mut up_a_rook);
        assert!(score > 40, "score {score} should reflect the extra rook");

        let mut same_for_dark = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", Color::Dark)
            .expect("FEN should parse");
        assert!(MaterialMobilityScorer.score(&mut same_for_dark) < -40);
    }

    #[test]
    fn side_without_moves_gets_the_sentinel() {
        // Dark to move and mated.
        let mut mated = GameState::from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1", Color::Dark)
            .expect("FEN should parse");
        assert_eq!(MaterialMobilityScorer.score(&mut mated), -MATE_SCORE);

        let mut winning = GameState::from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1", Color::Light)
            .expect("FEN should parse");
        assert_eq!(MaterialMobilityScorer.score(&mut winning), MATE_SCORE);
    }
}
