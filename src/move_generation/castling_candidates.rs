use crate::game_state::chess_rules::{castling_geometry, CastlingWing};
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{generate_moves_without_castling, GeneratedMoves};

/// Castling candidates for `color`.
///
/// A wing qualifies when its right still holds, the squares between king and
/// rook are empty, and neither the king's transit nor destination square is
/// attacked by the opponent. The king's current square is not examined here.
pub(crate) fn push_castling_candidates(game_state: &GameState, color: Color, out: &mut GeneratedMoves) {
    let mut opponent_attacks = None;

    for wing in CastlingWing::BOTH {
        if !game_state.has_castling_right(color, wing) {
            continue;
        }

        let geometry = castling_geometry(color, wing);
        if geometry
            .empty
            .iter()
            .any(|&sq| game_state.piece_id_on(sq).is_some())
        {
            continue;
        }

        let attacks = *opponent_attacks.get_or_insert_with(|| {
            generate_moves_without_castling(game_state, color.opposite()).attacks
        });
        if geometry
            .king_path
            .iter()
            .any(|&sq| attacks & square_mask(sq) != 0)
        {
            continue;
        }

        let mut mv = Move::new(geometry.king_from, geometry.king_to);
        mv.castling = Some((geometry.rook_from, geometry.rook_to));
        out.push(mv);
    }
}
