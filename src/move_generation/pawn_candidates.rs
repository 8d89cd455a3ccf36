use crate::game_state::chess_rules::PROMOTION_KINDS;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{mask_squares, GeneratedMoves};
use crate::moves::leaper_tables::pawn_capture_targets;

/// Advances, diagonal captures and en passant for one pawn. A move onto the
/// last rank is emitted once per promotion kind.
pub(crate) fn push_pawn_candidates(game_state: &GameState, id: PieceId, out: &mut GeneratedMoves) {
    let pawn = game_state.piece(id);
    let from = pawn.square;
    let color = pawn.color;

    if let Some(one) = advance(from, color) {
        if game_state.piece_id_on(one).is_none() {
            push_with_promotions(Move::new(from, one), color, out);

            if rank_of(from) == color.pawn_start_rank() {
                if let Some(two) = advance(one, color) {
                    if game_state.piece_id_on(two).is_none() {
                        out.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for to in mask_squares(pawn_capture_targets(color, from)) {
        let mut mv = Move::new(from, to);
        mv.captured = match game_state.piece_id_on(to) {
            Some(occupant) => Some(occupant),
            None => en_passant_victim(game_state, color, from, to),
        };

        if mv.captured.is_some() {
            push_with_promotions(mv, color, out);
        }
    }
}

#[inline]
fn advance(square: Square, color: Color) -> Option<Square> {
    let next = square as i8 + color.pawn_push();
    (0..64).contains(&next).then_some(next as Square)
}

/// The enemy pawn beside `from` on the file of `to` that advanced two
/// squares on the ply just played.
fn en_passant_victim(game_state: &GameState, color: Color, from: Square, to: Square) -> Option<PieceId> {
    let beside = rank_of(from) * 8 + file_of(to);
    let victim_id = game_state.piece_id_on(beside)?;
    let victim = game_state.piece(victim_id);

    (victim.kind == PieceKind::Pawn
        && victim.color != color
        && victim.double_push_ply == Some(game_state.ply()))
    .then_some(victim_id)
}

fn push_with_promotions(mv: Move, color: Color, out: &mut GeneratedMoves) {
    if rank_of(mv.to) != color.promotion_rank() {
        out.push(mv);
        return;
    }

    for kind in PROMOTION_KINDS {
        out.push(Move {
            promotion: Some(kind),
            ..mv
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::chess_types::*;
    use crate::move_generation::move_generator::generate_moves;

    fn pawn_moves_from(fen: &str, color: Color, from: Square) -> Vec<Move> {
        let game = GameState::from_fen(fen, Color::Dark).expect("FEN should parse");
        generate_moves(&game, color)
            .moves
            .into_iter()
            .filter(|m| m.from == from)
            .collect()
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_advance() {
        let moves = pawn_moves_from("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Color::Light, 12);
        let targets: Vec<_> = moves.iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![20, 28]);
    }

    #[test]
    fn blocked_pawn_has_no_advance() {
        let moves = pawn_moves_from("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", Color::Light, 12);
        assert!(moves.is_empty());

        let far_blocked = pawn_moves_from("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1", Color::Light, 12);
        assert_eq!(far_blocked.iter().map(|m| m.to).collect::<Vec<_>>(), vec![20]);
    }

    #[test]
    fn diagonal_needs_an_occupant() {
        let moves = pawn_moves_from("4k3/8/8/8/8/3p4/4P3/4K3 w - - 0 1", Color::Light, 12);
        let capture = moves.iter().find(|m| m.to == 19).expect("capture on d3");
        assert!(capture.captured.is_some());
        assert!(moves.iter().all(|m| m.to != 21));
    }

    #[test]
    fn last_rank_emits_four_promotions() {
        let moves = pawn_moves_from("4k3/P7/8/8/8/8/8/4K3 w - - 0 1", Color::Light, 48);
        let kinds: Vec<_> = moves.iter().map(|m| m.promotion).collect();
        assert_eq!(
            kinds,
            vec![
                Some(PieceKind::Queen),
                Some(PieceKind::Rook),
                Some(PieceKind::Bishop),
                Some(PieceKind::Knight)
            ]
        );
    }

    #[test]
    fn dark_pawns_advance_downwards() {
        let moves = pawn_moves_from("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1", Color::Dark, 51);
        assert_eq!(moves.iter().map(|m| m.to).collect::<Vec<_>>(), vec![43, 35]);
    }
}
