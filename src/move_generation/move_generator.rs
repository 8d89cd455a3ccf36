//! Pseudo-legal candidate generation.
//!
//! Candidates are geometrically reachable destinations only: a destination
//! holding a friendly piece (or the enemy king) is still emitted and left to
//! the legality checks. Every candidate destination is also recorded in the
//! side's attack mask, which the search uses for cheap check detection.

use crate::game_state::chess_rules::GENERATION_ORDER;
use crate::game_state::chess_types::*;
use crate::move_generation::castling_candidates::push_castling_candidates;
use crate::move_generation::pawn_candidates::push_pawn_candidates;
use crate::moves::leaper_tables::{king_targets, knight_targets};
use crate::moves::slider_rays::{bishop_reach, queen_reach, rook_reach};

/// Candidates of one side plus the union of their destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedMoves {
    pub moves: Vec<Move>,
    pub attacks: u64,
}

impl GeneratedMoves {
    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.attacks |= square_mask(mv.to);
        self.moves.push(mv);
    }

    #[inline]
    pub fn attacks_square(&self, square: Square) -> bool {
        self.attacks & square_mask(square) != 0
    }
}

/// Iterate the set squares of a mask from a1 upwards.
pub(crate) fn mask_squares(mut mask: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let square = mask.trailing_zeros() as Square;
        mask &= mask - 1;
        Some(square)
    })
}

/// Every candidate of `color`, castling included.
pub fn generate_moves(game_state: &GameState, color: Color) -> GeneratedMoves {
    generate_side(game_state, color, true)
}

/// Every candidate of `color` except castling. Used to compute the attack
/// set castling itself depends on.
pub fn generate_moves_without_castling(game_state: &GameState, color: Color) -> GeneratedMoves {
    generate_side(game_state, color, false)
}

fn generate_side(game_state: &GameState, color: Color, include_castling: bool) -> GeneratedMoves {
    let mut generated = GeneratedMoves {
        moves: Vec::with_capacity(48),
        attacks: 0,
    };

    for kind in GENERATION_ORDER {
        for id in game_state.live_pieces(color, kind) {
            push_piece_candidates(game_state, id, &mut generated);
        }
        if include_castling && kind == PieceKind::King {
            push_castling_candidates(game_state, color, &mut generated);
        }
    }

    generated
}

/// Candidates of a single piece, castling excluded.
pub fn push_piece_candidates(game_state: &GameState, id: PieceId, out: &mut GeneratedMoves) {
    let piece = game_state.piece(id);
    if piece.captured {
        return;
    }

    let occupancy = game_state.occupancy();
    let reach = match piece.kind {
        PieceKind::Pawn => {
            push_pawn_candidates(game_state, id, out);
            return;
        }
        PieceKind::Knight => knight_targets(piece.square),
        PieceKind::Bishop => bishop_reach(piece.square, occupancy),
        PieceKind::Rook => rook_reach(piece.square, occupancy),
        PieceKind::Queen => queen_reach(piece.square, occupancy),
        PieceKind::King => king_targets(piece.square),
    };

    for to in mask_squares(reach) {
        let mut mv = Move::new(piece.square, to);
        mv.captured = game_state.piece_id_on(to);
        out.push(mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_twenty_candidates_per_side() {
        let game = GameState::new_game(Color::Dark);
        let light = generate_moves(&game, Color::Light);
        let dark = generate_moves(&game, Color::Dark);

        // Blocked sliders still emit their first (friendly) blocker.
        let forward: Vec<_> = light.moves.iter().filter(|m| m.captured.is_none()).collect();
        assert_eq!(forward.len(), 20);
        assert_eq!(dark.moves.iter().filter(|m| m.captured.is_none()).count(), 20);
    }

    #[test]
    fn kinds_are_visited_in_generation_order() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/4P3/1N1QK3 w - - 0 1", Color::Dark)
            .expect("FEN should parse");
        let generated = generate_moves(&game, Color::Light);
        let kinds: Vec<_> = generated
            .moves
            .iter()
            .map(|m| game.piece_on(m.from).map(|p| p.kind))
            .collect();

        let first_pawn = kinds
            .iter()
            .position(|k| *k == Some(PieceKind::Pawn))
            .expect("pawn moves present");
        assert_eq!(kinds[0], Some(PieceKind::Queen));
        assert!(kinds[first_pawn..].iter().all(|k| *k == Some(PieceKind::Pawn)));
    }

    #[test]
    fn attack_mask_covers_every_destination() {
        let game = GameState::from_fen("4k3/8/8/3r4/8/8/8/4K3 b - - 0 1", Color::Dark)
            .expect("FEN should parse");
        let generated = generate_moves(&game, Color::Dark);
        for mv in &generated.moves {
            assert!(generated.attacks_square(mv.to));
        }
        // d5 rook sweeps the d-file and the fifth rank.
        assert!(generated.attacks_square(3));
        assert!(generated.attacks_square(39));
    }

    #[test]
    fn captured_field_names_the_piece_on_the_destination() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/8/8/3RK3 w - - 0 1", Color::Dark)
            .expect("FEN should parse");
        let generated = generate_moves(&game, Color::Light);
        let (d1, d5, d6) = (3, 35, 43);
        let capture = generated
            .moves
            .iter()
            .find(|m| m.from == d1 && m.to == d5)
            .expect("rook reaches d5");
        assert_eq!(capture.captured, game.piece_id_on(d5));
        assert!(!generated.moves.iter().any(|m| m.from == d1 && m.to == d6));
    }

    #[test]
    fn mask_squares_walks_low_to_high() {
        let squares: Vec<_> = mask_squares((1 << 3) | (1 << 40) | 1).collect();
        assert_eq!(squares, vec![0, 3, 40]);
    }
}
