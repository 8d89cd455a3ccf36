//! Legality filtering on top of pseudo-legal candidates.
//!
//! The structural check is cheap and never mutates. The full check also
//! plays the move through a scoped guard and looks for attacks on the
//! mover's king in the resulting position.

use crate::chess_errors::{EngineError, EngineResult};
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{generate_moves, generate_moves_without_castling};
use crate::utils::algebraic::square_name;

fn squares_of(mv: &Move) -> (String, String) {
    (square_name(mv.from), square_name(mv.to))
}

/// Reject moves of captured pieces, self-captures and king captures.
pub fn check_structurally_valid(game_state: &GameState, mv: &Move) -> EngineResult<()> {
    if is_structurally_valid(game_state, mv) {
        return Ok(());
    }
    let (from, to) = squares_of(mv);
    Err(EngineError::StructurallyInvalid { from, to })
}

pub fn is_structurally_valid(game_state: &GameState, mv: &Move) -> bool {
    let Some(mover) = game_state.piece_on(mv.from) else {
        return false;
    };
    if mover.captured {
        return false;
    }

    match game_state.piece_on(mv.to) {
        Some(target) => target.color != mover.color && target.kind != PieceKind::King,
        None => true,
    }
}

/// Structural validity, castling safety and no self-check.
///
/// The position is unchanged when this returns, whatever the outcome.
pub fn check_move_legal(game_state: &mut GameState, mv: &Move) -> EngineResult<()> {
    check_structurally_valid(game_state, mv)?;

    let Some(color) = game_state.piece_on(mv.from).map(|p| p.color) else {
        return Err(EngineError::Invariant(format!(
            "no piece on {} after structural check",
            square_name(mv.from)
        )));
    };

    if let Some((_, rook_to)) = mv.castling {
        let attacks = generate_moves_without_castling(game_state, color.opposite()).attacks;
        let crossed = square_mask(mv.from) | square_mask(mv.to) | square_mask(rook_to);
        if attacks & crossed != 0 {
            let (from, to) = squares_of(mv);
            return Err(EngineError::CastlingThroughAttack { from, to });
        }
    }

    let applied = game_state.apply_scoped(*mv)?;
    let exposed = match applied.king_square(color) {
        Some(king) => generate_moves_without_castling(&applied, color.opposite()).attacks_square(king),
        None => false,
    };
    drop(applied);

    if exposed {
        let (from, to) = squares_of(mv);
        return Err(EngineError::SelfCheck { from, to });
    }
    Ok(())
}

/// Whether `color`'s king is attacked by any enemy candidate.
pub fn in_check(game_state: &GameState, color: Color) -> bool {
    game_state
        .king_square(color)
        .is_some_and(|king| generate_moves_without_castling(game_state, color.opposite()).attacks_square(king))
}

/// Fully legal moves of `color`, in generation order.
pub fn legal_moves(game_state: &mut GameState, color: Color) -> Vec<Move> {
    generate_moves(game_state, color)
        .moves
        .into_iter()
        .filter(|mv| check_move_legal(game_state, mv).is_ok())
        .collect()
}

pub fn legal_move_count(game_state: &mut GameState, color: Color) -> usize {
    let candidates = generate_moves(game_state, color).moves;
    candidates
        .iter()
        .filter(|mv| check_move_legal(game_state, mv).is_ok())
        .count()
}
