//! FEN-to-GameState parser.
//!
//! Builds a position from a Forsyth-Edwards Notation string. Castling rights
//! and the en-passant square are not stored as such; they are translated
//! into move counts and double-push plies on the affected pieces so the
//! derived rights come out the same.

use crate::chess_errors::{EngineError, EngineResult};
use crate::game_state::chess_rules::{castling_geometry, CastlingWing};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

fn invalid(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidFen(msg.into())
}

/// Parse `fen` into a position in which the engine plays `engine_color`.
///
/// The halfmove clock and fullmove number may be omitted.
pub fn parse_fen(fen: &str, engine_color: Color) -> EngineResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling field"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant field"))?;
    let _halfmove_part = parts.next();
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let side_to_move = parse_side_to_move(side_part)?;
    let fullmove = fullmove_part
        .parse::<u16>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| invalid(format!("invalid fullmove number '{fullmove_part}'")))?;
    let ply = (fullmove - 1)
        .checked_mul(2)
        .and_then(|p| p.checked_add(u16::from(side_to_move == Color::Dark)))
        .ok_or_else(|| invalid("fullmove number too large"))?;

    let mut game_state = GameState::empty(engine_color);
    parse_board(board_part, &mut game_state)?;
    apply_castling_field(castling_part, &mut game_state)?;
    apply_en_passant_field(en_passant_part, side_to_move, ply, &mut game_state)?;

    game_state.finish_setup(side_to_move, ply)?;
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> EngineResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    // Collect first so pieces enter the arena in square order.
    let mut placement: [Option<(Color, PieceKind)>; 64] = [None; 64];

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(format!("invalid piece character '{ch}'")))?;
            if file >= 8 {
                return Err(invalid(format!("rank {} has too many files", board_rank + 1)));
            }

            placement[board_rank * 8 + file] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(invalid(format!("rank {} does not sum to 8 files", board_rank + 1)));
        }
    }

    for (square, piece) in placement.iter().enumerate() {
        if let Some((color, kind)) = *piece {
            if kind == PieceKind::Pawn && matches!(square / 8, 0 | 7) {
                return Err(invalid("pawn on the first or last rank"));
            }
            game_state.place_piece(PieceRecord::new(kind, color, square as Square));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> EngineResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(format!("invalid side to move '{side_part}'"))),
    }
}

/// Mark kings and rooks as moved where the castling field withholds a right.
fn apply_castling_field(castling_part: &str, game_state: &mut GameState) -> EngineResult<()> {
    let mut granted = [[false; 2]; 2];
    if castling_part != "-" {
        for ch in castling_part.chars() {
            let (color, wing) = match ch {
                'K' => (Color::Light, CastlingWing::King),
                'Q' => (Color::Light, CastlingWing::Queen),
                'k' => (Color::Dark, CastlingWing::King),
                'q' => (Color::Dark, CastlingWing::Queen),
                _ => return Err(invalid(format!("invalid castling character '{ch}'"))),
            };
            granted[color.index()][wing.index()] = true;
        }
    }

    for color in [Color::Light, Color::Dark] {
        let home = castling_geometry(color, CastlingWing::King).king_from;
        if let Some(king_id) = game_state.register(color).king() {
            if game_state.piece(king_id).square != home {
                game_state.piece_mut(king_id).move_count = 1;
            }
        }

        for wing in CastlingWing::BOTH {
            let geometry = castling_geometry(color, wing);
            let rook_id = game_state.piece_id_on(geometry.rook_from).filter(|&id| {
                let rook = game_state.piece(id);
                rook.kind == PieceKind::Rook && rook.color == color
            });

            if granted[color.index()][wing.index()] {
                if rook_id.is_none() || !game_state.has_castling_right(color, wing) {
                    return Err(invalid(format!(
                        "{color:?} {wing:?}-side castling granted without king and rook at home"
                    )));
                }
            } else if let Some(id) = rook_id {
                game_state.piece_mut(id).move_count = 1;
            }
        }
    }

    Ok(())
}

fn apply_en_passant_field(
    en_passant_part: &str,
    side_to_move: Color,
    ply: u16,
    game_state: &mut GameState,
) -> EngineResult<()> {
    if en_passant_part == "-" {
        return Ok(());
    }

    let target = algebraic_to_square(en_passant_part)?;
    let mover = side_to_move.opposite();
    let pawn_square = target as i8 + mover.pawn_push();
    let pawn_id = (0..64)
        .contains(&pawn_square)
        .then(|| game_state.piece_id_on(pawn_square as Square))
        .flatten()
        .filter(|&id| {
            let pawn = game_state.piece(id);
            pawn.kind == PieceKind::Pawn && pawn.color == mover
        })
        .ok_or_else(|| invalid(format!("no pawn to capture en passant on {en_passant_part}")))?;

    let pawn = game_state.piece_mut(pawn_id);
    pawn.move_count = 1;
    pawn.double_push_ply = Some(ply);
    Ok(())
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else {
        Color::Dark
    };
    PieceKind::from_char(ch).map(|kind| (color, kind))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::EngineError;
    use crate::game_state::chess_rules::{CastlingWing, STARTING_POSITION_FEN};
    use crate::game_state::chess_types::*;

    #[test]
    fn starting_fen_matches_new_game() {
        let parsed = parse_fen(STARTING_POSITION_FEN, Color::Dark).expect("starting FEN should parse");
        let built = GameState::new_game(Color::Dark);

        assert_eq!(parsed, built);
        assert_eq!(parsed.side_to_move(), Color::Light);
        assert_eq!(parsed.ply(), 0);
    }

    #[test]
    fn material_balance_counts_from_engine_side() {
        let game = parse_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1", Color::Dark).expect("FEN should parse");
        assert_eq!(game.material_balance(), -9);
        let game = parse_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1", Color::Light).expect("FEN should parse");
        assert_eq!(game.material_balance(), 9);
    }

    #[test]
    fn castling_field_controls_derived_rights() {
        let game = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1", Color::Dark).expect("FEN should parse");
        assert!(game.has_castling_right(Color::Light, CastlingWing::King));
        assert!(!game.has_castling_right(Color::Light, CastlingWing::Queen));
        assert!(!game.has_castling_right(Color::Dark, CastlingWing::King));
        assert!(game.has_castling_right(Color::Dark, CastlingWing::Queen));
    }

    #[test]
    fn en_passant_field_marks_the_pawn() {
        let game = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3", Color::Dark).expect("FEN should parse");
        assert_eq!(game.ply(), 4);
        assert_eq!(game.en_passant_file(), Some(3));
    }

    #[test]
    fn malformed_fens_are_rejected() {
        assert!(matches!(parse_fen("8/8/8 w - -", Color::Dark), Err(EngineError::InvalidFen(_))));
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1", Color::Dark).is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1", Color::Dark).is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1", Color::Dark).is_err());
    }
}
