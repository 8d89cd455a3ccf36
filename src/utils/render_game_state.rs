//! Terminal board renderer.
//!
//! Draws the board with Unicode piece glyphs, from the given colour's side
//! of the table so the human's pieces sit at the bottom.

use crate::game_state::chess_types::*;

/// Render the board with `bottom`'s home rank last.
pub fn render_game_state(game_state: &GameState, bottom: Color) -> String {
    let ranks: Vec<u8> = match bottom {
        Color::Light => (0..8).rev().collect(),
        Color::Dark => (0..8).collect(),
    };
    let files: Vec<u8> = match bottom {
        Color::Light => (0..8).collect(),
        Color::Dark => (0..8).rev().collect(),
    };
    let file_labels: String = files
        .iter()
        .map(|&f| format!(" {}", char::from(b'a' + f)))
        .collect();

    let mut out = String::new();
    out.push(' ');
    out.push_str(&file_labels);
    out.push('\n');

    for &rank in &ranks {
        let label = char::from(b'1' + rank);
        out.push(label);
        for &file in &files {
            out.push(' ');
            out.push(
                game_state
                    .piece_on(rank * 8 + file)
                    .map_or('·', |p| piece_glyph(p.color, p.kind)),
            );
        }
        out.push(' ');
        out.push(label);
        out.push('\n');
    }

    out.push(' ');
    out.push_str(&file_labels);
    out
}

fn piece_glyph(color: Color, kind: PieceKind) -> char {
    match (color, kind) {
        (Color::Light, PieceKind::Pawn) => '♙',
        (Color::Light, PieceKind::Knight) => '♘',
        (Color::Light, PieceKind::Bishop) => '♗',
        (Color::Light, PieceKind::Rook) => '♖',
        (Color::Light, PieceKind::Queen) => '♕',
        (Color::Light, PieceKind::King) => '♔',
        (Color::Dark, PieceKind::Pawn) => '♟',
        (Color::Dark, PieceKind::Knight) => '♞',
        (Color::Dark, PieceKind::Bishop) => '♝',
        (Color::Dark, PieceKind::Rook) => '♜',
        (Color::Dark, PieceKind::Queen) => '♛',
        (Color::Dark, PieceKind::King) => '♚',
    }
}
