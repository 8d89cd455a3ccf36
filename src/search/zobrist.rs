//! Zobrist hashing support for position identity in the transposition cache.
//!
//! The key table is process-wide and write-once. It can be seeded explicitly
//! through [`initialize`] before the first position is built; otherwise it is
//! generated from a fixed seed on first use so hashes are reproducible across
//! runs. Every key is distinct.

use std::collections::HashSet;
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_rules::CastlingWing;
use crate::game_state::chess_types::*;

pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [[u64; 2]; 2],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

/// Build the key table from `seed`. Returns `false` when the table already
/// exists, in which case the existing keys stay in force.
pub fn initialize(seed: u64) -> bool {
    let mut installed = false;
    TABLES.get_or_init(|| {
        installed = true;
        build_tables(seed)
    });
    if !installed {
        log::warn!("zobrist keys already initialized; seed {seed:#x} ignored");
    }
    installed
}

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(|| build_tables(DEFAULT_SEED))
}

fn build_tables(seed: u64) -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::new();
    let mut next_key = || loop {
        let key: u64 = rng.random();
        if key != 0 && seen.insert(key) {
            return key;
        }
    };

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for sq in piece {
                *sq = next_key();
            }
        }
    }

    let side_to_move = next_key();

    let mut castling = [[0u64; 2]; 2];
    for color in &mut castling {
        for key in color {
            *key = next_key();
        }
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = next_key();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
    }
}

/// Return the Zobrist key for a `(color, piece, square)` occupancy term.
#[inline]
pub fn piece_square_key(color: Color, piece: PieceKind, square: Square) -> u64 {
    tables().piece_square[color.index()][piece.index()][square as usize]
}

/// Return the key for one castling right of one colour.
#[inline]
pub fn castling_key(color: Color, wing: CastlingWing) -> u64 {
    tables().castling[color.index()][wing.index()]
}

/// Return the Zobrist key contribution for a valid en-passant file.
#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[file as usize]
}

/// Return the side-to-move toggle key (xor in when dark to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Hash of everything except piece placement: side to move, castling rights
/// and the en-passant file.
pub fn state_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    if game_state.side_to_move() == Color::Dark {
        key ^= side_to_move_key();
    }

    for color in [Color::Light, Color::Dark] {
        for wing in CastlingWing::BOTH {
            if game_state.has_castling_right(color, wing) {
                key ^= castling_key(color, wing);
            }
        }
    }

    if let Some(file) = game_state.en_passant_file() {
        key ^= en_passant_file_key(file);
    }

    key
}

/// Compute the full position key from scratch, ignoring the incremental value.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for square in 0..64u8 {
        if let Some(record) = game_state.piece_on(square) {
            key ^= piece_square_key(record.color, record.kind, square);
        }
    }

    key ^ state_key(game_state)
}
