//! Built-in opening lines.
//!
//! The book is never consulted during play. Instead every position along
//! every line is written into the transposition cache before the first move,
//! at full search depth, so the root probe answers with the book move.
//! Lines are primed in ascending weight order; where two lines share a
//! position the heavier one is written last and wins.

use crate::chess_errors::{EngineError, EngineResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::check_move_legal;
use crate::move_generation::move_generator::generate_moves;
use crate::search::transposition_table::{TTEntry, TranspositionTable};
use crate::utils::algebraic::UserMove;

/// Score recorded for book positions. Book moves are taken on trust, not
/// evaluated.
pub const BOOK_SCORE: Score = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningLine {
    pub name: &'static str,
    /// Moves in `e2e4` form, starting from the initial position.
    pub moves: &'static [&'static str],
    pub weight: u32,
}

pub const DEFAULT_LINES: &[OpeningLine] = &[
    OpeningLine {
        name: "Sicilian Defence",
        moves: &["e2e4", "c7c5"],
        weight: 10,
    },
    OpeningLine {
        name: "French Defence",
        moves: &["e2e4", "e7e6", "d2d4", "d7d5"],
        weight: 2,
    },
    OpeningLine {
        name: "Caro-Kann Defence",
        moves: &["e2e4", "c7c6", "d2d4", "d7d5"],
        weight: 1,
    },
    OpeningLine {
        name: "Ruy Lopez",
        moves: &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"],
        weight: 3,
    },
    OpeningLine {
        name: "Italian Game",
        moves: &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4"],
        weight: 2,
    },
    OpeningLine {
        name: "Queen's Gambit Declined",
        moves: &["d2d4", "d7d5", "c2c4", "e7e6"],
        weight: 1,
    },
];

#[derive(Debug, Clone)]
pub struct OpeningBook {
    lines: Vec<OpeningLine>,
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new(DEFAULT_LINES.to_vec())
    }
}

impl OpeningBook {
    /// Lines are kept sorted by ascending weight; ties keep the given order.
    pub fn new(mut lines: Vec<OpeningLine>) -> Self {
        lines.sort_by_key(|line| line.weight);
        Self { lines }
    }

    pub fn lines(&self) -> &[OpeningLine] {
        &self.lines
    }

    /// Write every book position into `cache` with its book move at `depth`.
    /// Returns the number of cache writes.
    ///
    /// `game_state` must be the initial position and is unchanged afterwards.
    pub fn prime(
        &self,
        game_state: &mut GameState,
        cache: &mut TranspositionTable,
        depth: u8,
    ) -> EngineResult<usize> {
        let mut written = 0;
        for line in &self.lines {
            written += prime_line(game_state, cache, line, 0, depth)?;
        }
        log::info!(
            "primed {} opening lines into {} cache entries",
            self.lines.len(),
            cache.len()
        );
        Ok(written)
    }
}

fn prime_line(
    game_state: &mut GameState,
    cache: &mut TranspositionTable,
    line: &OpeningLine,
    index: usize,
    depth: u8,
) -> EngineResult<usize> {
    let Some(text) = line.moves.get(index) else {
        return Ok(0);
    };

    let book_error = |reason: String| EngineError::OpeningBook {
        line: line.name.to_owned(),
        reason,
    };

    let user_move: UserMove = text
        .parse()
        .map_err(|err: EngineError| book_error(format!("'{text}': {err}")))?;
    let mv = generate_moves(game_state, game_state.side_to_move())
        .moves
        .into_iter()
        .find(|m| user_move.matches(m))
        .ok_or_else(|| book_error(format!("'{text}' is not a move in this position")))?;
    check_move_legal(game_state, &mv).map_err(|err| book_error(format!("'{text}': {err}")))?;

    let stored = cache.store(
        game_state.zobrist_key(),
        TTEntry {
            depth,
            score: BOOK_SCORE,
            best_move: Some(mv),
        },
    );

    let mut applied = game_state.apply_scoped(mv)?;
    let deeper = prime_line(&mut applied, cache, line, index + 1, depth)?;
    Ok(usize::from(stored) + deeper)
}
