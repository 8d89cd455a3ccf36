//! One game between a human and the engine.
//!
//! `EngineSession` owns the position, the transposition cache and the
//! refutation table for the lifetime of a game. The human submits moves
//! through [`EngineSession::make_move`]; the engine answers through
//! [`EngineSession::my_move`].

use crate::chess_errors::{EngineError, EngineResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{check_move_legal, in_check, legal_move_count};
use crate::move_generation::move_generator::generate_moves;
use crate::search::alpha_beta::{search_root_moves, SearchConfig, SearchContext, SearchResult};
use crate::search::board_scoring::MaterialMobilityScorer;
use crate::search::refutation_table::RefutationTable;
use crate::search::transposition_table::{TTStats, TranspositionTable};
use crate::search::zobrist;
use crate::tables::opening_book::OpeningBook;
use crate::utils::algebraic::{square_name, UserMove};
use crate::utils::render_game_state::render_game_state;

/// Outcome of the game from the human player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The engine is checkmated.
    Win,
    /// The human is checkmated.
    Loss,
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub use_opening_book: bool,
    /// Seed for the Zobrist key table. Only honoured if no position has been
    /// hashed yet in this process.
    pub zobrist_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            use_opening_book: true,
            zobrist_seed: None,
        }
    }
}

#[derive(Debug)]
pub struct EngineSession {
    game_state: GameState,
    user_color: Color,
    config: EngineConfig,
    scorer: MaterialMobilityScorer,
    cache: TranspositionTable,
    refutations: RefutationTable,
    last_search: Option<SearchResult>,
}

impl EngineSession {
    /// Start a new game from the initial position with the human playing
    /// `user_color`, priming the opening book when enabled.
    pub fn init_game(user_color: Color, config: EngineConfig) -> EngineResult<Self> {
        if let Some(seed) = config.zobrist_seed {
            zobrist::initialize(seed);
        }

        let mut session = Self::with_position(GameState::new_game(user_color.opposite()), config);

        if config.use_opening_book {
            if config.search.use_transposition_table {
                OpeningBook::default().prime(
                    &mut session.game_state,
                    &mut session.cache,
                    session.config.search.max_depth,
                )?;
            } else {
                log::warn!("opening book needs the transposition table; book disabled");
            }
        }

        log::info!(
            "new game: human plays {:?}, depth {} (+{} tactical)",
            user_color,
            session.config.search.max_depth,
            session.config.search.quiescence_depth
        );
        Ok(session)
    }

    /// Start from an arbitrary position. The engine plays the colour opposite
    /// to `user_color`; no opening book is primed.
    pub fn from_fen(fen: &str, user_color: Color, config: EngineConfig) -> EngineResult<Self> {
        if let Some(seed) = config.zobrist_seed {
            zobrist::initialize(seed);
        }
        let game_state = GameState::from_fen(fen, user_color.opposite())?;
        Ok(Self::with_position(game_state, config))
    }

    fn with_position(game_state: GameState, mut config: EngineConfig) -> Self {
        config.search = config.search.clamped();
        Self {
            user_color: game_state.opponent_color(),
            game_state,
            config,
            scorer: MaterialMobilityScorer,
            cache: TranspositionTable::new(),
            refutations: RefutationTable::new(),
            last_search: None,
        }
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    #[inline]
    pub fn user_color(&self) -> Color {
        self.user_color
    }

    #[inline]
    pub fn engine_color(&self) -> Color {
        self.game_state.engine_color()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn cache_stats(&self) -> TTStats {
        self.cache.stats()
    }

    /// Statistics of the most recent engine search, if any.
    #[inline]
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }

    /// Validate and play the human's move. The position is untouched when an
    /// error is returned.
    pub fn make_move(&mut self, user_move: UserMove) -> EngineResult<()> {
        let Some(piece) = self.game_state.piece_on(user_move.from) else {
            return Err(EngineError::EmptyOrigin {
                square: square_name(user_move.from),
            });
        };
        if piece.color != self.user_color {
            return Err(EngineError::WrongSide {
                square: square_name(user_move.from),
            });
        }
        if self.game_state.side_to_move() != self.user_color {
            return Err(EngineError::OutOfTurn);
        }

        let mv = self.resolve(&user_move).ok_or_else(|| EngineError::NotACandidate {
            from: square_name(user_move.from),
            to: square_name(user_move.to),
        })?;
        check_move_legal(&mut self.game_state, &mv)?;
        self.game_state.apply_move(&mv)?;

        log::debug!("human played {user_move}");
        Ok(())
    }

    /// Search for, play and return the engine's move.
    pub fn my_move(&mut self) -> EngineResult<UserMove> {
        if self.game_state.side_to_move() != self.engine_color() {
            return Err(EngineError::OutOfTurn);
        }
        let status = self.game_status(true);
        if status != GameStatus::InProgress {
            log::info!("engine asked to move in a finished game: {status:?}");
            return Err(EngineError::GameOver(status));
        }

        let root_key = self.game_state.zobrist_key();
        let mut root_moves = generate_moves(&self.game_state, self.engine_color()).moves;
        let mut ctx = SearchContext::new(
            self.config.search,
            &self.scorer,
            &mut self.cache,
            &mut self.refutations,
        );

        // The search accepts castling out of check, which the full legality
        // check does not. Such a root move is dropped and the root searched
        // again over what remains.
        let (mv, result) = loop {
            let result = search_root_moves(&mut self.game_state, &mut ctx, root_moves.clone())?;
            let Some(best) = result.best_move else {
                return Err(EngineError::Invariant(
                    "in-progress game without a searchable engine move".to_owned(),
                ));
            };
            match check_move_legal(&mut self.game_state, &best) {
                Ok(()) => break (best, result),
                Err(err) => {
                    log::warn!("search chose {}: {err}; searching the root again", UserMove::from(best));
                    root_moves.retain(|m| !m.same_squares(&best));
                    ctx.cache.remove(root_key);
                }
            }
        };
        self.last_search = Some(result);

        self.game_state.apply_move(&mv)?;
        let played = UserMove::from(mv);
        log::debug!("engine played {played} (score {})", result.best_score);
        Ok(played)
    }

    /// Status for the side about to move: the engine's when `is_engine_turn`,
    /// otherwise the human's.
    pub fn game_status(&mut self, is_engine_turn: bool) -> GameStatus {
        let side = if is_engine_turn {
            self.engine_color()
        } else {
            self.user_color
        };

        if legal_move_count(&mut self.game_state, side) > 0 {
            return GameStatus::InProgress;
        }
        if !in_check(&self.game_state, side) {
            return GameStatus::Stalemate;
        }
        if is_engine_turn {
            GameStatus::Win
        } else {
            GameStatus::Loss
        }
    }

    /// Whether `user_move` moves a pawn onto its final rank.
    pub fn is_promotion(&self, user_move: &UserMove) -> bool {
        self.game_state.piece_on(user_move.from).is_some_and(|p| {
            p.kind == PieceKind::Pawn && rank_of(user_move.to) == p.color.promotion_rank()
        })
    }

    /// Text board from the human's side of the table.
    pub fn render(&self) -> String {
        render_game_state(&self.game_state, self.user_color)
    }

    /// Find the generated candidate for the piece on `user_move.from` with
    /// the same squares and promotion.
    fn resolve(&self, user_move: &UserMove) -> Option<Move> {
        let color = self.game_state.piece_on(user_move.from)?.color;
        generate_moves(&self.game_state, color)
            .moves
            .into_iter()
            .find(|m| user_move.matches(m))
    }
}
