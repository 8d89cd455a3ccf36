//! Fixed-depth min/max search with alpha-beta style cutoffs.
//!
//! The engine's plies maximise and the opponent's plies minimise; which one
//! applies is read from the position's side to move. Each node receives the
//! running best of its parent as a single bound and stops as soon as its own
//! best reaches it. Past the horizon only captures and promotions are
//! followed, up to `quiescence_depth` further plies.
//!
//! Every recursive step plays exactly one move through a scoped guard, so the
//! position is restored on every exit path, errors included.

use std::time::{Duration, Instant};

use crate::chess_errors::EngineResult;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::AppliedMove;
use crate::move_generation::legal_move_checks::is_structurally_valid;
use crate::move_generation::move_generator::{generate_moves, GeneratedMoves};
use crate::search::board_scoring::BoardScorer;
use crate::search::refutation_table::RefutationTable;
use crate::search::transposition_table::{TTEntry, TranspositionTable};

/// Window edge, beyond any reachable score including the mate sentinels.
pub const INFINITY: Score = Score::MAX;

/// Upper limit for both search horizons.
pub const MAX_SEARCH_DEPTH: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Full-width plies searched from the root.
    pub max_depth: u8,
    /// Additional plies of captures and promotions past the horizon.
    pub quiescence_depth: u8,
    pub use_transposition_table: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            quiescence_depth: 2,
            use_transposition_table: true,
        }
    }
}

impl SearchConfig {
    /// Both horizons limited to `MAX_SEARCH_DEPTH`, full-width depth at least 1.
    pub fn clamped(self) -> Self {
        Self {
            max_depth: self.max_depth.clamp(1, MAX_SEARCH_DEPTH),
            quiescence_depth: self.quiescence_depth.min(MAX_SEARCH_DEPTH),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: Score,
    pub stats: SearchStats,
}

/// Mutable state threaded through one search.
pub struct SearchContext<'a, S: BoardScorer + ?Sized> {
    pub config: SearchConfig,
    pub scorer: &'a S,
    pub cache: &'a mut TranspositionTable,
    pub refutations: &'a mut RefutationTable,
    pub stats: SearchStats,
}

impl<'a, S: BoardScorer + ?Sized> SearchContext<'a, S> {
    pub fn new(
        config: SearchConfig,
        scorer: &'a S,
        cache: &'a mut TranspositionTable,
        refutations: &'a mut RefutationTable,
    ) -> Self {
        Self {
            config,
            scorer,
            cache,
            refutations,
            stats: SearchStats::default(),
        }
    }
}

/// Search the position for the side to move and return its best move.
///
/// `best_move` is `None` when that side has no legal move; the score is then
/// the scorer's verdict on the position.
pub fn search_best_move<S: BoardScorer + ?Sized>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
) -> EngineResult<SearchResult> {
    let root_moves = generate_moves(game_state, game_state.side_to_move()).moves;
    search_root_moves(game_state, ctx, root_moves)
}

/// Like [`search_best_move`], but only `root_moves` are tried at the root.
/// A cache entry for the root position still answers without expansion.
pub fn search_root_moves<S: BoardScorer + ?Sized>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    root_moves: Vec<Move>,
) -> EngineResult<SearchResult> {
    let started = Instant::now();
    ctx.stats = SearchStats::default();
    ctx.config = ctx.config.clamped();

    let maximizing = game_state.side_to_move() == game_state.engine_color();
    let root_bound = if maximizing { INFINITY } else { -INFINITY };

    let (best_move, best_score) = search(game_state, ctx, root_bound, 1, root_moves)?;

    ctx.stats.elapsed = started.elapsed();
    log::debug!(
        "search depth {} (+{}): best {:?} score {} nodes {} qnodes {} cache hits {} cutoffs {} in {:?}",
        ctx.config.max_depth,
        ctx.config.quiescence_depth,
        best_move.map(|m| (m.from, m.to)),
        best_score,
        ctx.stats.nodes,
        ctx.stats.quiescence_nodes,
        ctx.stats.cache_hits,
        ctx.stats.cutoffs,
        ctx.stats.elapsed,
    );

    Ok(SearchResult {
        best_move,
        best_score,
        stats: ctx.stats,
    })
}

#[inline]
fn reaches_bound(maximizing: bool, best: Score, bound: Score) -> bool {
    if maximizing {
        best >= bound
    } else {
        best <= bound
    }
}

#[inline]
fn improves(maximizing: bool, score: Score, best: Score) -> bool {
    if maximizing {
        score > best
    } else {
        score < best
    }
}

/// Apply `mv` if it is structurally valid and does not leave the mover's
/// king attacked, returning the guard and the opponent's candidates.
fn try_move(
    game_state: &mut GameState,
    mv: Move,
) -> EngineResult<Option<(AppliedMove<'_>, GeneratedMoves)>> {
    if !is_structurally_valid(game_state, &mv) {
        return Ok(None);
    }

    let mover = game_state.side_to_move();
    let applied = game_state.apply_scoped(mv)?;
    let replies = generate_moves(&applied, mover.opposite());
    if applied
        .king_square(mover)
        .is_some_and(|king| replies.attacks_square(king))
    {
        return Ok(None);
    }

    Ok(Some((applied, replies)))
}

/// One full-width node. `depth` is 1 at the root; `moves` are the side to
/// move's candidates, generated by the caller.
pub fn search<S: BoardScorer + ?Sized>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    bound: Score,
    depth: u8,
    mut moves: Vec<Move>,
) -> EngineResult<(Option<Move>, Score)> {
    ctx.stats.nodes += 1;
    let key = game_state.zobrist_key();
    let remaining = ctx.config.max_depth.saturating_add(1).saturating_sub(depth);

    if ctx.config.use_transposition_table {
        if let Some(entry) = ctx.cache.probe(key, remaining) {
            ctx.stats.cache_hits += 1;
            return Ok((entry.best_move, entry.score));
        }
    }

    if depth > ctx.config.max_depth {
        let score = quiescence(game_state, ctx, bound, 1)?;
        return Ok((None, score));
    }

    let maximizing = game_state.side_to_move() == game_state.engine_color();
    ctx.refutations.order(depth as usize, &mut moves);

    let mut best: Option<(Move, Score)> = None;
    for mv in moves {
        let Some((mut applied, replies)) = try_move(game_state, mv)? else {
            continue;
        };

        let running = best.map_or(if maximizing { -INFINITY } else { INFINITY }, |(_, s)| s);
        let (reply, score) = search(&mut applied, ctx, running, depth.saturating_add(1), replies.moves)?;
        drop(applied);

        if let Some(reply) = reply {
            ctx.refutations
                .credit(depth as usize + 1, &reply, u32::from(remaining));
        }

        if best.map_or(true, |(_, b)| improves(maximizing, score, b)) {
            best = Some((mv, score));
        }
        if best.is_some_and(|(_, b)| reaches_bound(maximizing, b, bound)) {
            ctx.stats.cutoffs += 1;
            break;
        }
    }

    let (best_move, score) = match best {
        Some((mv, score)) => (Some(mv), score),
        None => (None, ctx.scorer.score(game_state)),
    };

    if ctx.config.use_transposition_table {
        ctx.cache.store(
            key,
            TTEntry {
                depth: remaining,
                score,
                best_move,
            },
        );
    }

    Ok((best_move, score))
}

/// Tactical extension: only captures and promotions, evaluated statically
/// once `quiescence_depth` is exceeded or no forcing move is legal.
fn quiescence<S: BoardScorer + ?Sized>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    bound: Score,
    qdepth: u8,
) -> EngineResult<Score> {
    ctx.stats.quiescence_nodes += 1;
    if qdepth > ctx.config.quiescence_depth {
        return Ok(ctx.scorer.score(game_state));
    }

    let maximizing = game_state.side_to_move() == game_state.engine_color();
    let forcing: Vec<Move> = generate_moves(game_state, game_state.side_to_move())
        .moves
        .into_iter()
        .filter(Move::is_forcing)
        .collect();

    let mut best: Option<Score> = None;
    for mv in forcing {
        let Some((mut applied, _)) = try_move(game_state, mv)? else {
            continue;
        };

        let running = best.unwrap_or(if maximizing { -INFINITY } else { INFINITY });
        let score = quiescence(&mut applied, ctx, running, qdepth.saturating_add(1))?;
        drop(applied);

        if best.map_or(true, |b| !improves(maximizing, b, score)) {
            best = Some(score);
        }
        if best.is_some_and(|b| reaches_bound(maximizing, b, bound)) {
            ctx.stats.cutoffs += 1;
            break;
        }
    }

    match best {
        Some(score) => Ok(score),
        None => Ok(ctx.scorer.score(game_state)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_checks::legal_moves;
    use crate::search::board_scoring::{MaterialMobilityScorer, MATE_SCORE};
    use crate::utils::algebraic::{algebraic_to_square, UserMove};

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn run_root(game: &mut GameState, config: SearchConfig, moves: Vec<Move>) -> SearchResult {
        let mut cache = TranspositionTable::new();
        let mut refutations = RefutationTable::new();
        let mut ctx = SearchContext::new(config, &MaterialMobilityScorer, &mut cache, &mut refutations);
        search_root_moves(game, &mut ctx, moves).expect("search should succeed")
    }

    fn run(game: &mut GameState, config: SearchConfig) -> SearchResult {
        let mut cache = TranspositionTable::new();
        let mut refutations = RefutationTable::new();
        let mut ctx = SearchContext::new(config, &MaterialMobilityScorer, &mut cache, &mut refutations);
        search_best_move(game, &mut ctx).expect("search should succeed")
    }

    /// Plain min/max over fully legal moves, no pruning, no cache.
    fn minimax(game: &mut GameState, depth: u8, max_depth: u8) -> Score {
        if depth > max_depth {
            return MaterialMobilityScorer.score(game);
        }
        let maximizing = game.side_to_move() == game.engine_color();
        let moves = legal_moves(game, game.side_to_move());
        if moves.is_empty() {
            return MaterialMobilityScorer.score(game);
        }

        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for mv in moves {
            let mut applied = game.apply_scoped(mv).expect("legal move should apply");
            let score = minimax(&mut applied, depth + 1, max_depth);
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
        best
    }

    #[test]
    fn pruned_search_matches_exhaustive_minimax() {
        let fens = [
            "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
            "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1",
            "4k3/8/3q4/8/3R4/8/8/4K3 b - - 0 1",
        ];
        let config = SearchConfig {
            max_depth: 2,
            quiescence_depth: 0,
            use_transposition_table: false,
        };

        for fen in fens {
            let mut game = GameState::from_fen(fen, Color::Light).expect("FEN should parse");
            let expected = minimax(&mut game, 1, config.max_depth);
            let before = game.clone();
            let result = run(&mut game, config);
            assert_eq!(result.best_score, expected, "score mismatch for {fen}");
            assert!(result.best_move.is_some());
            assert_eq!(game, before, "search must leave the position untouched");
        }
    }

    #[test]
    fn back_rank_mate_in_one_is_found() {
        let mut game = GameState::from_fen("6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1", Color::Light)
            .expect("FEN should parse");
        let result = run(&mut game, SearchConfig::default());
        let best = result.best_move.expect("a move should be chosen");
        assert_eq!((best.from, best.to), (sq("d1"), sq("d8")));
        assert_eq!(result.best_score, MATE_SCORE);
    }

    #[test]
    fn free_capture_at_the_horizon_is_not_ignored() {
        // At depth 1 Qxd5 looks like a free pawn; the e6 pawn recaptures one
        // ply past the horizon.
        let fen = "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1";
        let horizon_only = SearchConfig {
            max_depth: 1,
            quiescence_depth: 0,
            use_transposition_table: false,
        };
        let with_recaptures = SearchConfig {
            quiescence_depth: 2,
            ..horizon_only
        };

        let mut game = GameState::from_fen(fen, Color::Light).expect("FEN should parse");
        let blind = run(&mut game, horizon_only);
        let blind_move = blind.best_move.expect("a move should be chosen");
        assert_eq!((blind_move.from, blind_move.to), (sq("d1"), sq("d5")));

        let seen = run(&mut game, with_recaptures);
        let best = seen.best_move.expect("a move should be chosen");
        assert!(
            !(best.from == sq("d1") && best.to == sq("d5")),
            "queen should not be traded for a pawn"
        );
        assert!(
            seen.best_score < blind.best_score,
            "recapture should lower the score: {} vs {}",
            seen.best_score,
            blind.best_score
        );

        // The capture line itself now scores below any quiet queen move.
        let capture = generate_moves(&game, Color::Light)
            .moves
            .into_iter()
            .find(|m| m.from == sq("d1") && m.to == sq("d5"))
            .expect("Qxd5 is a candidate");
        let capture_only = run_root(&mut game, with_recaptures, vec![capture]);
        assert!(capture_only.best_score < seen.best_score);
        assert!(capture_only.best_score < 0, "queen for pawn is a losing trade");
    }

    #[test]
    fn transposed_position_is_answered_from_the_cache() {
        let play = |line: &[&str]| {
            let mut game = GameState::new_game(Color::Light);
            for text in line {
                let wanted: UserMove = text.parse().expect("line move should parse");
                let mv = generate_moves(&game, game.side_to_move())
                    .moves
                    .into_iter()
                    .find(|m| wanted.matches(m))
                    .expect("line move should be generated");
                game.apply_move(&mv).expect("line move should apply");
            }
            game
        };
        let mut knights_first = play(&["g1f3", "g8f6", "b1c3"]);
        let mut queen_knight_first = play(&["b1c3", "g8f6", "g1f3"]);
        assert_eq!(knights_first.zobrist_key(), queen_knight_first.zobrist_key());

        let config = SearchConfig {
            max_depth: 2,
            quiescence_depth: 1,
            use_transposition_table: true,
        };
        let mut cache = TranspositionTable::new();
        let mut refutations = RefutationTable::new();
        let mut ctx = SearchContext::new(config, &MaterialMobilityScorer, &mut cache, &mut refutations);
        let first = search_best_move(&mut knights_first, &mut ctx).expect("search should succeed");
        let second = search_best_move(&mut queen_knight_first, &mut ctx).expect("search should succeed");
        drop(ctx);

        let stored = cache
            .get(knights_first.zobrist_key())
            .copied()
            .expect("first search stored the root");
        assert_eq!(second.stats.nodes, 1);
        assert_eq!(second.stats.cache_hits, 1);
        assert_eq!((second.best_move, second.best_score), (stored.best_move, stored.score));
        assert_eq!((first.best_move, first.best_score), (second.best_move, second.best_score));
    }

    #[test]
    fn oversized_horizons_are_clamped() {
        let config = SearchConfig {
            max_depth: u8::MAX,
            quiescence_depth: u8::MAX,
            use_transposition_table: false,
        }
        .clamped();
        assert_eq!(config.max_depth, MAX_SEARCH_DEPTH);
        assert_eq!(config.quiescence_depth, MAX_SEARCH_DEPTH);
        assert_eq!(SearchConfig { max_depth: 0, ..config }.clamped().max_depth, 1);
        assert_eq!(SearchConfig::default().clamped(), SearchConfig::default());
    }

    #[test]
    fn only_legal_evasion_is_chosen() {
        let mut game = GameState::from_fen("k7/8/8/8/8/8/6q1/7K w - - 0 1", Color::Light)
            .expect("FEN should parse");
        let result = run(&mut game, SearchConfig::default());
        let best = result.best_move.expect("the capture is legal");
        assert_eq!((best.from, best.to), (sq("h1"), sq("g2")));
    }

    #[test]
    fn transposition_hits_are_counted_and_scores_agree() {
        let fen = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";
        let uncached = SearchConfig {
            max_depth: 3,
            quiescence_depth: 1,
            use_transposition_table: false,
        };

        let mut game = GameState::from_fen(fen, Color::Light).expect("FEN should parse");
        let mut cache = TranspositionTable::new();
        let mut refutations = RefutationTable::new();
        let cached_config = SearchConfig {
            use_transposition_table: true,
            ..uncached
        };
        let mut ctx = SearchContext::new(cached_config, &MaterialMobilityScorer, &mut cache, &mut refutations);
        let first = search_best_move(&mut game, &mut ctx).expect("search should succeed");
        let second = search_best_move(&mut game, &mut ctx).expect("search should succeed");
        drop(ctx);

        assert!(!cache.is_empty());
        assert_eq!(second.stats.nodes, 1, "root should be answered from the cache");
        assert_eq!(second.stats.cache_hits, 1);
        assert_eq!(first.best_score, second.best_score);
        assert_eq!(first.best_move, second.best_move);
    }

    #[test]
    fn stalemate_root_returns_no_move() {
        let mut game = GameState::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1", Color::Dark)
            .expect("FEN should parse");
        let result = run(&mut game, SearchConfig::default());
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, -MATE_SCORE);
    }
}
