//! Crate root module declarations for the Heisenberg chess engine.
//!
//! Exposes the position model, candidate generation, search and the game
//! session so the terminal binary, benches and tests share one set of module
//! paths.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod piece_record;
    pub mod piece_register;
    pub mod undo_state;
}

pub mod moves {
    pub mod leaper_tables;
    pub mod slider_rays;
}

pub mod move_generation {
    pub mod castling_candidates;
    pub mod legal_move_checks;
    pub mod move_generator;
    pub mod pawn_candidates;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod refutation_table;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod tables {
    pub mod opening_book;
}

pub mod engines {
    pub mod engine_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod render_game_state;
}
