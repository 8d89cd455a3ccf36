//! Terminal front end: play a game against the engine.
//!
//! Usage:
//! `cargo run --release -- --color light --depth 3 --quiescence 2`
//! `cargo run --release -- --fen "<board>" --color dark`
//!
//! Moves are entered as `e2 e4` or `e2e4`; promotions may append the piece
//! letter (`e7e8q`) or answer the prompt that follows. `quit` leaves.

use std::io::{self, BufRead, Write};

use heisenberg_chess::chess_errors::EngineResult;
use heisenberg_chess::engines::engine_session::{EngineConfig, EngineSession, GameStatus};
use heisenberg_chess::game_state::chess_types::Color;
use heisenberg_chess::utils::algebraic::{parse_promotion, UserMove};

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u8(flag: &str, default: u8) -> u8 {
    arg_value(flag)
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_color(text: &str) -> Option<Color> {
    match text.trim().to_ascii_lowercase().as_str() {
        "l" | "light" | "w" | "white" => Some(Color::Light),
        "d" | "dark" | "b" | "black" => Some(Color::Dark),
        _ => None,
    }
}

/// Print `prompt` and read one trimmed line; `None` on end of input.
fn read_line(input: &mut impl BufRead, prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_owned()),
    }
}

fn ask_color(input: &mut impl BufRead) -> Option<Color> {
    loop {
        let answer = read_line(input, "Play as (l)ight or (d)ark? ")?;
        if let Some(color) = parse_color(&answer) {
            return Some(color);
        }
        println!("please answer 'l' or 'd'");
    }
}

fn report(status: GameStatus) -> bool {
    match status {
        GameStatus::InProgress => return false,
        GameStatus::Win => println!("Checkmate. You win."),
        GameStatus::Loss => println!("Checkmate. The engine wins."),
        GameStatus::Stalemate => println!("Stalemate."),
    }
    true
}

/// Read moves until one is accepted. Returns `Ok(false)` when the player quits.
fn human_turn(session: &mut EngineSession, input: &mut impl BufRead) -> EngineResult<bool> {
    loop {
        let Some(line) = read_line(input, "your move> ") else {
            return Ok(false);
        };
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            return Ok(false);
        }

        let mut user_move = match line.parse::<UserMove>() {
            Ok(mv) => mv,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if user_move.promotion.is_none() && session.is_promotion(&user_move) {
            let Some(answer) = read_line(input, "promote to (q/r/b/n)? ") else {
                return Ok(false);
            };
            match answer.chars().next().map(parse_promotion) {
                Some(Ok(kind)) => user_move = user_move.with_promotion(kind),
                Some(Err(err)) => {
                    println!("{err}");
                    continue;
                }
                None => continue,
            }
        }

        match session.make_move(user_move) {
            Ok(()) => return Ok(true),
            Err(err) => println!("{err}"),
        }
    }
}

fn run() -> EngineResult<()> {
    env_logger::init();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let user_color = match arg_value("--color").as_deref().and_then(parse_color) {
        Some(color) => color,
        None => match ask_color(&mut input) {
            Some(color) => color,
            None => return Ok(()),
        },
    };

    let mut config = EngineConfig::default();
    config.search.max_depth = parse_arg_u8("--depth", config.search.max_depth);
    config.search.quiescence_depth =
        parse_arg_u8("--quiescence", config.search.quiescence_depth);
    config.search = config.search.clamped();

    let mut session = match arg_value("--fen") {
        Some(fen) => EngineSession::from_fen(&fen, user_color, config)?,
        None => EngineSession::init_game(user_color, config)?,
    };

    println!("{}\n", session.render());

    loop {
        let engine_turn = session.game_state().side_to_move() == session.engine_color();
        if report(session.game_status(engine_turn)) {
            break;
        }

        if engine_turn {
            let reply = session.my_move()?;
            println!("engine plays {reply}");
            if let Some(result) = session.last_search() {
                log::info!(
                    "score {} after {} nodes in {:?}",
                    result.best_score,
                    result.stats.nodes,
                    result.stats.elapsed
                );
            }
            println!("{}\n", session.render());
        } else {
            if !human_turn(&mut session, &mut input)? {
                break;
            }
            println!("{}\n", session.render());
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
