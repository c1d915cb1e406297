use std::collections::BTreeMap;
use std::io::Write;

use duck_chess::config::{GameConfig, GameMode};
use duck_chess::engine::{play_game, RandomPolicy};
use duck_chess::game::{Game, Winner};
use serde::Serialize;

const MAX_TURNS: usize = 400;
const DEFAULT_GAMES: usize = 100;

#[derive(Debug, Default, Serialize)]
struct Summary {
    games: usize,
    white_wins: u32,
    black_wins: u32,
    draws: u32,
    unfinished: u32,
    /// Games stopped by an engine error; excluded from `average_turns`.
    aborted: u32,
    /// Finished games keyed by how they ended.
    terminations: BTreeMap<String, u32>,
    average_turns: f64,
}

impl Summary {
    fn record(&mut self, game: &Game) {
        match game.outcome() {
            Some(outcome) => {
                match outcome.winner {
                    Winner::White => self.white_wins += 1,
                    Winner::Black => self.black_wins += 1,
                    Winner::Draw => self.draws += 1,
                }
                *self
                    .terminations
                    .entry(format!("{:?}", outcome.termination))
                    .or_insert(0) += 1;
            }
            None => self.unfinished += 1,
        }
    }

    fn finish(&mut self, total_turns: usize) {
        let counted = self.games.saturating_sub(self.aborted as usize);
        if counted > 0 {
            self.average_turns = total_turns as f64 / counted as f64;
        }
    }
}

fn load_config(path: Option<&str>) -> Result<GameConfig, String> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            GameConfig::from_json(&text).map_err(|e| format!("{path}: {e}"))?
        }
        None => GameConfig::new(),
    };
    // Both sides are random policies, so nothing may wait on a promotion choice.
    config.mode = GameMode::AiVsAi;
    Ok(config)
}

fn main() {
    env_logger::init();

    // Usage: simulate [games] [config.json]
    let args: Vec<String> = std::env::args().collect();
    let games = args
        .get(1)
        .and_then(|n| n.parse().ok())
        .unwrap_or(DEFAULT_GAMES);
    let config = match load_config(args.get(2).map(String::as_str)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bad config: {err}");
            std::process::exit(1);
        }
    };

    let mut summary = Summary {
        games,
        ..Summary::default()
    };
    let mut total_turns = 0usize;

    for i in 0..games {
        let mut game = Game::with_config(config.clone());
        let turns = match play_game(&mut game, &mut RandomPolicy, &mut RandomPolicy, MAX_TURNS) {
            Ok(turns) => turns,
            Err(err) => {
                eprintln!("game {i} aborted: {err}");
                summary.aborted += 1;
                continue;
            }
        };
        total_turns += turns;
        summary.record(&game);

        if (i + 1) % 10 == 0 {
            eprint!(".");
            std::io::stderr().flush().ok();
        }
    }
    eprintln!();

    summary.finish(total_turns);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("could not encode summary: {err}"),
    }
}
