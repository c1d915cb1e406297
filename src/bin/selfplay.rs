use duck_chess::config::{GameConfig, GameMode};
use duck_chess::engine::{play_game, RandomPolicy};
use duck_chess::game::Game;

const MAX_TURNS: usize = 400;

fn main() {
    env_logger::init();
    log::info!("duck_chess selfplay, built {}", env!("BUILD_TIMESTAMP"));

    let mut config = GameConfig::new();
    config.mode = GameMode::AiVsAi;
    let mut game = Game::with_config(config);

    let turns = match play_game(&mut game, &mut RandomPolicy, &mut RandomPolicy, MAX_TURNS) {
        Ok(turns) => turns,
        Err(err) => {
            eprintln!("selfplay stopped: {err}");
            std::process::exit(1);
        }
    };

    for line in game.move_log() {
        println!("{line}");
    }
    match game.outcome() {
        Some(outcome) => eprintln!(
            "Game over after {turns} turns: {:?} ({:?})",
            outcome.winner, outcome.termination
        ),
        None => eprintln!("Stopped after {turns} turns without a result"),
    }
}
