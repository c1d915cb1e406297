use crate::config::GameConfig;
use crate::engine::{play_turn, RandomPolicy};
use crate::error::GameError;
use crate::game::{Game, Phase};
use crate::history::HistorySnapshot;
use crate::piece::{Color, PieceType};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    piece_type: String,
    color: String,
}

#[derive(Serialize)]
struct GameStateJson {
    squares: Vec<Vec<Option<SquarePiece>>>,
    duck: Option<[usize; 2]>,
    forbidden_duck: Option<[usize; 2]>,
    current_turn: String,
    phase: String,
    game_over: bool,
    winner: Option<String>,
    termination: Option<String>,
    is_in_check: bool,
    halfmove_clock: u32,
    move_log: Vec<String>,
    captured_white: Vec<String>,
    captured_black: Vec<String>,
    last_move: Option<[[usize; 2]; 2]>,
    history_len: usize,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    state: Option<GameStateJson>,
    error: Option<String>,
}

#[derive(Serialize)]
struct SnapshotJson {
    squares: Vec<Vec<Option<SquarePiece>>>,
    duck: Option<[usize; 2]>,
    prev_duck: Option<[usize; 2]>,
    last_move: Option<[[usize; 2]; 2]>,
    captured_white: Vec<String>,
    captured_black: Vec<String>,
    move_log: Vec<String>,
}

fn piece_type_to_string(pt: PieceType) -> String {
    format!("{pt:?}")
}

fn color_to_string(c: Color) -> String {
    c.name().to_string()
}

fn pair((r, c): (usize, usize)) -> [usize; 2] {
    [r, c]
}

fn squares_json(board: &crate::board::Board) -> Vec<Vec<Option<SquarePiece>>> {
    (0..8)
        .map(|r| {
            (0..8)
                .map(|c| {
                    board.squares[r][c].map(|p| SquarePiece {
                        piece_type: piece_type_to_string(p.piece_type),
                        color: color_to_string(p.color),
                    })
                })
                .collect()
        })
        .collect()
}

fn build_game_state(game: &Game) -> GameStateJson {
    let phase = match game.phase() {
        Phase::MovePiece => "move_piece",
        Phase::Promotion(_) => "promotion",
        Phase::PlaceDuck => "place_duck",
        Phase::GameOver => "game_over",
    };
    let outcome = game.outcome();
    GameStateJson {
        squares: squares_json(game.board()),
        duck: game.board().duck.map(pair),
        forbidden_duck: game.forbidden_duck_square().map(pair),
        current_turn: color_to_string(game.current_turn()),
        phase: phase.to_string(),
        game_over: outcome.is_some(),
        winner: outcome.map(|o| format!("{:?}", o.winner)),
        termination: outcome.map(|o| format!("{:?}", o.termination)),
        is_in_check: game.is_in_check(game.current_turn()),
        halfmove_clock: game.halfmove_clock(),
        move_log: game.move_log().to_vec(),
        captured_white: game.captured(Color::White).iter().map(|pt| piece_type_to_string(*pt)).collect(),
        captured_black: game.captured(Color::Black).iter().map(|pt| piece_type_to_string(*pt)).collect(),
        last_move: game.last_move().map(|(from, to)| [pair(from), pair(to)]),
        history_len: game.history().len(),
    }
}

fn build_snapshot(snapshot: &HistorySnapshot) -> SnapshotJson {
    SnapshotJson {
        squares: squares_json(&snapshot.board),
        duck: snapshot.duck.map(pair),
        prev_duck: snapshot.prev_duck.map(pair),
        last_move: snapshot.last_move.map(|(from, to)| [pair(from), pair(to)]),
        captured_white: snapshot.captured_white.iter().map(|pt| piece_type_to_string(*pt)).collect(),
        captured_black: snapshot.captured_black.iter().map(|pt| piece_type_to_string(*pt)).collect(),
        move_log: snapshot.move_log.clone(),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn respond(game: &Game, result: Result<(), GameError>) -> JsValue {
    let response = match result {
        Ok(()) => MoveResult {
            state: Some(build_game_state(game)),
            error: None,
        },
        Err(err) => MoveResult {
            state: None,
            error: Some(err.to_string()),
        },
    };
    to_js(&response)
}

#[wasm_bindgen]
pub struct DuckChess {
    game: Game,
    config: GameConfig,
}

#[wasm_bindgen]
impl DuckChess {
    /// `config_json` follows `GameConfig`; invalid or missing input uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> DuckChess {
        let config = config_json
            .as_deref()
            .and_then(|text| GameConfig::from_json(text).ok())
            .unwrap_or_default();
        DuckChess {
            game: Game::with_config(config.clone()),
            config,
        }
    }

    pub fn reset(&mut self) {
        self.game = Game::with_config(self.config.clone());
    }

    pub fn get_state(&self) -> JsValue {
        to_js(&build_game_state(&self.game))
    }

    pub fn get_legal_moves_for_square(&self, row: usize, col: usize) -> JsValue {
        let moves: Vec<[usize; 2]> = self.game.legal_moves((row, col)).into_iter().map(pair).collect();
        to_js(&moves)
    }

    pub fn make_move(&mut self, from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> JsValue {
        let result = self
            .game
            .execute_move((from_row, from_col), (to_row, to_col))
            .map(|_| ());
        respond(&self.game, result)
    }

    pub fn promote(&mut self, piece_type: &str) -> JsValue {
        let result = piece_type
            .parse::<PieceType>()
            .and_then(|pt| self.game.supply_promotion_choice(pt));
        respond(&self.game, result)
    }

    pub fn place_duck(&mut self, row: usize, col: usize) -> JsValue {
        let result = self.game.place_duck((row, col));
        respond(&self.game, result)
    }

    pub fn make_ai_turn(&mut self) -> JsValue {
        let result = play_turn(&mut self.game, &mut RandomPolicy);
        respond(&self.game, result)
    }

    pub fn get_snapshot(&self, index: usize) -> JsValue {
        match self.game.snapshot_at(index) {
            Some(snapshot) => to_js(&build_snapshot(snapshot)),
            None => JsValue::NULL,
        }
    }

    pub fn build_timestamp() -> String {
        env!("BUILD_TIMESTAMP").to_string()
    }
}
