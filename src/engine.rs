// =============================================================================
// Move-selection policies
//
// A policy only consumes the public game interface: it asks for legal moves
// and duck targets and returns a choice. `play_turn` feeds those choices back
// through `execute_move` and `place_duck`, so a policy can never bypass the
// rules. The shipped policy is a uniform random choice.
// =============================================================================

use log::debug;

use crate::error::GameError;
use crate::game::{Game, Phase};
use crate::moves::{square_name, Move, Square};
use crate::piece::Color;

/// Platform-appropriate random number in [0, 1).
/// Uses js_sys::Math::random() in WASM builds, rand crate natively.
fn random_f64() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Math::random()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }
}

fn pick<T: Copy>(items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let index = ((random_f64() * items.len() as f64) as usize).min(items.len() - 1);
    Some(items[index])
}

pub trait Policy {
    /// A piece move for the side to move, or `None` if it has none.
    fn choose_piece_move(&mut self, game: &Game) -> Option<Move>;

    /// Where to put the duck once the piece move is made.
    fn choose_duck_square(&mut self, game: &Game) -> Option<Square>;
}

/// Uniform choice over every generated move and every free duck square.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose_piece_move(&mut self, game: &Game) -> Option<Move> {
        pick(&game.all_legal_moves(game.current_turn()))
    }

    fn choose_duck_square(&mut self, game: &Game) -> Option<Square> {
        pick(&game.duck_targets())
    }
}

/// Play one full turn for the side to move: piece move, then duck. Stops early
/// when the piece move ends the game. A pending promotion (a side the config
/// does not mark as policy-driven) is resolved with the configured kind.
pub fn play_turn<P: Policy>(game: &mut Game, policy: &mut P) -> Result<(), GameError> {
    if game.phase() == Phase::MovePiece {
        let mv = policy
            .choose_piece_move(game)
            .ok_or(GameError::NoLegalMoves)?;
        debug!("policy move {}", mv.to_uci());
        game.execute_move(mv.from, mv.to)?;
    }

    if let Phase::Promotion(_) = game.phase() {
        let kind = game.config().promotion_kind();
        game.supply_promotion_choice(kind)?;
    }

    match game.phase() {
        Phase::PlaceDuck => {
            let target = policy
                .choose_duck_square(game)
                .ok_or(GameError::NoLegalMoves)?;
            debug!("policy duck {}", square_name(target));
            game.place_duck(target)
        }
        Phase::GameOver => Ok(()),
        actual => Err(GameError::WrongPhase {
            expected: "PlaceDuck",
            actual,
        }),
    }
}

/// Play turns until the game ends or `max_turns` have been played. Returns the
/// number of turns played.
pub fn play_game<P: Policy>(game: &mut Game, white: &mut P, black: &mut P, max_turns: usize) -> Result<usize, GameError> {
    let mut played = 0;
    while !game.is_game_over().0 && played < max_turns {
        match game.current_turn() {
            Color::White => play_turn(game, white)?,
            Color::Black => play_turn(game, black)?,
        }
        played += 1;
    }
    Ok(played)
}
