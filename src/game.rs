// =============================================================================
// Duck Chess game flow
//
// A turn is two sub-moves: a piece move (`execute_move`, possibly followed by
// `supply_promotion_choice`) and a duck placement (`place_duck`). Every
// mutating call validates completely before it writes, so a rejected request
// leaves the game exactly as it was.
//
// Check never restricts moves. The game is won by capturing the king; it is
// also decided after each duck placement by the half-move clock, repetition
// and stalemate, in that order.
// =============================================================================

use std::collections::HashMap;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{GameConfig, StalemateRule};
use crate::error::GameError;
use crate::history::{History, HistorySnapshot};
use crate::moves::{square_name, Move, Square};
use crate::notation;
use crate::piece::{Color, PieceType};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Phase {
    MovePiece,
    /// A pawn on this square waits for its promotion kind.
    Promotion(Square),
    PlaceDuck,
    GameOver,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Termination {
    KingCaptured,
    Stalemate,
    FiftyMoveRule,
    Repetition,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Winner,
    pub termination: Termination,
}

#[derive(Clone, Serialize, Debug)]
pub struct Game {
    board: Board,
    current_turn: Color,
    phase: Phase,
    en_passant_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    repetitions: HashMap<String, usize>,
    outcome: Option<Outcome>,
    /// Where the duck stood when the current piece move was made; the duck may
    /// not be put back there.
    prev_duck: Option<Square>,
    last_move: Option<(Square, Square)>,
    captured_white: Vec<PieceType>,
    captured_black: Vec<PieceType>,
    current_move_text: String,
    move_log: Vec<String>,
    history: History,
    config: GameConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(err: GameError) -> GameError {
    trace!("rejected: {err}");
    err
}

fn check_bounds((row, col): Square) -> Result<(), GameError> {
    if row < 8 && col < 8 {
        Ok(())
    } else {
        Err(reject(GameError::OutOfBounds(row, col)))
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(GameConfig::new())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::from_board(Board::new(), Color::White, config)
    }

    /// Start from an arbitrary position, e.g. a constructed test position.
    pub fn from_board(board: Board, current_turn: Color, config: GameConfig) -> Self {
        let mut game = Game {
            prev_duck: board.duck,
            board,
            current_turn,
            phase: Phase::MovePiece,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetitions: HashMap::new(),
            outcome: None,
            last_move: None,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            current_move_text: String::new(),
            move_log: Vec::new(),
            history: History::new(),
            config,
        };
        game.record_position();
        game.save_snapshot();
        game
    }

    // -------------------------------------------------------------------------
    // Read-only queries
    // -------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    /// The square the duck may not be placed on during the current duck phase.
    pub fn forbidden_duck_square(&self) -> Option<Square> {
        self.prev_duck
    }

    /// Pieces of `color` that have been captured, in capture order.
    pub fn captured(&self, color: Color) -> &[PieceType] {
        match color {
            Color::White => &self.captured_white,
            Color::Black => &self.captured_black,
        }
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    pub fn signature(&self) -> String {
        self.board.signature(self.current_turn, self.en_passant_target)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_game_over(&self) -> (bool, Option<Winner>) {
        (self.outcome.is_some(), self.outcome.map(|o| o.winner))
    }

    /// One entry per completed ply, duck placement included.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn snapshot_at(&self, index: usize) -> Option<&HistorySnapshot> {
        self.history.get(index)
    }

    /// Destinations for the piece on `square`, whichever side owns it.
    pub fn legal_moves(&self, square: Square) -> Vec<Square> {
        if square.0 >= 8 || square.1 >= 8 {
            return Vec::new();
        }
        self.board.legal_destinations(square, self.en_passant_target)
    }

    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                let own = self.board.squares[row][col]
                    .map(|p| p.color == color)
                    .unwrap_or(false);
                if !own {
                    continue;
                }
                for to in self.legal_moves((row, col)) {
                    moves.push(Move::new((row, col), to));
                }
            }
        }
        moves
    }

    /// Squares the duck may currently land on.
    pub fn duck_targets(&self) -> Vec<Square> {
        let mut targets = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                let sq = (row, col);
                if self.board.get(sq).is_none() && Some(sq) != self.prev_duck {
                    targets.push(sq);
                }
            }
        }
        targets
    }

    fn ensure_phase(&self, expected: Phase, name: &'static str) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(reject(GameError::GameOver));
        }
        if self.phase != expected {
            return Err(reject(GameError::WrongPhase {
                expected: name,
                actual: self.phase,
            }));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Piece move
    // -------------------------------------------------------------------------

    /// Move the piece on `from` to `to`. Returns the phase the game is in
    /// afterwards: `PlaceDuck`, `Promotion` or `GameOver`.
    pub fn execute_move(&mut self, from: Square, to: Square) -> Result<Phase, GameError> {
        self.ensure_phase(Phase::MovePiece, "MovePiece")?;
        check_bounds(from)?;
        check_bounds(to)?;
        let piece = self
            .board
            .get(from)
            .ok_or_else(|| reject(GameError::EmptySquare(square_name(from))))?;
        if piece.color != self.current_turn {
            return Err(reject(GameError::NotYourTurn));
        }
        if !self.legal_moves(from).contains(&to) {
            return Err(reject(GameError::IllegalMove {
                from: square_name(from),
                to: square_name(to),
            }));
        }

        // Validated; from here on every step commits.
        let text = notation::piece_move_text(&self.board, from, to, self.en_passant_target);
        let is_pawn = piece.piece_type == PieceType::Pawn;
        let mut captured = self.board.get(to);

        if is_pawn && from.1 != to.1 && captured.is_none() {
            let passed = (from.0, to.1);
            captured = self.board.get(passed);
            self.board.set(passed, None);
        }

        if piece.piece_type == PieceType::King && from.1.abs_diff(to.1) == 2 {
            let (rook_from, rook_to) = if to.1 > from.1 { (7, 5) } else { (0, 3) };
            if let Some(mut rook) = self.board.get((from.0, rook_from)) {
                rook.has_moved = true;
                self.board.set((from.0, rook_to), Some(rook));
                self.board.set((from.0, rook_from), None);
            }
        }

        if is_pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if let Some(victim) = captured {
            match victim.color {
                Color::White => self.captured_white.push(victim.piece_type),
                Color::Black => self.captured_black.push(victim.piece_type),
            }
        }

        let mut moved = piece;
        moved.has_moved = true;
        self.board.set(to, Some(moved));
        self.board.set(from, None);

        self.en_passant_target = if is_pawn && from.0.abs_diff(to.0) == 2 {
            Some(((from.0 + to.0) / 2, from.1))
        } else {
            None
        };
        self.last_move = Some((from, to));
        self.prev_duck = self.board.duck;
        self.current_move_text = text;
        debug!(
            "{} {} -> {} ({})",
            piece.color.name(),
            square_name(from),
            square_name(to),
            self.current_move_text
        );

        if captured.map(|p| p.piece_type == PieceType::King).unwrap_or(false) {
            self.finish_by_king_capture(piece.color);
            return Ok(self.phase);
        }

        if is_pawn && to.0 == piece.color.opposite().back_rank() {
            if self.config.mode.is_ai(piece.color) {
                self.promote(to, self.config.promotion_kind());
            } else {
                self.phase = Phase::Promotion(to);
                return Ok(self.phase);
            }
        }

        self.finish_piece_move();
        Ok(self.phase)
    }

    /// Resolve a pending promotion. Only Queen, Rook, Bishop and Knight are accepted.
    pub fn supply_promotion_choice(&mut self, piece_type: PieceType) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(reject(GameError::GameOver));
        }
        let square = match self.phase {
            Phase::Promotion(sq) => sq,
            actual => {
                return Err(reject(GameError::WrongPhase {
                    expected: "Promotion",
                    actual,
                }))
            }
        };
        if !piece_type.is_promotion_target() {
            return Err(reject(GameError::InvalidPromotion(piece_type)));
        }
        self.promote(square, piece_type);
        self.finish_piece_move();
        Ok(())
    }

    /// Appends `=X` to the move text before `finish_piece_move` adds any `+`,
    /// so a checking promotion reads `a8=Q+`.
    fn promote(&mut self, square: Square, piece_type: PieceType) {
        if let Some(pawn) = self.board.squares[square.0][square.1].as_mut() {
            pawn.piece_type = piece_type;
        }
        self.current_move_text.push_str(&notation::promotion_suffix(piece_type));
    }

    fn finish_piece_move(&mut self) {
        if self.board.is_in_check(self.current_turn.opposite()) {
            self.current_move_text.push('+');
        }
        self.phase = Phase::PlaceDuck;
    }

    fn finish_by_king_capture(&mut self, winner: Color) {
        // The winning move reads as a plain move to the king's square: `Qe8#`.
        self.current_move_text = self.current_move_text.replace('x', "");
        self.current_move_text.push('#');
        self.move_log.push(notation::log_line(
            self.fullmove_number,
            winner,
            &self.current_move_text,
        ));
        self.save_snapshot();
        self.end_game(winner.into(), Termination::KingCaptured);
    }

    // -------------------------------------------------------------------------
    // Duck placement
    // -------------------------------------------------------------------------

    /// Put the duck on `square`, completing the turn. Fails on an occupied
    /// square or on the square the duck stood on before this turn.
    pub fn place_duck(&mut self, square: Square) -> Result<(), GameError> {
        self.ensure_phase(Phase::PlaceDuck, "PlaceDuck")?;
        check_bounds(square)?;
        if self.board.get(square).is_some() {
            return Err(reject(GameError::SquareOccupied(square_name(square))));
        }
        if Some(square) == self.prev_duck {
            return Err(reject(GameError::DuckNotMoved(square_name(square))));
        }

        let text = notation::with_duck(&self.current_move_text, square);
        self.move_log
            .push(notation::log_line(self.fullmove_number, self.current_turn, &text));
        debug!("{} duck -> {}", self.current_turn.name(), square_name(square));

        self.board.duck = Some(square);
        if self.current_turn == Color::Black {
            self.fullmove_number += 1;
        }
        self.current_turn = self.current_turn.opposite();
        self.phase = Phase::MovePiece;
        self.current_move_text.clear();
        self.save_snapshot();
        self.record_position();
        self.evaluate_termination();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Termination
    // -------------------------------------------------------------------------

    fn record_position(&mut self) {
        *self.repetitions.entry(self.signature()).or_insert(0) += 1;
    }

    fn repetition_count(&self) -> usize {
        self.repetitions.get(&self.signature()).copied().unwrap_or(0)
    }

    fn evaluate_termination(&mut self) {
        if self.halfmove_clock >= self.config.halfmove_limit {
            self.end_game(Winner::Draw, Termination::FiftyMoveRule);
        } else if self.repetition_count() >= self.config.repetition_limit {
            self.end_game(Winner::Draw, Termination::Repetition);
        } else if self.all_legal_moves(self.current_turn).is_empty() {
            let winner: Winner = match self.config.stalemate_rule {
                StalemateRule::LossForStalemated => self.current_turn.opposite().into(),
                StalemateRule::Draw => Winner::Draw,
            };
            self.end_game(winner, Termination::Stalemate);
        }
    }

    fn end_game(&mut self, winner: Winner, termination: Termination) {
        info!("game over: {winner:?} by {termination:?}");
        self.outcome = Some(Outcome { winner, termination });
        self.phase = Phase::GameOver;
    }

    fn save_snapshot(&mut self) {
        self.history.push(HistorySnapshot {
            board: self.board.clone(),
            duck: self.board.duck,
            prev_duck: self.prev_duck,
            last_move: self.last_move,
            captured_white: self.captured_white.clone(),
            captured_black: self.captured_black.clone(),
            move_log: self.move_log.clone(),
        });
    }
}
