// Algebraic move text for the move log. Purely descriptive: nothing here is
// read back when replaying a game.

use crate::board::Board;
use crate::moves::{file_char, rank_char, square_name, Square};
use crate::piece::{Color, Piece, PieceType};

pub const KINGSIDE_CASTLE: &str = "O-O";
pub const QUEENSIDE_CASTLE: &str = "O-O-O";

/// Text for the piece part of a move, computed on the board *before* the move
/// is applied: castling token, or letter + disambiguation + capture + target.
/// Promotion and check suffixes are appended by the caller once known.
pub fn piece_move_text(board: &Board, from: Square, to: Square, en_passant_target: Option<Square>) -> String {
    let piece = match board.get(from) {
        Some(p) => p,
        None => return String::new(),
    };

    if piece.piece_type == PieceType::King && from.1.abs_diff(to.1) == 2 {
        let token = if to.1 > from.1 { KINGSIDE_CASTLE } else { QUEENSIDE_CASTLE };
        return token.to_string();
    }

    let is_pawn = piece.piece_type == PieceType::Pawn;
    let is_capture = board.get(to).is_some() || (is_pawn && from.1 != to.1);

    let mut text = String::new();
    if !is_pawn {
        text.push(piece.piece_type.letter());
        text.push_str(&disambiguation(board, from, to, piece, en_passant_target));
    }
    if is_capture {
        if is_pawn {
            text.push(file_char(from.1));
        }
        text.push('x');
    }
    text.push_str(&square_name(to));
    text
}

/// Extra file and/or rank needed when another piece of the same kind and
/// color could also reach `to`. File is preferred, then rank, then both.
pub fn disambiguation(board: &Board, from: Square, to: Square, piece: Piece, en_passant_target: Option<Square>) -> String {
    if piece.piece_type == PieceType::Pawn {
        return String::new();
    }

    let mut rivals = Vec::new();
    for r in 0..8 {
        for c in 0..8 {
            if (r, c) == from {
                continue;
            }
            let same = board
                .get((r, c))
                .map(|p| p.piece_type == piece.piece_type && p.color == piece.color)
                .unwrap_or(false);
            if same && board.legal_destinations((r, c), en_passant_target).contains(&to) {
                rivals.push((r, c));
            }
        }
    }

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|&(_, c)| c != from.1) {
        return file_char(from.1).to_string();
    }
    if rivals.iter().all(|&(r, _)| r != from.0) {
        return rank_char(from.0).to_string();
    }
    format!("{}{}", file_char(from.1), rank_char(from.0))
}

pub fn promotion_suffix(piece_type: PieceType) -> String {
    format!("={}", piece_type.letter())
}

/// Move text with the duck's landing square, e.g. "e4 @ e3".
pub fn with_duck(move_text: &str, duck: Square) -> String {
    format!("{move_text} @ {}", square_name(duck))
}

/// Log line numbered by full move: "1. e4 @ e3" for White, "1... e5 @ d4" for Black.
pub fn log_line(fullmove_number: u32, mover: Color, text: &str) -> String {
    match mover {
        Color::White => format!("{fullmove_number}. {text}"),
        Color::Black => format!("{fullmove_number}... {text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::parse_square;

    fn sq(name: &str) -> Square {
        parse_square(name).expect("valid square")
    }

    fn place(board: &mut Board, name: &str, pt: PieceType, color: Color) {
        board.set(sq(name), Some(Piece::new(pt, color)));
    }

    #[test]
    fn pawn_push_and_capture() {
        let mut board = Board::new();
        assert_eq!(piece_move_text(&board, sq("e2"), sq("e4"), None), "e4");

        place(&mut board, "d3", PieceType::Knight, Color::Black);
        assert_eq!(piece_move_text(&board, sq("e2"), sq("d3"), None), "exd3");
        assert_eq!(piece_move_text(&board, sq("b1"), sq("c3"), None), "Nc3");
    }

    #[test]
    fn en_passant_reads_as_capture() {
        let mut board = Board::empty();
        place(&mut board, "e5", PieceType::Pawn, Color::White);
        place(&mut board, "d5", PieceType::Pawn, Color::Black);
        assert_eq!(piece_move_text(&board, sq("e5"), sq("d6"), Some(sq("d6"))), "exd6");
    }

    #[test]
    fn castling_tokens() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        assert_eq!(piece_move_text(&board, sq("e1"), sq("g1"), None), "O-O");
        assert_eq!(piece_move_text(&board, sq("e1"), sq("c1"), None), "O-O-O");
    }

    #[test]
    fn disambiguates_by_file_then_rank_then_both() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Rook, Color::White);
        place(&mut board, "h1", PieceType::Rook, Color::White);
        assert_eq!(piece_move_text(&board, sq("a1"), sq("d1"), None), "Rad1");

        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Rook, Color::White);
        place(&mut board, "a5", PieceType::Rook, Color::White);
        assert_eq!(piece_move_text(&board, sq("a1"), sq("a3"), None), "R1a3");

        let mut board = Board::empty();
        place(&mut board, "d4", PieceType::Queen, Color::White);
        place(&mut board, "h4", PieceType::Queen, Color::White);
        place(&mut board, "d8", PieceType::Queen, Color::White);
        assert_eq!(piece_move_text(&board, sq("d4"), sq("h8"), None), "Qd4h8");
    }

    #[test]
    fn duck_can_remove_the_need_to_disambiguate() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Rook, Color::White);
        place(&mut board, "h1", PieceType::Rook, Color::White);
        board.duck = Some(sq("e1"));
        assert_eq!(piece_move_text(&board, sq("a1"), sq("d1"), None), "Rd1");
    }

    #[test]
    fn log_lines_alternate_format() {
        assert_eq!(log_line(1, Color::White, &with_duck("e4", sq("e3"))), "1. e4 @ e3");
        assert_eq!(log_line(1, Color::Black, "Nf6 @ d5"), "1... Nf6 @ d5");
        assert_eq!(promotion_suffix(PieceType::Knight), "=N");
    }
}
