use serde::{Deserialize, Serialize};

use crate::moves::{square_name, Square};
use crate::piece::{Color, Piece, PieceType};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

const STRAIGHT_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Files the king passes over when castling, which must be empty and duck-free.
const KINGSIDE_PATH: [usize; 2] = [5, 6];
const QUEENSIDE_PATH: [usize; 3] = [1, 2, 3];

/// Piece placement plus the duck. Game flow (turn, clocks, log) lives in
/// `Game`; the board only answers geometric questions.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
    /// `None` until the duck is placed for the first time.
    pub duck: Option<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces and no duck. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            duck: None,
        }
    }

    pub fn new() -> Self {
        let mut board = Board::empty();
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (col, &pt) in back.iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(pt, Color::White));
            board.squares[1][col] = Some(Piece::new(PieceType::Pawn, Color::White));
            board.squares[6][col] = Some(Piece::new(PieceType::Pawn, Color::Black));
            board.squares[7][col] = Some(Piece::new(pt, Color::Black));
        }
        board
    }

    pub fn in_bounds(row: i32, col: i32) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    fn offset(sq: Square, dr: i32, dc: i32) -> Option<Square> {
        let r = sq.0 as i32 + dr;
        let c = sq.1 as i32 + dc;
        if Self::in_bounds(r, c) {
            Some((r as usize, c as usize))
        } else {
            None
        }
    }

    pub fn get(&self, (row, col): Square) -> Option<Piece> {
        self.squares[row][col]
    }

    pub fn set(&mut self, (row, col): Square, piece: Option<Piece>) {
        self.squares[row][col] = piece;
    }

    pub fn is_duck(&self, sq: Square) -> bool {
        self.duck == Some(sq)
    }

    /// True when neither a piece nor the duck stands on `sq`.
    pub fn is_vacant(&self, sq: Square) -> bool {
        self.get(sq).is_none() && !self.is_duck(sq)
    }

    fn holds_color(&self, sq: Square, color: Color) -> bool {
        self.get(sq).map(|p| p.color == color).unwrap_or(false)
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|p| p.is_some()).count()
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        for r in 0..8 {
            for c in 0..8 {
                if let Some(p) = self.squares[r][c] {
                    if p.piece_type == PieceType::King && p.color == color {
                        return Some((r, c));
                    }
                }
            }
        }
        None
    }

    /// Whether any piece of `attacker` hits (row, col). Sliding attacks stop at
    /// the duck exactly as they would at a piece.
    pub fn is_square_attacked_by(&self, row: usize, col: usize, attacker: Color) -> bool {
        let target = (row, col);
        let hits = |sq: Option<Square>, kind: PieceType| {
            sq.and_then(|s| self.get(s))
                .map(|p| p.color == attacker && p.piece_type == kind)
                .unwrap_or(false)
        };

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, dc)| hits(Self::offset(target, dr, dc), PieceType::Knight))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(dr, dc)| hits(Self::offset(target, dr, dc), PieceType::King))
        {
            return true;
        }

        // A pawn on (row - pawn_dir, col ± 1) attacks (row, col)
        let pawn_dir = attacker.pawn_direction();
        for dc in [-1, 1] {
            if hits(Self::offset(target, -pawn_dir, dc), PieceType::Pawn) {
                return true;
            }
        }

        for (dirs, slider) in [(STRAIGHT_DIRS, PieceType::Rook), (DIAGONAL_DIRS, PieceType::Bishop)] {
            for (dr, dc) in dirs {
                let mut cur = Self::offset(target, dr, dc);
                while let Some(sq) = cur {
                    if self.is_duck(sq) {
                        break;
                    }
                    if let Some(p) = self.get(sq) {
                        if p.color == attacker
                            && (p.piece_type == slider || p.piece_type == PieceType::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                    cur = Self::offset(sq, dr, dc);
                }
            }
        }

        false
    }

    /// Informational only: Duck Chess never filters moves by check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some((kr, kc)) => self.is_square_attacked_by(kr, kc, color.opposite()),
            None => false,
        }
    }

    /// Every square the piece on `from` may move to. Moves that leave the
    /// mover's own king attacked are included.
    pub fn legal_destinations(&self, from: Square, en_passant_target: Option<Square>) -> Vec<Square> {
        let mut dests = Vec::new();
        let piece = match self.get(from) {
            Some(p) => p,
            None => return dests,
        };
        match piece.piece_type {
            PieceType::Pawn => self.generate_pawn_moves(from, piece.color, en_passant_target, &mut dests),
            PieceType::Knight => self.generate_step_moves(from, piece.color, &KNIGHT_OFFSETS, &mut dests),
            PieceType::Bishop => self.generate_sliding_moves(from, piece.color, &DIAGONAL_DIRS, &mut dests),
            PieceType::Rook => self.generate_sliding_moves(from, piece.color, &STRAIGHT_DIRS, &mut dests),
            PieceType::Queen => {
                self.generate_sliding_moves(from, piece.color, &STRAIGHT_DIRS, &mut dests);
                self.generate_sliding_moves(from, piece.color, &DIAGONAL_DIRS, &mut dests);
            }
            PieceType::King => self.generate_king_moves(from, piece, &mut dests),
        }
        dests
    }

    fn generate_pawn_moves(
        &self,
        from: Square,
        color: Color,
        en_passant_target: Option<Square>,
        dests: &mut Vec<Square>,
    ) {
        let dir = color.pawn_direction();
        let start_row = match color {
            Color::White => 1,
            Color::Black => 6,
        };

        // Pushes
        if let Some(one) = Self::offset(from, dir, 0) {
            if self.is_vacant(one) {
                dests.push(one);
                if from.0 == start_row {
                    if let Some(two) = Self::offset(from, 2 * dir, 0) {
                        if self.is_vacant(two) {
                            dests.push(two);
                        }
                    }
                }
            }
        }

        // Captures (including en passant)
        for dc in [-1, 1] {
            let to = match Self::offset(from, dir, dc) {
                Some(sq) => sq,
                None => continue,
            };
            if self.holds_color(to, color.opposite()) {
                dests.push(to);
            } else if en_passant_target == Some(to) && self.is_vacant(to) {
                let passed = self
                    .get((from.0, to.1))
                    .map(|p| p.piece_type == PieceType::Pawn && p.color != color)
                    .unwrap_or(false);
                if passed {
                    dests.push(to);
                }
            }
        }
    }

    fn generate_step_moves(&self, from: Square, color: Color, offsets: &[(i32, i32)], dests: &mut Vec<Square>) {
        for &(dr, dc) in offsets {
            if let Some(to) = Self::offset(from, dr, dc) {
                if !self.is_duck(to) && !self.holds_color(to, color) {
                    dests.push(to);
                }
            }
        }
    }

    fn generate_sliding_moves(&self, from: Square, color: Color, directions: &[(i32, i32)], dests: &mut Vec<Square>) {
        for &(dr, dc) in directions {
            let mut cur = Self::offset(from, dr, dc);
            while let Some(to) = cur {
                if self.is_duck(to) {
                    break;
                }
                if let Some(p) = self.get(to) {
                    if p.color != color {
                        dests.push(to);
                    }
                    break;
                }
                dests.push(to);
                cur = Self::offset(to, dr, dc);
            }
        }
    }

    fn generate_king_moves(&self, from: Square, king: Piece, dests: &mut Vec<Square>) {
        self.generate_step_moves(from, king.color, &KING_OFFSETS, dests);

        if king.has_moved || from != (king.color.back_rank(), 4) {
            return;
        }
        if self.can_castle(from, true) {
            dests.push((from.0, 6));
        }
        if self.can_castle(from, false) {
            dests.push((from.0, 2));
        }
    }

    /// Castling needs an unmoved rook of the king's color in the corner and an
    /// empty, duck-free path. Attacked transit squares do not matter.
    pub fn can_castle(&self, king_square: Square, kingside: bool) -> bool {
        let color = match self.get(king_square) {
            Some(p) => p.color,
            None => return false,
        };
        let row = king_square.0;
        let rook_col = if kingside { 7 } else { 0 };
        let path: &[usize] = if kingside { &KINGSIDE_PATH[..] } else { &QUEENSIDE_PATH[..] };
        let rook_ready = self
            .get((row, rook_col))
            .map(|p| p.piece_type == PieceType::Rook && p.color == color && !p.has_moved)
            .unwrap_or(false);
        rook_ready && path.iter().all(|&c| self.is_vacant((row, c)))
    }

    /// Canonical text key of placement, duck, side to move and en-passant
    /// target. Clocks and `has_moved` flags are deliberately absent.
    pub fn signature(&self, turn: Color, en_passant_target: Option<Square>) -> String {
        let mut key = String::with_capacity(96);
        for row in (0..8).rev() {
            let mut gap = 0;
            for col in 0..8 {
                let glyph = if self.is_duck((row, col)) {
                    Some('@')
                } else {
                    self.squares[row][col].map(|p| p.symbol())
                };
                match glyph {
                    Some(g) => {
                        if gap > 0 {
                            key.push_str(&gap.to_string());
                            gap = 0;
                        }
                        key.push(g);
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                key.push_str(&gap.to_string());
            }
            if row > 0 {
                key.push('/');
            }
        }
        key.push(' ');
        key.push(match turn {
            Color::White => 'w',
            Color::Black => 'b',
        });
        key.push(' ');
        match en_passant_target {
            Some(sq) => key.push_str(&square_name(sq)),
            None => key.push('-'),
        }
        key
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

    fn sorted(mut v: Vec<Square>) -> Vec<Square> {
        v.sort();
        v
    }

    #[test]
    fn destinations_never_hit_friends_or_duck() {
        let mut board = Board::new();
        board.squares[1][4] = None;
        board.squares[3][4] = Some(Piece::new(PieceType::Pawn, Color::White));
        board.duck = Some(sq("d3"));
        for r in 0..8 {
            for c in 0..8 {
                let piece = match board.squares[r][c] {
                    Some(p) => p,
                    None => continue,
                };
                for to in board.legal_destinations((r, c), None) {
                    assert!(!board.is_duck(to), "{} lands on the duck", square_name((r, c)));
                    assert!(
                        board.get(to).map(|p| p.color != piece.color).unwrap_or(true),
                        "{} -> {} captures a friend",
                        square_name((r, c)),
                        square_name(to)
                    );
                }
            }
        }
    }

    #[test]
    fn duck_blocks_sliders_without_being_a_target() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Rook, Color::White);
        board.duck = Some(sq("a4"));
        let dests = sorted(board.legal_destinations(sq("a1"), None));
        assert!(dests.contains(&sq("a3")));
        assert!(!dests.contains(&sq("a4")));
        assert!(!dests.contains(&sq("a5")));
        assert!(dests.contains(&sq("h1")));
    }

    #[test]
    fn knight_jumps_over_duck_but_cannot_land_on_it() {
        let mut board = Board::empty();
        place(&mut board, "b1", PieceType::Knight, Color::White);
        board.duck = Some(sq("c3"));
        let dests = board.legal_destinations(sq("b1"), None);
        assert_eq!(sorted(dests), sorted(vec![sq("a3"), sq("d2")]));

        board.duck = Some(sq("b2"));
        let dests = board.legal_destinations(sq("b1"), None);
        assert_eq!(dests.len(), 3);
    }

    #[test]
    fn duck_stops_pawn_pushes() {
        let mut board = Board::new();
        board.duck = Some(sq("e4"));
        assert_eq!(board.legal_destinations(sq("e2"), None), vec![sq("e3")]);

        board.duck = Some(sq("e3"));
        assert!(board.legal_destinations(sq("e2"), None).is_empty());
    }

    #[test]
    fn en_passant_needs_a_passed_pawn_and_a_free_square() {
        let mut board = Board::empty();
        place(&mut board, "e5", PieceType::Pawn, Color::White);
        place(&mut board, "d5", PieceType::Pawn, Color::Black);
        let dests = board.legal_destinations(sq("e5"), Some(sq("d6")));
        assert!(dests.contains(&sq("d6")));

        board.duck = Some(sq("d6"));
        let dests = board.legal_destinations(sq("e5"), Some(sq("d6")));
        assert!(!dests.contains(&sq("d6")));

        board.duck = None;
        board.set(sq("d5"), None);
        let dests = board.legal_destinations(sq("e5"), Some(sq("d6")));
        assert!(!dests.contains(&sq("d6")));
    }

    #[test]
    fn castling_requires_clear_transit_and_no_duck() {
        let mut board = Board::new();
        let king = sq("e1");
        assert!(!board.legal_destinations(king, None).contains(&sq("g1")));

        board.set(sq("f1"), None);
        assert!(!board.legal_destinations(king, None).contains(&sq("g1")));

        board.set(sq("g1"), None);
        assert!(board.legal_destinations(king, None).contains(&sq("g1")));

        board.duck = Some(sq("g1"));
        assert!(!board.legal_destinations(king, None).contains(&sq("g1")));
        board.duck = Some(sq("f1"));
        assert!(!board.can_castle(king, true));
    }

    #[test]
    fn queenside_castling_checks_b_file_too() {
        let mut board = Board::new();
        let king = sq("e1");
        board.set(sq("c1"), None);
        board.set(sq("d1"), None);
        assert!(!board.can_castle(king, false));
        board.set(sq("b1"), None);
        assert!(board.can_castle(king, false));
        assert!(board.legal_destinations(king, None).contains(&sq("c1")));
    }

    #[test]
    fn moved_rook_or_king_forbids_castling() {
        let mut board = Board::new();
        board.set(sq("f1"), None);
        board.set(sq("g1"), None);
        if let Some(rook) = board.squares[0][7].as_mut() {
            rook.has_moved = true;
        }
        assert!(!board.can_castle(sq("e1"), true));

        let mut board = Board::new();
        board.set(sq("f1"), None);
        board.set(sq("g1"), None);
        if let Some(king) = board.squares[0][4].as_mut() {
            king.has_moved = true;
        }
        assert!(!board.legal_destinations(sq("e1"), None).contains(&sq("g1")));
    }

    #[test]
    fn castling_ignores_attacked_squares() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "h1", PieceType::Rook, Color::White);
        place(&mut board, "f8", PieceType::Rook, Color::Black);
        assert!(board.is_square_attacked_by(0, 5, Color::Black));
        assert!(board.legal_destinations(sq("e1"), None).contains(&sq("g1")));
    }

    #[test]
    fn duck_shields_king_from_rays_only() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "e8", PieceType::Rook, Color::Black);
        assert!(board.is_in_check(Color::White));

        board.duck = Some(sq("e4"));
        assert!(!board.is_in_check(Color::White));

        place(&mut board, "d3", PieceType::Knight, Color::Black);
        assert!(board.is_in_check(Color::White));
    }

    #[test]
    fn pawn_attacks_point_forward() {
        let mut board = Board::empty();
        place(&mut board, "e4", PieceType::King, Color::White);
        place(&mut board, "d3", PieceType::Pawn, Color::Black);
        assert!(!board.is_in_check(Color::White));
        place(&mut board, "d5", PieceType::Pawn, Color::Black);
        assert!(board.is_in_check(Color::White));
    }

    #[test]
    fn captured_king_is_never_in_check() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Queen, Color::Black);
        assert!(!board.is_in_check(Color::White));
    }

    #[test]
    fn queries_are_idempotent() {
        let mut board = Board::new();
        board.duck = Some(sq("e5"));
        let before = board.clone();
        for r in 0..8 {
            for c in 0..8 {
                let first = board.legal_destinations((r, c), None);
                let second = board.legal_destinations((r, c), None);
                assert_eq!(first, second);
            }
        }
        assert_eq!(board, before);
    }

    #[test]
    fn signature_ignores_moved_flags_but_not_duck() {
        let mut board = Board::new();
        let base = board.signature(Color::White, None);
        assert_eq!(base, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w -");

        if let Some(p) = board.squares[0][0].as_mut() {
            p.has_moved = true;
        }
        assert_eq!(board.signature(Color::White, None), base);

        board.duck = Some(sq("d4"));
        assert_eq!(
            board.signature(Color::Black, Some(sq("e3"))),
            "rnbqkbnr/pppppppp/8/8/3@4/8/PPPPPPPP/RNBQKBNR b e3"
        );
    }
}
