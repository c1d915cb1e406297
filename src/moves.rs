use serde::{Deserialize, Serialize};

/// Board coordinate as (row, col). Row 0 is rank 1, col 0 is file a.
pub type Square = (usize, usize);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Convert to UCI notation, e.g. "e2e4"
    pub fn to_uci(&self) -> String {
        format!("{}{}", square_name(self.from), square_name(self.to))
    }
}

pub fn file_char(col: usize) -> char {
    (b'a' + col as u8) as char
}

pub fn rank_char(row: usize) -> char {
    (b'1' + row as u8) as char
}

/// Algebraic name of a square, e.g. (3, 4) -> "e4".
pub fn square_name((row, col): Square) -> String {
    format!("{}{}", file_char(col), rank_char(row))
}

/// Parse an algebraic square name such as "e4".
pub fn parse_square(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (f, r) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    Some(((r - b'1') as usize, (f - b'a') as usize))
}
