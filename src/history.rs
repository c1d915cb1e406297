use serde::Serialize;

use crate::board::Board;
use crate::moves::Square;
use crate::piece::PieceType;

/// Frozen view of the game after a completed turn. Holds deep copies, so
/// later moves cannot alter it.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct HistorySnapshot {
    pub board: Board,
    pub duck: Option<Square>,
    pub prev_duck: Option<Square>,
    pub last_move: Option<(Square, Square)>,
    pub captured_white: Vec<PieceType>,
    pub captured_black: Vec<PieceType>,
    pub move_log: Vec<String>,
}

/// Append-only sequence of snapshots, read by index.
#[derive(Clone, Serialize, Debug, Default)]
pub struct History {
    snapshots: Vec<HistorySnapshot>,
}

impl History {
    pub fn new() -> Self {
        History { snapshots: Vec::new() }
    }

    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.snapshots.push(snapshot);
    }

    /// `None` for an index past the end.
    pub fn get(&self, index: usize) -> Option<&HistorySnapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(log: &[&str]) -> HistorySnapshot {
        HistorySnapshot {
            board: Board::new(),
            duck: None,
            prev_duck: None,
            last_move: None,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            move_log: log.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.push(snapshot(&[]));
        history.push(snapshot(&["1. e4 @ e3"]));
        assert_eq!(history.len(), 2);
        assert!(history.get(2).is_none());
        assert_eq!(history.get(1).map(|s| s.move_log.len()), Some(1));
    }
}
