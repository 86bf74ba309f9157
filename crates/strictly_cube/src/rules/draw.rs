//! Draw detection.

use super::win::check_winner;
use crate::board::Board;
use crate::patterns::PatternCatalog;

/// Checks if the board is full (every cell occupied).
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// A full board with no completed line.
pub fn is_draw(board: &Board, catalog: &PatternCatalog) -> bool {
    is_full(board) && check_winner(board, catalog).is_none()
}
