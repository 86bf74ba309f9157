//! Win detection.

use crate::board::Board;
use crate::patterns::{Pattern, PatternCatalog};
use crate::types::{Cell, Occupant, Player};
use tracing::instrument;

/// Returns true if `player` owns every cell of `pattern`.
fn owns(board: &Board, pattern: &Pattern, player: Player) -> bool {
    pattern
        .cells()
        .iter()
        .all(|cell| board.get(*cell) == Occupant::Occupied(player))
}

/// Finds a line through `cell` fully owned by `player`.
///
/// Only the lines through the last claimed cell can have changed, so this
/// is all the lifecycle checks after a claim.
#[instrument(skip(board, catalog))]
pub fn winning_pattern_through(
    board: &Board,
    catalog: &PatternCatalog,
    cell: Cell,
    player: Player,
) -> Option<Pattern> {
    catalog
        .containing(cell)
        .find(|pattern| owns(board, pattern, player))
        .copied()
}

/// Scans the whole board for a completed line.
///
/// Returns the owner and the line, or `None` if no line is complete.
#[instrument(skip(board, catalog))]
pub fn check_winner(board: &Board, catalog: &PatternCatalog) -> Option<(Player, Pattern)> {
    catalog.patterns().iter().find_map(|pattern| {
        let [a, ..] = pattern.cells();
        let player = board.get(a).player()?;
        owns(board, pattern, player).then_some((player, *pattern))
    })
}
