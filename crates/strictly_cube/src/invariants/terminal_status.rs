//! Terminal status invariant: the status agrees with the board.

use super::Invariant;
use crate::lifecycle::GameLifecycle;
use crate::rules;
use crate::types::GameStatus;

/// Invariant: `Won(p)` iff the recorded winning line belongs to `p`, and a
/// game still in progress has a non-full board.
///
/// A draw only requires a full board: a line already on the board before the
/// last claim is not re-examined.
pub struct TerminalStatusInvariant;

impl Invariant<GameLifecycle> for TerminalStatusInvariant {
    fn holds(game: &GameLifecycle) -> bool {
        let board = game.board();
        match (game.status(), game.winning_pattern()) {
            (GameStatus::Won(player), Some(pattern)) => pattern
                .cells()
                .iter()
                .all(|cell| board.get(*cell).player() == Some(player)),
            (GameStatus::Draw, None) => rules::is_full(board),
            (GameStatus::InProgress, None) => {
                !rules::is_full(board) && rules::check_winner(board, game.catalog()).is_none()
            }
            _ => false,
        }
    }

    fn description() -> &'static str {
        "Status agrees with the board"
    }
}
