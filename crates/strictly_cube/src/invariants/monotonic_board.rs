//! Monotonic board invariant: cells never change once set.

use super::Invariant;
use crate::board::Board;
use crate::lifecycle::GameLifecycle;

/// Invariant: Board cells are monotonic (never overwritten).
///
/// Replaying the claim history onto an empty board must never touch an
/// occupied cell and must reproduce the current occupants.
pub struct MonotonicBoardInvariant;

impl Invariant<GameLifecycle> for MonotonicBoardInvariant {
    fn holds(game: &GameLifecycle) -> bool {
        let mut reconstructed = Board::new();

        for claim in game.history() {
            if reconstructed.claim(claim.cell.index(), claim.player).is_err() {
                return false;
            }
        }

        reconstructed.occupants() == game.board().occupants()
    }

    fn description() -> &'static str {
        "Board cells are monotonic (never overwritten)"
    }
}
