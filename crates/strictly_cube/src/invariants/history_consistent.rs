//! History consistency invariant: history length matches occupied cells.

use super::Invariant;
use crate::lifecycle::GameLifecycle;

/// Invariant: History length equals number of occupied cells.
///
/// Every claim in history corresponds to exactly one occupied cell.
pub struct HistoryConsistentInvariant;

impl Invariant<GameLifecycle> for HistoryConsistentInvariant {
    fn holds(game: &GameLifecycle) -> bool {
        let occupied = game
            .board()
            .occupants()
            .iter()
            .filter(|o| !o.is_empty())
            .count();

        game.history().len() == occupied
    }

    fn description() -> &'static str {
        "History length matches number of occupied cells"
    }
}
