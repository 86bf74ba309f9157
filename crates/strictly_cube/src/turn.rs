//! Whose turn it is.

use crate::types::Player;
use tracing::{debug, instrument};

/// Tracks the player to move and who opens each game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnManager {
    first: Player,
    current: Player,
}

impl TurnManager {
    /// Creates a turn manager where `first` opens the game.
    pub fn new(first: Player) -> Self {
        Self {
            first,
            current: first,
        }
    }

    /// Returns the player to move.
    pub fn current(&self) -> Player {
        self.current
    }

    /// Returns the player who opens each game.
    pub fn first(&self) -> Player {
        self.first
    }

    /// Hands the turn to the other player and returns them.
    #[instrument(skip(self), fields(from = %self.current))]
    pub fn switch(&mut self) -> Player {
        self.current = self.current.opponent();
        debug!(to = %self.current, "Turn switched");
        self.current
    }

    /// Returns the turn to the opening player.
    pub fn reset(&mut self) {
        self.current = self.first;
    }
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new(Player::X)
    }
}
