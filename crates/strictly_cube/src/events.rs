//! Game events and observer registration.

use crate::claim::ClaimRequest;
use crate::patterns::Pattern;
use crate::types::{Outcome, Player};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Something that happened to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The turn passed to `player`.
    TurnChanged {
        /// The player now to move.
        player: Player,
    },
    /// The game reached a terminal status.
    GameEnded {
        /// How it ended.
        outcome: Outcome,
        /// The completed line, for wins.
        pattern: Option<Pattern>,
    },
    /// A gated claim was opened and is waiting out its delay.
    GatedPending(ClaimRequest),
    /// A gated claim was written to the board.
    GatedCommitted(ClaimRequest),
    /// A gated claim was abandoned by reset or by the game ending.
    GatedCancelled(ClaimRequest),
}

type Callback<T> = Box<dyn FnMut(T)>;

/// Registered callbacks, grouped by event kind.
///
/// Callbacks run synchronously, in registration order, at the point the
/// event is emitted. Catch-all subscribers run after the typed ones.
#[derive(Default)]
pub struct Observers {
    turn_changed: Vec<Callback<Player>>,
    game_ended: Vec<Callback<Outcome>>,
    gated_pending: Vec<Callback<ClaimRequest>>,
    gated_committed: Vec<Callback<ClaimRequest>>,
    gated_cancelled: Vec<Callback<ClaimRequest>>,
    any: Vec<Box<dyn FnMut(&GameEvent)>>,
}

impl Observers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the new player whenever the turn changes.
    pub fn on_turn_changed(&mut self, callback: impl FnMut(Player) + 'static) {
        self.turn_changed.push(Box::new(callback));
    }

    /// Called once when the game is won or drawn.
    pub fn on_game_ended(&mut self, callback: impl FnMut(Outcome) + 'static) {
        self.game_ended.push(Box::new(callback));
    }

    /// Called when a gated claim starts waiting.
    pub fn on_gated_pending(&mut self, callback: impl FnMut(ClaimRequest) + 'static) {
        self.gated_pending.push(Box::new(callback));
    }

    /// Called when a gated claim is written to the board.
    pub fn on_gated_committed(&mut self, callback: impl FnMut(ClaimRequest) + 'static) {
        self.gated_committed.push(Box::new(callback));
    }

    /// Called when a gated claim is abandoned.
    pub fn on_gated_cancelled(&mut self, callback: impl FnMut(ClaimRequest) + 'static) {
        self.gated_cancelled.push(Box::new(callback));
    }

    /// Called with every event.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) {
        self.any.push(Box::new(callback));
    }

    /// Delivers `event` to everyone interested in it.
    pub fn emit(&mut self, event: GameEvent) {
        trace!(?event, "Emitting event");
        match event {
            GameEvent::TurnChanged { player } => {
                self.turn_changed.iter_mut().for_each(|cb| cb(player));
            }
            GameEvent::GameEnded { outcome, .. } => {
                self.game_ended.iter_mut().for_each(|cb| cb(outcome));
            }
            GameEvent::GatedPending(request) => {
                self.gated_pending.iter_mut().for_each(|cb| cb(request));
            }
            GameEvent::GatedCommitted(request) => {
                self.gated_committed.iter_mut().for_each(|cb| cb(request));
            }
            GameEvent::GatedCancelled(request) => {
                self.gated_cancelled.iter_mut().for_each(|cb| cb(request));
            }
        }
        self.any.iter_mut().for_each(|cb| cb(&event));
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("turn_changed", &self.turn_changed.len())
            .field("game_ended", &self.game_ended.len())
            .field("gated_pending", &self.gated_pending.len())
            .field("gated_committed", &self.gated_committed.len())
            .field("gated_cancelled", &self.gated_cancelled.len())
            .field("any", &self.any.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_typed_and_catch_all_callbacks() {
        let mut observers = Observers::new();
        let turns = Rc::new(RefCell::new(Vec::new()));
        let all = Rc::new(RefCell::new(Vec::new()));

        let sink = turns.clone();
        observers.on_turn_changed(move |player| sink.borrow_mut().push(player));
        let sink = all.clone();
        observers.subscribe(move |event| sink.borrow_mut().push(*event));

        observers.emit(GameEvent::TurnChanged { player: Player::O });
        observers.emit(GameEvent::GameEnded {
            outcome: Outcome::Draw,
            pattern: None,
        });

        assert_eq!(*turns.borrow(), vec![Player::O]);
        assert_eq!(all.borrow().len(), 2);
    }

    #[test]
    fn test_game_ended_receives_outcome() {
        let mut observers = Observers::new();
        let ended = Rc::new(RefCell::new(None));
        let sink = ended.clone();
        observers.on_game_ended(move |outcome| *sink.borrow_mut() = Some(outcome));

        observers.emit(GameEvent::GameEnded {
            outcome: Outcome::Winner(Player::X),
            pattern: None,
        });
        assert_eq!(*ended.borrow(), Some(Outcome::Winner(Player::X)));
    }
}
