//! Claim validation and the two-phase gated claim.
//!
//! Ordinary cells are claimed synchronously for the player to move. The
//! gated cell (the centre) is claimed in two phases: activation opens a
//! [`ClaimRequest`] for a specific player, and the request commits once the
//! commit delay has elapsed. The player is captured at activation and never
//! re-read from the turn state.
//!
//! A pending request is cancelled when the game is reset, and also when the
//! game ends through another move while it waits. A claim is never recorded
//! after the game is over.

use crate::error::{ClaimError, IllegalMove};
use crate::events::GameEvent;
use crate::lifecycle::{GameLifecycle, Transition};
use crate::schedule::{Scheduler, TaskHandle};
use crate::types::{Cell, Player};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default delay between activating the gated cell and the claim landing.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(1000);

/// Phase of a gated claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimPhase {
    /// Waiting for the commit delay.
    Pending,
    /// Written to the board.
    Committed,
    /// Abandoned before it could commit.
    Cancelled,
}

/// A claim on the gated cell, from activation to commit or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// The gated cell being claimed.
    pub target: Cell,
    /// The player who activated the cell. The commit goes to this player.
    pub claiming_player: Player,
    /// Clock reading at activation.
    pub started_at: Duration,
    /// Current phase.
    pub phase: ClaimPhase,
}

impl ClaimRequest {
    /// Returns a copy moved into `phase`.
    fn with_phase(self, phase: ClaimPhase) -> Self {
        Self { phase, ..self }
    }
}

/// Validates and commits claims for both the ordinary and the gated flow.
#[derive(Debug, Clone)]
pub struct ClaimProtocol {
    gated: Cell,
    commit_delay: Duration,
    pending: Option<(TaskHandle, ClaimRequest)>,
    scheduler: Scheduler<ClaimRequest>,
}

impl ClaimProtocol {
    /// Creates a protocol gating the centre cell.
    pub fn new(commit_delay: Duration) -> Self {
        Self {
            gated: Cell::CENTER,
            commit_delay,
            pending: None,
            scheduler: Scheduler::new(),
        }
    }

    /// The cell that needs activation.
    pub fn gated_cell(&self) -> Cell {
        self.gated
    }

    /// Delay between activation and commit.
    pub fn commit_delay(&self) -> Duration {
        self.commit_delay
    }

    /// The live request, if one is waiting.
    pub fn pending(&self) -> Option<&ClaimRequest> {
        self.pending.as_ref().map(|(_, request)| request)
    }

    /// When the live request is due, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Claims an ordinary cell for the player to move.
    #[instrument(skip(self, game))]
    pub fn claim(&mut self, game: &mut GameLifecycle, index: usize) -> Result<Transition, IllegalMove> {
        let cell = Cell::new(index)?;
        game.check_eligible(cell)?;
        if cell == self.gated {
            warn!(%cell, "Gated cell claimed without activation");
            return Err(IllegalMove::GatedCell(cell));
        }

        let player = game.current_player();
        game.place(cell, player)?;
        let transition = game.conclude(cell, player);
        self.after_commit(game, &transition);
        Ok(transition)
    }

    /// Opens a pending claim on the gated cell for `player`.
    ///
    /// Returns immediately; the claim lands on a later [`fire_due`](Self::fire_due).
    #[instrument(skip(self, game))]
    pub fn activate(
        &mut self,
        game: &mut GameLifecycle,
        player: Player,
        now: Duration,
    ) -> Result<ClaimRequest, ClaimError> {
        game.check_eligible(self.gated)?;
        if self.pending.is_some() {
            debug!("Activation rejected, request already pending");
            return Err(ClaimError::GatedCellBusy(self.gated));
        }

        let request = ClaimRequest {
            target: self.gated,
            claiming_player: player,
            started_at: now,
            phase: ClaimPhase::Pending,
        };
        let handle = self.scheduler.schedule(now + self.commit_delay, request);
        self.pending = Some((handle, request));
        debug!(%player, "Gated claim pending");
        game.emit(GameEvent::GatedPending(request));
        Ok(request)
    }

    /// Commits every request whose delay has elapsed by `now`.
    ///
    /// Returns the number of claims written to the board.
    #[instrument(skip(self, game))]
    pub fn fire_due(&mut self, game: &mut GameLifecycle, now: Duration) -> usize {
        let mut committed = 0;
        for (handle, request) in self.scheduler.take_due(now) {
            match self.pending {
                Some((live, _)) if live == handle => {}
                _ => {
                    debug!(id = handle.id, "Due task no longer matches pending request");
                    continue;
                }
            }
            self.pending = None;

            if let Err(err) = game.place(request.target, request.claiming_player) {
                warn!(error = %err, "Gated claim could not be committed");
                game.emit(GameEvent::GatedCancelled(request.with_phase(ClaimPhase::Cancelled)));
                continue;
            }
            game.emit(GameEvent::GatedCommitted(request.with_phase(ClaimPhase::Committed)));
            let transition = game.conclude(request.target, request.claiming_player);
            self.after_commit(game, &transition);
            committed += 1;
        }
        committed
    }

    /// Abandons the live request, if any, and invalidates its scheduled commit.
    #[instrument(skip(self, game))]
    pub fn cancel(&mut self, game: &mut GameLifecycle) {
        self.scheduler.invalidate();
        if let Some((_, request)) = self.pending.take() {
            info!(player = %request.claiming_player, "Gated claim cancelled");
            game.emit(GameEvent::GatedCancelled(request.with_phase(ClaimPhase::Cancelled)));
        }
    }

    fn after_commit(&mut self, game: &mut GameLifecycle, transition: &Transition) {
        if transition.is_terminal() && self.pending.is_some() {
            debug!("Game over with gated claim pending");
            self.cancel(game);
        }
    }
}

impl Default for ClaimProtocol {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameStatus, Occupant};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn setup() -> (ClaimProtocol, GameLifecycle) {
        (ClaimProtocol::default(), GameLifecycle::new(Player::X))
    }

    #[test]
    fn test_sync_claim_switches_turn() {
        let (mut protocol, mut game) = setup();
        let transition = protocol.claim(&mut game, 4).unwrap();
        assert_eq!(transition, Transition::Continued { next: Player::O });
        assert_eq!(game.board().occupant_at(4), Ok(Occupant::Occupied(Player::X)));
    }

    #[test]
    fn test_sync_claim_on_gated_cell_rejected() {
        let (mut protocol, mut game) = setup();
        assert_eq!(
            protocol.claim(&mut game, 13),
            Err(IllegalMove::GatedCell(Cell::CENTER))
        );
        assert!(game.board().is_empty(Cell::CENTER));
    }

    #[test]
    fn test_activate_then_commit_after_delay() {
        let (mut protocol, mut game) = setup();
        let request = protocol.activate(&mut game, Player::X, ms(0)).unwrap();
        assert_eq!(request.phase, ClaimPhase::Pending);
        assert_eq!(protocol.next_due(), Some(ms(1000)));

        assert_eq!(protocol.fire_due(&mut game, ms(999)), 0);
        assert!(game.board().is_empty(Cell::CENTER));

        assert_eq!(protocol.fire_due(&mut game, ms(1000)), 1);
        assert_eq!(game.board().get(Cell::CENTER), Occupant::Occupied(Player::X));
        assert!(protocol.pending().is_none());
        assert_eq!(game.current_player(), Player::O);
    }

    #[test]
    fn test_second_activation_busy() {
        let (mut protocol, mut game) = setup();
        protocol.activate(&mut game, Player::X, ms(0)).unwrap();
        assert_eq!(
            protocol.activate(&mut game, Player::O, ms(10)),
            Err(ClaimError::GatedCellBusy(Cell::CENTER))
        );
    }

    #[test]
    fn test_activation_on_taken_cell_is_illegal() {
        let (mut protocol, mut game) = setup();
        protocol.activate(&mut game, Player::X, ms(0)).unwrap();
        protocol.fire_due(&mut game, ms(1000));
        assert_eq!(
            protocol.activate(&mut game, Player::O, ms(2000)),
            Err(ClaimError::IllegalMove(IllegalMove::Occupied(Cell::CENTER)))
        );
    }

    #[test]
    fn test_commit_uses_captured_player() {
        let (mut protocol, mut game) = setup();
        protocol.activate(&mut game, Player::X, ms(0)).unwrap();
        protocol.claim(&mut game, 0).unwrap();
        assert_eq!(game.current_player(), Player::O);

        protocol.fire_due(&mut game, ms(1000));
        assert_eq!(game.board().get(Cell::CENTER), Occupant::Occupied(Player::X));
    }

    #[test]
    fn test_cancel_invalidates_scheduled_commit() {
        let (mut protocol, mut game) = setup();
        protocol.activate(&mut game, Player::X, ms(0)).unwrap();
        protocol.cancel(&mut game);

        assert!(protocol.pending().is_none());
        assert_eq!(protocol.fire_due(&mut game, ms(1000)), 0);
        assert!(game.board().is_empty(Cell::CENTER));
    }

    #[test]
    fn test_pending_cancelled_when_game_ends() {
        let (mut protocol, mut game) = setup();
        // X: 0, 1 then O activates centre, X completes 0-1-2 while O waits.
        protocol.claim(&mut game, 0).unwrap();
        protocol.claim(&mut game, 9).unwrap();
        protocol.claim(&mut game, 1).unwrap();
        protocol.activate(&mut game, Player::O, ms(0)).unwrap();
        protocol.claim(&mut game, 10).unwrap();
        let transition = protocol.claim(&mut game, 2).unwrap();
        assert!(transition.is_terminal());
        assert!(protocol.pending().is_none());

        assert_eq!(protocol.fire_due(&mut game, ms(1000)), 0);
        assert!(game.board().is_empty(Cell::CENTER));
        assert_eq!(game.status(), GameStatus::Won(Player::X));
    }
}
