//! The engine facade handed to the rendering and input layers.
//!
//! One [`CubeEngine`] is one session. It owns the board, the turn order,
//! the gated-claim protocol and the gesture classifier; nothing else mutates
//! them. Deferred gated commits are applied by [`CubeEngine::poll`], which
//! every mutating call also runs first, so effects land in time order.

use crate::claim::{ClaimProtocol, ClaimRequest};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{ClaimError, IllegalMove};
use crate::events::GameEvent;
use crate::gesture::{PointerGestureClassifier, ScreenPosition};
use crate::lifecycle::GameLifecycle;
use crate::patterns::Pattern;
use crate::types::{CELL_COUNT, Cell, Claim, GameStatus, Occupant, Outcome, OutOfRange, Player};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Occupants in canonical index order.
    pub board: [Occupant; CELL_COUNT],
    /// Player to move.
    pub current_player: Player,
    /// Game status.
    pub status: GameStatus,
    /// The completed line, once won.
    pub winning_pattern: Option<Pattern>,
    /// The gated claim waiting to commit, if any.
    pub pending: Option<ClaimRequest>,
}

/// Resolves a screen position to the cell drawn there.
///
/// Provided by the rendering layer; the engine never looks at the scene.
pub trait CellPicker {
    /// Returns the index of the cell under `position`, if any.
    fn resolve_cell(&self, position: ScreenPosition) -> Option<usize>;
}

impl<F> CellPicker for F
where
    F: Fn(ScreenPosition) -> Option<usize>,
{
    fn resolve_cell(&self, position: ScreenPosition) -> Option<usize> {
        self(position)
    }
}

/// What a pointer release did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The release was a drag or a long press; the view layer owns it.
    ViewGesture,
    /// A click that hit no cell.
    Missed,
    /// A click that claimed an ordinary cell.
    Claimed(BoardSnapshot),
    /// A click on the gated cell that opened a pending claim.
    GatedPending(ClaimRequest),
}

/// A 3x3x3 tic-tac-toe session.
pub struct CubeEngine<C = SystemClock> {
    config: EngineConfig,
    clock: C,
    game: GameLifecycle,
    protocol: ClaimProtocol,
    gestures: PointerGestureClassifier,
}

impl CubeEngine<SystemClock> {
    /// Creates a session on real time.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> CubeEngine<C> {
    /// Creates a session on the given clock.
    #[instrument(skip(clock))]
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        info!("Creating cube engine");
        Self {
            game: GameLifecycle::new(*config.first_player()),
            protocol: ClaimProtocol::new(config.commit_delay()),
            gestures: PointerGestureClassifier::new(*config.drag_threshold(), config.click_max()),
            clock,
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Claims an ordinary cell for the player to move.
    ///
    /// Gated commits that have come due land first, even when the claim
    /// itself is then rejected. A rejected claim changes nothing else.
    #[instrument(skip(self))]
    pub fn claim_cell(&mut self, index: usize) -> Result<BoardSnapshot, IllegalMove> {
        self.poll();
        self.protocol.claim(&mut self.game, index)?;
        Ok(self.snapshot())
    }

    /// Opens a pending claim on the gated cell for `player`.
    ///
    /// Returns at once; the claim lands when the commit delay has elapsed
    /// and the engine is polled.
    #[instrument(skip(self))]
    pub fn activate_gated_cell(&mut self, player: Player) -> Result<(), ClaimError> {
        self.open_gated_claim(player)?;
        Ok(())
    }

    fn open_gated_claim(&mut self, player: Player) -> Result<ClaimRequest, ClaimError> {
        self.poll();
        let now = self.clock.now();
        self.protocol.activate(&mut self.game, player, now)
    }

    /// Clears the board, cancels any pending gated claim and hands the turn
    /// back to the opening player.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.protocol.cancel(&mut self.game);
        self.game.reset();
        self.gestures.cancel();
    }

    /// Applies every gated commit that has come due.
    ///
    /// Returns the number of claims committed.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let committed = self.protocol.fire_due(&mut self.game, now);
        if committed > 0 {
            debug!(committed, "Deferred commits applied");
        }
        committed
    }

    /// Clock reading at which the pending gated claim will commit.
    pub fn next_commit_due(&self) -> Option<Duration> {
        self.protocol.next_due()
    }

    /// Time left until the pending gated claim commits.
    pub fn time_until_commit(&self) -> Option<Duration> {
        self.next_commit_due()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    /// Returns the occupant at a raw index.
    pub fn occupant_at(&self, index: usize) -> Result<Occupant, OutOfRange> {
        self.game.board().occupant_at(index)
    }

    /// Returns the status.
    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.game.status().outcome()
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.game.current_player()
    }

    /// Returns the completed line once the game is won.
    pub fn winning_pattern(&self) -> Option<Pattern> {
        self.game.winning_pattern()
    }

    /// Returns the gated claim waiting to commit.
    pub fn pending_request(&self) -> Option<&ClaimRequest> {
        self.protocol.pending()
    }

    /// Returns the cell that needs activation.
    pub fn gated_cell(&self) -> Cell {
        self.protocol.gated_cell()
    }

    /// Returns the committed claims in order.
    pub fn history(&self) -> &[Claim] {
        self.game.history()
    }

    /// Formats the board for a terminal.
    pub fn render(&self) -> String {
        self.game.board().display()
    }

    /// Returns a read-only view of the session.
    ///
    /// Reading does not poll: a gated claim past its deadline shows as
    /// pending until [`poll`](Self::poll) or a mutating call applies it.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: *self.game.board().occupants(),
            current_player: self.game.current_player(),
            status: self.game.status(),
            winning_pattern: self.game.winning_pattern(),
            pending: self.protocol.pending().copied(),
        }
    }

    /// Registers a callback for turn changes.
    pub fn on_turn_changed(&mut self, callback: impl FnMut(Player) + 'static) {
        self.game.observers_mut().on_turn_changed(callback);
    }

    /// Registers a callback for the end of the game.
    pub fn on_game_ended(&mut self, callback: impl FnMut(Outcome) + 'static) {
        self.game.observers_mut().on_game_ended(callback);
    }

    /// Registers a callback for gated claims starting to wait.
    pub fn on_gated_pending(&mut self, callback: impl FnMut(ClaimRequest) + 'static) {
        self.game.observers_mut().on_gated_pending(callback);
    }

    /// Registers a callback for gated claims landing.
    pub fn on_gated_committed(&mut self, callback: impl FnMut(ClaimRequest) + 'static) {
        self.game.observers_mut().on_gated_committed(callback);
    }

    /// Registers a callback for gated claims being abandoned.
    pub fn on_gated_cancelled(&mut self, callback: impl FnMut(ClaimRequest) + 'static) {
        self.game.observers_mut().on_gated_cancelled(callback);
    }

    /// Registers a callback for every event.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) {
        self.game.observers_mut().subscribe(callback);
    }

    /// Feeds a pointer press to the gesture classifier.
    pub fn pointer_down(&mut self, position: ScreenPosition, at: Duration) {
        self.gestures.pointer_down(position, at);
    }

    /// Feeds pointer movement to the gesture classifier.
    pub fn pointer_move(&mut self, position: ScreenPosition, at: Duration) {
        self.gestures.pointer_move(position, at);
    }

    /// Feeds a pointer release and, for a click, claims the cell under it.
    ///
    /// The gated cell is activated for the player to move; any other cell is
    /// claimed directly.
    #[instrument(skip(self, picker))]
    pub fn pointer_up(
        &mut self,
        position: ScreenPosition,
        at: Duration,
        picker: &impl CellPicker,
    ) -> Result<ClickOutcome, ClaimError> {
        let Some(click) = self.gestures.pointer_up(position, at) else {
            return Ok(ClickOutcome::ViewGesture);
        };
        let Some(index) = picker.resolve_cell(click.position) else {
            debug!("Click hit no cell");
            return Ok(ClickOutcome::Missed);
        };

        if index == self.protocol.gated_cell().index() {
            let player = self.game.current_player();
            let request = self.open_gated_claim(player)?;
            Ok(ClickOutcome::GatedPending(request))
        } else {
            Ok(ClickOutcome::Claimed(self.claim_cell(index)?))
        }
    }
}

impl<C: Clock> std::fmt::Debug for CubeEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubeEngine")
            .field("config", &self.config)
            .field("game", &self.game)
            .field("protocol", &self.protocol)
            .field("gestures", &self.gestures)
            .finish_non_exhaustive()
    }
}
