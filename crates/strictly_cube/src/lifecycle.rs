//! Game lifecycle: committed claim, then evaluation, turn switch, notification.
//!
//! `InProgress` moves to `Won` or `Draw` exactly once. Both are terminal and
//! every later claim fails with [`IllegalMove::GameOver`].

use crate::board::Board;
use crate::error::IllegalMove;
use crate::events::{GameEvent, Observers};
use crate::patterns::{Pattern, PatternCatalog};
use crate::rules;
use crate::turn::TurnManager;
use crate::types::{Cell, Claim, GameStatus, Outcome, Player};
use tracing::{debug, info, instrument};

/// What a committed claim did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Play continues with `next` to move.
    Continued {
        /// The player now to move.
        next: Player,
    },
    /// The claiming player completed `pattern`.
    Won {
        /// The winner.
        player: Player,
        /// The completed line.
        pattern: Pattern,
    },
    /// The board filled up without a completed line.
    Drawn,
}

impl Transition {
    /// Returns true if the game is over.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Transition::Continued { .. })
    }
}

/// Owns the board, the turn order and the observers for one session.
#[derive(Debug)]
pub struct GameLifecycle {
    board: Board,
    turns: TurnManager,
    catalog: &'static PatternCatalog,
    history: Vec<Claim>,
    winning_pattern: Option<Pattern>,
    observers: Observers,
}

impl GameLifecycle {
    /// Starts a session where `first` moves first.
    pub fn new(first: Player) -> Self {
        Self {
            board: Board::new(),
            turns: TurnManager::new(first),
            catalog: PatternCatalog::global(),
            history: Vec::new(),
            winning_pattern: None,
            observers: Observers::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the status.
    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.turns.current()
    }

    /// Returns the committed claims in order.
    pub fn history(&self) -> &[Claim] {
        &self.history
    }

    /// Returns the completed line once the game is won.
    pub fn winning_pattern(&self) -> Option<Pattern> {
        self.winning_pattern
    }

    /// Returns the catalog used for evaluation.
    pub fn catalog(&self) -> &'static PatternCatalog {
        self.catalog
    }

    /// Returns the observer registry.
    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    /// Checks that `cell` could be claimed right now.
    pub fn check_eligible(&self, cell: Cell) -> Result<(), IllegalMove> {
        if self.status().is_terminal() {
            debug!(%cell, "Claim after game over");
            return Err(IllegalMove::GameOver);
        }
        if !self.board.is_empty(cell) {
            debug!(%cell, "Claim on occupied cell");
            return Err(IllegalMove::Occupied(cell));
        }
        Ok(())
    }

    /// Writes a claim to the board and the history, without evaluating it.
    #[instrument(skip(self))]
    pub(crate) fn place(&mut self, cell: Cell, player: Player) -> Result<(), IllegalMove> {
        self.board.claim(cell.index(), player)?;
        self.history.push(Claim::new(player, cell));
        Ok(())
    }

    /// Evaluates the claim just placed at `cell` and notifies observers.
    ///
    /// Only lines through `cell` are checked.
    #[instrument(skip(self))]
    pub(crate) fn conclude(&mut self, cell: Cell, player: Player) -> Transition {
        let transition = match verdict(&self.board, self.catalog, cell, player) {
            Verdict::Won(pattern) => {
                self.board.set_status(GameStatus::Won(player));
                self.winning_pattern = Some(pattern);
                info!(%player, %pattern, "Game won");
                self.emit(GameEvent::GameEnded {
                    outcome: Outcome::Winner(player),
                    pattern: Some(pattern),
                });
                Transition::Won { player, pattern }
            }
            Verdict::Draw => {
                self.board.set_status(GameStatus::Draw);
                info!("Game drawn");
                self.emit(GameEvent::GameEnded {
                    outcome: Outcome::Draw,
                    pattern: None,
                });
                Transition::Drawn
            }
            Verdict::Continue => {
                let next = self.turns.switch();
                self.emit(GameEvent::TurnChanged { player: next });
                Transition::Continued { next }
            }
        };

        #[cfg(debug_assertions)]
        self.assert_invariants();
        transition
    }

    /// Delivers an event to the observers.
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.observers.emit(event);
    }

    /// Clears the board, history and status and hands the turn back to the
    /// opening player. Observers stay registered.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board.reset();
        self.turns.reset();
        self.history.clear();
        self.winning_pattern = None;
        info!(first = %self.turns.first(), "Game reset");
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        use crate::invariants::{InvariantSet, LifecycleInvariants};

        if let Err(violations) = LifecycleInvariants::check_all(self) {
            for violation in &violations {
                tracing::warn!(description = %violation.description, "Invariant violated");
            }
            debug_assert!(violations.is_empty(), "Lifecycle invariants violated");
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn history_mut(&mut self) -> &mut Vec<Claim> {
        &mut self.history
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Won(Pattern),
    Draw,
    Continue,
}

/// Decides what the claim by `player` at `cell` means for the game.
fn verdict(board: &Board, catalog: &PatternCatalog, cell: Cell, player: Player) -> Verdict {
    if let Some(pattern) = rules::winning_pattern_through(board, catalog, cell, player) {
        Verdict::Won(pattern)
    } else if board.is_full() {
        Verdict::Draw
    } else {
        Verdict::Continue
    }
}
