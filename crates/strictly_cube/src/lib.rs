//! Strictly Cube - 3x3x3 tic-tac-toe engine
//!
//! Two players take turns claiming cells of a 3x3x3 cube; the first to own
//! all three cells of any of the 49 straight lines wins.
//!
//! # Architecture
//!
//! - **Patterns**: the static catalog of winning lines, indexed by cell
//! - **Board**: 27 occupants plus the game status
//! - **Lifecycle**: claim, evaluate, switch turn, notify observers
//! - **Claims**: synchronous claims and the two-phase gated centre cell
//! - **Gestures**: telling a click on a cell from a drag of the view
//!
//! The engine does no rendering. The view layer resolves clicks to cell
//! indices through a [`CellPicker`] and draws from [`BoardSnapshot`]s.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use strictly_cube::{CubeEngine, EngineConfig, GameStatus, ManualClock, Player};
//!
//! let clock = ManualClock::new();
//! let mut engine = CubeEngine::with_clock(EngineConfig::default(), clock.clone());
//!
//! engine.claim_cell(0).unwrap(); // X
//! engine.claim_cell(9).unwrap(); // O
//! engine.activate_gated_cell(Player::X).unwrap();
//! clock.advance(Duration::from_millis(1000));
//! engine.poll(); // X takes the centre, O to move
//! engine.claim_cell(10).unwrap(); // O
//! engine.claim_cell(26).unwrap(); // X completes 0-13-26
//!
//! assert_eq!(engine.status(), GameStatus::Won(Player::X));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod claim;
mod clock;
mod config;
mod engine;
mod error;
mod events;
mod gesture;
mod invariants;
mod lifecycle;
mod patterns;
mod rules;
mod schedule;
mod turn;
mod types;

// Crate-level exports - Domain types
pub use types::{CELL_COUNT, Cell, Claim, EDGE, GameStatus, Occupant, OutOfRange, Outcome, Player};

// Crate-level exports - Patterns and rules
pub use patterns::{PATTERN_COUNT, Pattern, PatternCatalog, PatternKind};
pub use rules::{check_winner, is_draw, is_full, winning_pattern_through};

// Crate-level exports - Board and turns
pub use board::Board;
pub use turn::TurnManager;

// Crate-level exports - Claims and lifecycle
pub use claim::{ClaimPhase, ClaimProtocol, ClaimRequest, DEFAULT_COMMIT_DELAY};
pub use error::{ClaimError, IllegalMove};
pub use lifecycle::{GameLifecycle, Transition};

// Crate-level exports - Invariants
pub use invariants::{
    HistoryConsistentInvariant, Invariant, InvariantSet, InvariantViolation, LifecycleInvariants,
    MonotonicBoardInvariant, TerminalStatusInvariant,
};

// Crate-level exports - Events
pub use events::{GameEvent, Observers};

// Crate-level exports - Time and scheduling
pub use clock::{Clock, ManualClock, SystemClock};
pub use schedule::{Scheduler, TaskHandle};

// Crate-level exports - Input
pub use gesture::{
    Click, DEFAULT_CLICK_MAX, DEFAULT_DRAG_THRESHOLD, PointerGesture, PointerGestureClassifier,
    ScreenPosition,
};

// Crate-level exports - Engine
pub use config::{ConfigError, EngineConfig};
pub use engine::{BoardSnapshot, CellPicker, ClickOutcome, CubeEngine};
