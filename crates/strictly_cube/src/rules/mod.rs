//! Game rules for 3x3x3 tic-tac-toe.
//!
//! This module contains pure functions for evaluating a board against the
//! pattern catalog. Rules are separated from board storage so the lifecycle
//! and the invariant checks can share them.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{check_winner, winning_pattern_through};
