//! Error types for claims and activations.

use crate::types::{Cell, OutOfRange};

/// A claim that the rules do not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IllegalMove {
    /// The index does not name a cell.
    #[display("Cell index {} is out of range (must be 0-26)", _0)]
    OutOfRange(usize),

    /// The cell already has an occupant.
    #[display("Cell {} is already occupied", _0)]
    Occupied(Cell),

    /// The game has already been won or drawn.
    #[display("Game is already over")]
    GameOver,

    /// The gated cell must be claimed through activation.
    #[display("Cell {} is gated and must be activated", _0)]
    GatedCell(Cell),
}

impl std::error::Error for IllegalMove {}

impl From<OutOfRange> for IllegalMove {
    fn from(err: OutOfRange) -> Self {
        IllegalMove::OutOfRange(err.index)
    }
}

/// Error returned when activating the gated cell or routing a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ClaimError {
    /// The claim itself is illegal.
    #[display("{}", _0)]
    IllegalMove(IllegalMove),

    /// A claim on the gated cell is already pending.
    #[display("Gated cell {} already has a pending claim", _0)]
    GatedCellBusy(Cell),
}

impl std::error::Error for ClaimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClaimError::IllegalMove(err) => Some(err),
            ClaimError::GatedCellBusy(_) => None,
        }
    }
}

impl From<IllegalMove> for ClaimError {
    fn from(err: IllegalMove) -> Self {
        ClaimError::IllegalMove(err)
    }
}
