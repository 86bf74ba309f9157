//! Board storage: 27 occupants plus the game status.

use crate::error::IllegalMove;
use crate::types::{CELL_COUNT, Cell, EDGE, GameStatus, Occupant, OutOfRange, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// 3x3x3 board.
///
/// The board stores the status so that it can refuse claims after the game
/// ends, but it never decides the status itself. That is the lifecycle's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Occupants in canonical `x*9 + y*3 + z` order.
    cells: [Occupant; CELL_COUNT],
    status: GameStatus,
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Occupant::Empty; CELL_COUNT],
            status: GameStatus::InProgress,
        }
    }

    /// Returns the occupant at a raw index.
    #[instrument(skip(self))]
    pub fn occupant_at(&self, index: usize) -> Result<Occupant, OutOfRange> {
        let cell = Cell::new(index)?;
        Ok(self.get(cell))
    }

    /// Returns the occupant of a cell.
    pub fn get(&self, cell: Cell) -> Occupant {
        self.cells[cell.index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell).is_empty()
    }

    /// Returns all occupants.
    pub fn occupants(&self) -> &[Occupant; CELL_COUNT] {
        &self.cells
    }

    /// Returns the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Marks a cell as taken by `player`.
    ///
    /// Fails if the index is out of range, the cell is occupied, or the game
    /// is over. Does not evaluate the result of the move; returns the status
    /// unchanged.
    #[instrument(skip(self))]
    pub fn claim(&mut self, index: usize, player: Player) -> Result<GameStatus, IllegalMove> {
        let cell = Cell::new(index)?;
        if self.status.is_terminal() {
            return Err(IllegalMove::GameOver);
        }
        if !self.is_empty(cell) {
            return Err(IllegalMove::Occupied(cell));
        }
        self.cells[cell.index()] = Occupant::Occupied(player);
        debug!(%cell, %player, "Cell claimed");
        Ok(self.status)
    }

    /// True iff no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Clears every cell and returns the status to `InProgress`.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.cells = [Occupant::Empty; CELL_COUNT];
        self.status = GameStatus::InProgress;
    }

    /// Sets the status. Only the lifecycle decides when a game ends.
    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Overwrites a cell without any checks.
    #[cfg(test)]
    pub(crate) fn force(&mut self, cell: Cell, occupant: Occupant) {
        self.cells[cell.index()] = occupant;
    }

    /// Formats the board as three layers side by side, `x = 0` on the left.
    ///
    /// Empty cells show their index so they can be typed back in.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for y in 0..EDGE {
            for x in 0..EDGE {
                for z in 0..EDGE {
                    let Some(cell) = Cell::from_coords(x, y, z) else {
                        continue;
                    };
                    let symbol = match self.get(cell) {
                        Occupant::Empty => format!("{:>2}", cell.index()),
                        Occupant::Occupied(player) => format!(" {}", player),
                    };
                    result.push_str(&symbol);
                    if z < EDGE - 1 {
                        result.push('|');
                    }
                }
                if x < EDGE - 1 {
                    result.push_str("   ");
                }
            }
            if y < EDGE - 1 {
                result.push_str("\n--+--+--   --+--+--   --+--+--\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
