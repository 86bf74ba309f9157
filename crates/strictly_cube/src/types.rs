//! Core domain types for 3x3x3 tic-tac-toe.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells along one edge of the cube.
pub const EDGE: usize = 3;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = EDGE * EDGE * EDGE;

/// Player in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first unless configured otherwise).
    #[default]
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// The occupant of a single cell.
///
/// Transitions are monotonic: `Empty` becomes `Occupied` once and never
/// changes again until the board is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Occupant {
    /// Nobody has claimed the cell.
    #[default]
    Empty,
    /// Cell claimed by a player.
    Occupied(Player),
}

impl Occupant {
    /// Returns the owning player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Occupant::Empty => None,
            Occupant::Occupied(player) => Some(player),
        }
    }

    /// Returns true if nobody owns the cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Occupant::Empty)
    }
}

/// Index was outside `0..27`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("Cell index {} is out of range (must be 0-26)", index)]
pub struct OutOfRange {
    /// The rejected index.
    pub index: usize,
}

impl std::error::Error for OutOfRange {}

/// A validated cell on the cube, canonically `x*9 + y*3 + z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(try_from = "usize", into = "usize")]
#[display("{}", _0)]
pub struct Cell(u8);

impl Cell {
    /// The structural centre of the cube (index 13).
    pub const CENTER: Cell = Cell(13);

    /// Creates a cell from a raw index.
    #[instrument]
    pub fn new(index: usize) -> Result<Self, OutOfRange> {
        if index < CELL_COUNT {
            Ok(Cell(index as u8))
        } else {
            Err(OutOfRange { index })
        }
    }

    /// Creates a cell from cube coordinates, each in `0..3`.
    pub fn from_coords(x: usize, y: usize, z: usize) -> Option<Self> {
        if x < EDGE && y < EDGE && z < EDGE {
            Some(Cell((x * EDGE * EDGE + y * EDGE + z) as u8))
        } else {
            None
        }
    }

    /// Returns the raw index (0-26).
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Returns `(x, y, z)` coordinates.
    pub fn coords(self) -> (usize, usize, usize) {
        let i = self.index();
        (i / (EDGE * EDGE), (i / EDGE) % EDGE, i % EDGE)
    }

    /// Iterates over all 27 cells in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT as u8).map(Cell)
    }
}

impl TryFrom<usize> for Cell {
    type Error = OutOfRange;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Cell::new(index)
    }
}

impl From<Cell> for usize {
    fn from(cell: Cell) -> Self {
        cell.index()
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    #[default]
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once the game has been won or drawn.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the outcome of a finished game.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(Outcome::Winner(player)),
            GameStatus::Draw => Some(Outcome::Draw),
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the game.
    Winner(Player),
    /// Game ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// A committed claim: a player taking a cell.
///
/// Claims are recorded in order so the board can be replayed and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// The player who took the cell.
    pub player: Player,
    /// The cell taken.
    pub cell: Cell,
}

impl Claim {
    /// Creates a new claim.
    pub fn new(player: Player, cell: Cell) -> Self {
        Self { player, cell }
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.cell)
    }
}
