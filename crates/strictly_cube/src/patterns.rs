//! Catalog of winning lines through the cube.
//!
//! A line is three cells `p, p+d, p+2d` for one of the 13 canonical
//! directions `d` (first non-zero component positive). The number of
//! non-zero components in `d` decides the kind of line: one for axis lines,
//! two for face diagonals, three for space diagonals.

use crate::types::{CELL_COUNT, Cell, EDGE};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Number of winning lines on a 3x3x3 board.
pub const PATTERN_COUNT: usize = 49;

/// Kind of winning line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum PatternKind {
    /// Parallel to one axis (27 of these).
    Axis,
    /// Diagonal of an axis-aligned plane (18 of these).
    FaceDiagonal,
    /// Corner to corner through the centre (4 of these).
    SpaceDiagonal,
}

/// One winning line: three distinct cells in ascending index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    cells: [Cell; 3],
    kind: PatternKind,
}

impl Pattern {
    /// Returns the three cells of the line.
    pub fn cells(&self) -> [Cell; 3] {
        self.cells
    }

    /// Returns the raw indices of the line.
    pub fn indices(&self) -> [usize; 3] {
        self.cells.map(Cell::index)
    }

    /// Returns the kind of line.
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Returns true if the line passes through `cell`.
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.cells;
        write!(f, "[{}, {}, {}]", a, b, c)
    }
}

/// Immutable table of all 49 winning lines, indexed by cell.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
    by_cell: [Vec<usize>; CELL_COUNT],
}

static CATALOG: LazyLock<PatternCatalog> = LazyLock::new(PatternCatalog::build);

impl PatternCatalog {
    /// Returns the process-wide catalog, building it on first use.
    pub fn global() -> &'static PatternCatalog {
        &CATALOG
    }

    #[instrument]
    fn build() -> Self {
        let mut patterns = Vec::with_capacity(PATTERN_COUNT);

        for d in canonical_directions() {
            let kind = match d.iter().filter(|c| **c != 0).count() {
                1 => PatternKind::Axis,
                2 => PatternKind::FaceDiagonal,
                _ => PatternKind::SpaceDiagonal,
            };
            for x in 0..EDGE as i32 {
                for y in 0..EDGE as i32 {
                    for z in 0..EDGE as i32 {
                        if let Some(cells) = line_from([x, y, z], d) {
                            patterns.push(Pattern { cells, kind });
                        }
                    }
                }
            }
        }

        let mut by_cell: [Vec<usize>; CELL_COUNT] = std::array::from_fn(|_| Vec::new());
        for (id, pattern) in patterns.iter().enumerate() {
            for cell in pattern.cells {
                by_cell[cell.index()].push(id);
            }
        }

        debug_assert_eq!(patterns.len(), PATTERN_COUNT);
        debug!(count = patterns.len(), "Built pattern catalog");
        Self { patterns, by_cell }
    }

    /// Returns every pattern.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Returns the number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the catalog holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the patterns passing through `cell`.
    ///
    /// Never empty: every cell lies on at least four lines.
    pub fn containing(&self, cell: Cell) -> impl Iterator<Item = &Pattern> + '_ {
        self.by_cell[cell.index()].iter().map(|id| &self.patterns[*id])
    }
}

/// The 13 directions whose first non-zero component is `+1`.
fn canonical_directions() -> impl Iterator<Item = [i32; 3]> {
    (-1..=1)
        .flat_map(|dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| [dx, dy, dz])))
        .filter(|d| d.iter().find(|c| **c != 0) == Some(&1))
}

/// Builds the line `start, start+d, start+2d` if it stays on the board.
fn line_from(start: [i32; 3], d: [i32; 3]) -> Option<[Cell; 3]> {
    let mut cells = [Cell::CENTER; 3];
    for (step, slot) in cells.iter_mut().enumerate() {
        let step = step as i32;
        let [x, y, z] = [0, 1, 2].map(|axis| start[axis] + step * d[axis]);
        if [x, y, z].iter().any(|c| !(0..EDGE as i32).contains(c)) {
            return None;
        }
        *slot = Cell::from_coords(x as usize, y as usize, z as usize)?;
    }
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_49_unique_patterns() {
        let catalog = PatternCatalog::global();
        assert_eq!(catalog.len(), PATTERN_COUNT);

        let unique: HashSet<_> = catalog.patterns().iter().map(|p| p.indices()).collect();
        assert_eq!(unique.len(), PATTERN_COUNT);
    }

    #[test]
    fn test_pattern_kinds() {
        let catalog = PatternCatalog::global();
        let count = |kind: PatternKind| catalog.patterns().iter().filter(|p| p.kind() == kind).count();
        assert_eq!(count(PatternKind::Axis), 27);
        assert_eq!(count(PatternKind::FaceDiagonal), 18);
        assert_eq!(count(PatternKind::SpaceDiagonal), 4);
    }

    #[test]
    fn test_patterns_are_distinct_and_ascending() {
        for pattern in PatternCatalog::global().patterns() {
            let [a, b, c] = pattern.indices();
            assert!(a < b && b < c, "{} not ascending", pattern);
        }
    }

    #[test]
    fn test_union_covers_board() {
        let covered: HashSet<_> = PatternCatalog::global()
            .patterns()
            .iter()
            .flat_map(|p| p.indices())
            .collect();
        assert_eq!(covered, (0..CELL_COUNT).collect::<HashSet<_>>());
    }

    #[test]
    fn test_containing_center() {
        let catalog = PatternCatalog::global();
        assert_eq!(catalog.containing(Cell::CENTER).count(), 13);
        assert!(catalog.containing(Cell::CENTER).all(|p| p.contains(Cell::CENTER)));
    }

    #[test]
    fn test_containing_corner() {
        let corner = Cell::new(0).unwrap();
        let lines: Vec<_> = PatternCatalog::global()
            .containing(corner)
            .map(|p| p.indices())
            .collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.contains(&[0, 1, 2]));
        assert!(lines.contains(&[0, 13, 26]));
    }

    #[test]
    fn test_every_cell_on_some_line() {
        let catalog = PatternCatalog::global();
        assert!(Cell::all().all(|cell| catalog.containing(cell).next().is_some()));
    }
}
