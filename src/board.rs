//! A player's grid: cell occupancy, placement validation and shot tracking.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::common::{AttackError, PlacementError};
use crate::coordinate::Coordinate;
use crate::ship::ShipId;

/// Random placement gives up after this many rejected candidates.
const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

/// One grid location. `ship` indexes the owner's roster; the roster owns the
/// ship itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    ship: Option<ShipId>,
    hit: bool,
}

impl Cell {
    pub fn ship(&self) -> Option<ShipId> {
        self.ship
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

/// Fixed-size rectangular grid stored row-major.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid. Dimensions are checked by `MatchConfig::validate`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: alloc::vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.in_bounds(self.width, self.height)
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        if self.in_bounds(coord) {
            self.cells.get(coord.row * self.width + coord.col)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, coord: Coordinate) -> Option<&mut Cell> {
        if self.in_bounds(coord) {
            self.cells.get_mut(coord.row * self.width + coord.col)
        } else {
            None
        }
    }

    /// All cells with their coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, &Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Coordinate::new(i / width, i % width), cell))
    }

    /// Number of cells referencing `id`.
    pub fn occupied_by(&self, id: ShipId) -> usize {
        self.cells.iter().filter(|c| c.ship == Some(id)).count()
    }

    /// Check a placement of a ship of `length` from `start` to `end` without
    /// touching the grid. Returns the path ordered by increasing index.
    ///
    /// Checks run in order: bounds, orientation, length, overlap.
    pub fn validate_placement(
        &self,
        length: usize,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<Coordinate>, PlacementError> {
        if !self.in_bounds(start) || !self.in_bounds(end) {
            return Err(PlacementError::OutOfBounds);
        }

        let horizontal = start.row == end.row;
        let vertical = start.col == end.col;
        if !horizontal && !vertical {
            return Err(PlacementError::InvalidOrientation);
        }
        if horizontal && vertical && length != 1 {
            return Err(PlacementError::InvalidOrientation);
        }

        let span = if horizontal {
            start.col.abs_diff(end.col) + 1
        } else {
            start.row.abs_diff(end.row) + 1
        };
        if span != length {
            return Err(PlacementError::LengthMismatch {
                expected: length,
                actual: span,
            });
        }

        let path = ship_path(start, end);
        if path
            .iter()
            .any(|&c| self.cell(c).map_or(true, |cell| cell.ship.is_some()))
        {
            return Err(PlacementError::Overlap);
        }
        Ok(path)
    }

    /// Point every cell on `path` at `id`. The path must come from
    /// `validate_placement` on this grid.
    pub(crate) fn occupy(&mut self, id: ShipId, path: &[Coordinate]) {
        for &coord in path {
            if let Some(cell) = self.cell_mut(coord) {
                cell.ship = Some(id);
            }
        }
    }

    /// Fire at `coord`. Marks the cell hit and returns the ship there, if any.
    pub(crate) fn receive_attack(&mut self, coord: Coordinate) -> Result<Option<ShipId>, AttackError> {
        let cell = self.cell_mut(coord).ok_or(AttackError::OutOfBounds)?;
        if cell.hit {
            return Err(AttackError::AlreadyAttacked);
        }
        cell.hit = true;
        Ok(cell.ship)
    }

    /// Pick a random start/end pair for a ship of `length` that would pass
    /// `validate_placement`. Returns `None` when no spot was found.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Option<(Coordinate, Coordinate)> {
        if length == 0 {
            return None;
        }
        for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
            let horizontal: bool = rng.random();
            let (row_span, col_span) = if horizontal {
                (1, length)
            } else {
                (length, 1)
            };
            if row_span > self.height || col_span > self.width {
                continue;
            }
            let r = rng.random_range(0..=self.height - row_span);
            let c = rng.random_range(0..=self.width - col_span);
            let start = Coordinate::new(r, c);
            let end = Coordinate::new(r + row_span - 1, c + col_span - 1);
            if self.validate_placement(length, start, end).is_ok() {
                return Some((start, end));
            }
        }
        None
    }
}

/// Inclusive range between `start` and `end` along the varying axis.
fn ship_path(start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
    if start.row == end.row {
        let (lo, hi) = (start.col.min(end.col), start.col.max(end.col));
        (lo..=hi).map(|col| Coordinate::new(start.row, col)).collect()
    } else {
        let (lo, hi) = (start.row.min(end.row), start.row.max(end.row));
        (lo..=hi).map(|row| Coordinate::new(row, start.col)).collect()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{} {{", self.width, self.height)?;
        for row in 0..self.height {
            write!(f, "  ")?;
            for col in 0..self.width {
                let cell = &self.cells[row * self.width + col];
                let ch = match (cell.ship, cell.hit) {
                    (Some(_), true) => 'X',
                    (None, true) => 'o',
                    (Some(_), false) => 'S',
                    (None, false) => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
