//! Ships and the roster indices grid cells use to refer to them.

use alloc::vec::Vec;
use core::fmt;

use crate::coordinate::Coordinate;

/// Index of a ship within its owner's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipId(pub usize);

/// A ship of fixed length with a hit counter.
///
/// `positions` is empty until the ship is placed, then holds exactly `length`
/// coordinates ordered by increasing index along the ship's axis.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    length: usize,
    hits: usize,
    sunk: bool,
    positions: Vec<Coordinate>,
}

impl Ship {
    /// Create an unplaced, undamaged ship.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            hits: 0,
            sunk: false,
            positions: Vec::new(),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn is_sunk(&self) -> bool {
        self.sunk
    }

    pub fn is_placed(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Coordinate] {
        &self.positions
    }

    /// Whether the ship occupies `coord`.
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.positions.contains(&coord)
    }

    pub(crate) fn set_positions(&mut self, path: Vec<Coordinate>) {
        self.positions = path;
    }

    /// Register one hit. Returns `true` if this hit sank the ship.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.sunk {
            return false;
        }
        self.hits += 1;
        if self.hits >= self.length {
            self.sunk = true;
            return true;
        }
        false
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ length: {}, hits: {}, sunk: {}, positions: [",
            self.length, self.hits, self.sunk
        )?;
        for (i, pos) in self.positions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pos)?;
        }
        write!(f, "] }}")
    }
}
