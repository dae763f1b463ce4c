//! Identifier and topology types shared across crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// UE identifier as carried in KPM measurement names.
pub type UeId = u16;

/// Cell identifier as carried in KPM measurement names and neighbor records.
pub type CellId = u16;

/// A cell with its fixed planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell identifier
    pub cell_id: CellId,
    /// X coordinate (metres)
    pub x: f64,
    /// Y coordinate (metres)
    pub y: f64,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(cell_id: CellId, x: f64, y: f64) -> Self {
        Self { cell_id, x, y }
    }

    /// Returns the cell coordinates as an `(x, y)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell[{}]@({:.3}, {:.3})", self.cell_id, self.x, self.y)
    }
}
