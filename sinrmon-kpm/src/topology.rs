//! Static cell topology lookup

use std::collections::HashMap;

use sinrmon_common::config::default_cells;
use sinrmon_common::{Cell, CellId};

/// Fixed mapping from cell id to planar coordinates
#[derive(Debug, Clone, Default)]
pub struct CellTopology {
    cells: HashMap<CellId, Cell>,
}

impl CellTopology {
    /// Builds a topology from a cell list. A repeated id keeps the last entry.
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().map(|cell| (cell.cell_id, cell)).collect(),
        }
    }

    /// Seven-cell hexagonal layout of the ns-O-RAN scenario
    pub fn hexagonal_seven() -> Self {
        Self::new(
            default_cells()
                .into_iter()
                .map(|c| Cell::new(c.cell_id, c.x, c.y)),
        )
    }

    /// Looks up a cell; `None` means the cell is unknown
    pub fn get(&self, cell_id: CellId) -> Option<&Cell> {
        self.cells.get(&cell_id)
    }

    /// Coordinates of a cell, or `(0.0, 0.0)` when unknown
    pub fn position_or_origin(&self, cell_id: CellId) -> (f64, f64) {
        self.get(cell_id).map(Cell::position).unwrap_or((0.0, 0.0))
    }

    /// Number of known cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cells are known
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
