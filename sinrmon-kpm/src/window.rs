//! Per-UE sliding-window ring buffer
//!
//! Each slot holds one round's serving SINR plus the neighbor samples that
//! arrived for that round. A serving append opens a new slot; neighbor
//! samples attach to the most recently written slot. Memory per UE is fixed
//! at `capacity` slots of at most `neighbor_capacity` samples each.

use sinrmon_common::{CellId, RoundId, UeId};

/// One neighbor cell SINR sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSample {
    /// Neighbor cell id
    pub cell_id: CellId,
    /// Measured SINR (dB)
    pub sinr: f64,
}

/// Serving and neighbor data observed for one UE in one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSlot {
    /// Serving SINR; `None` in a slot that was never written
    pub serving_sinr: Option<f64>,
    /// Serving cell when the slot was written
    pub serving_cell_id: CellId,
    /// Neighbor samples in arrival order
    pub neighbors: Vec<NeighborSample>,
    /// Round the serving sample was assigned to
    pub round_id: RoundId,
}

impl MeasurementSlot {
    /// Serving SINR if present and finite
    pub fn valid_serving_sinr(&self) -> Option<f64> {
        self.serving_sinr.filter(|v| v.is_finite())
    }
}

/// Result of attaching a neighbor sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborAppend {
    /// Sample stored in the latest slot
    Accepted,
    /// Dropped: the cell is the UE's current serving cell
    ServingCell,
    /// Dropped: the latest slot already holds `neighbor_capacity` samples
    SlotFull,
    /// Dropped: no serving sample has been written yet
    NoSlot,
}

/// Circular measurement history of one UE
#[derive(Debug, Clone)]
pub struct UeBuffer {
    ue_id: UeId,
    serving_cell_id: Option<CellId>,
    ring: Vec<MeasurementSlot>,
    write_index: usize,
    filled: usize,
    total_appends: u64,
    neighbor_capacity: usize,
}

impl UeBuffer {
    /// Creates an empty buffer. Zero capacities are raised to one.
    pub fn new(ue_id: UeId, capacity: usize, neighbor_capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ue_id,
            serving_cell_id: None,
            ring: vec![MeasurementSlot::default(); capacity],
            write_index: 0,
            filled: 0,
            total_appends: 0,
            neighbor_capacity: neighbor_capacity.max(1),
        }
    }

    /// UE this buffer belongs to
    pub fn ue_id(&self) -> UeId {
        self.ue_id
    }

    /// Latest serving cell, `None` before the first serving sample
    pub fn serving_cell_id(&self) -> Option<CellId> {
        self.serving_cell_id
    }

    /// Ring capacity
    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    /// Next slot to be written
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Slots holding data, saturating at capacity
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Serving samples appended over the buffer's lifetime
    pub fn total_appends(&self) -> u64 {
        self.total_appends
    }

    /// Returns true once the ring has wrapped at least once
    pub fn has_wrapped(&self) -> bool {
        self.total_appends >= self.ring.len() as u64
    }

    /// Opens a new slot for a serving sample, overwriting the oldest once full.
    pub fn append_serving(&mut self, cell_id: CellId, sinr: f64, round_id: RoundId) {
        let slot = &mut self.ring[self.write_index];
        slot.serving_sinr = Some(sinr);
        slot.serving_cell_id = cell_id;
        slot.neighbors.clear();
        slot.round_id = round_id;

        self.serving_cell_id = Some(cell_id);
        self.write_index = (self.write_index + 1) % self.ring.len();
        if self.filled < self.ring.len() {
            self.filled += 1;
        }
        self.total_appends += 1;
    }

    /// Attaches a neighbor sample to the most recently written slot.
    pub fn append_neighbor(&mut self, cell_id: CellId, sinr: f64) -> NeighborAppend {
        let Some(serving) = self.serving_cell_id else {
            return NeighborAppend::NoSlot;
        };
        if cell_id == serving {
            return NeighborAppend::ServingCell;
        }

        let capacity = self.ring.len();
        let latest = (self.write_index + capacity - 1) % capacity;
        let slot = &mut self.ring[latest];
        if slot.neighbors.len() >= self.neighbor_capacity {
            return NeighborAppend::SlotFull;
        }
        slot.neighbors.push(NeighborSample { cell_id, sinr });
        NeighborAppend::Accepted
    }

    /// Filled slots, oldest first
    pub fn slots(&self) -> impl Iterator<Item = &MeasurementSlot> + '_ {
        let capacity = self.ring.len();
        let start = (self.write_index + capacity - self.filled) % capacity;
        (0..self.filled).map(move |i| &self.ring[(start + i) % capacity])
    }

    /// Most recently written slot
    pub fn latest_slot(&self) -> Option<&MeasurementSlot> {
        if self.filled == 0 {
            return None;
        }
        let capacity = self.ring.len();
        Some(&self.ring[(self.write_index + capacity - 1) % capacity])
    }

    /// Mean serving SINR over the window, skipping non-finite samples.
    ///
    /// `None` if the window holds no valid sample.
    pub fn serving_average(&self) -> Option<f64> {
        let (sum, count) = self
            .slots()
            .filter_map(MeasurementSlot::valid_serving_sinr)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}
