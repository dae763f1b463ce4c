//! Neighbor cell ranking over a UE's window

use std::collections::HashMap;

use sinrmon_common::CellId;

use crate::window::UeBuffer;

/// Window average of one neighbor cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedNeighbor {
    /// Neighbor cell id
    pub cell_id: CellId,
    /// Mean SINR over the window
    pub average: f64,
    /// Samples contributing to the mean
    pub samples: usize,
}

/// Aggregates, filters, and orders neighbor cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborRanker {
    min_support: usize,
    published: usize,
}

impl NeighborRanker {
    /// `min_support`: samples a cell needs to be ranked; `published`: cells returned
    pub fn new(min_support: usize, published: usize) -> Self {
        Self {
            min_support,
            published,
        }
    }

    /// Ranked neighbors the output record may carry
    pub fn published(&self) -> usize {
        self.published
    }

    /// Per-cell averages over the window, strongest first.
    ///
    /// The buffer's current serving cell is excluded even if older slots
    /// recorded it as a neighbor. Non-finite samples are ignored. Equal
    /// averages keep first-observed order.
    pub fn candidates(&self, buffer: &UeBuffer) -> Vec<RankedNeighbor> {
        let serving = buffer.serving_cell_id();
        let mut order: Vec<(CellId, f64, usize)> = Vec::new();
        let mut index: HashMap<CellId, usize> = HashMap::new();

        let samples = buffer.slots().flat_map(|slot| slot.neighbors.iter());
        for sample in samples {
            if Some(sample.cell_id) == serving || !sample.sinr.is_finite() {
                continue;
            }
            let i = *index.entry(sample.cell_id).or_insert_with(|| {
                order.push((sample.cell_id, 0.0, 0));
                order.len() - 1
            });
            order[i].1 += sample.sinr;
            order[i].2 += 1;
        }

        let mut ranked: Vec<RankedNeighbor> = order
            .into_iter()
            .map(|(cell_id, sum, samples)| RankedNeighbor {
                cell_id,
                average: sum / samples as f64,
                samples,
            })
            .collect();
        ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
        ranked
    }

    /// Strongest neighbors with at least `min_support` samples, at most `published`.
    pub fn rank(&self, buffer: &UeBuffer) -> Vec<RankedNeighbor> {
        self.candidates(buffer)
            .into_iter()
            .filter(|n| n.samples >= self.min_support)
            .take(self.published)
            .collect()
    }
}
