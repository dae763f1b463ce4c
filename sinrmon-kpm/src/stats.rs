//! Aggregation counters

use std::fmt;

/// Running counters of the aggregation pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    /// Indications processed
    pub indications: u64,
    /// Serving samples appended
    pub serving_samples: u64,
    /// Neighbor samples stored
    pub neighbor_samples: u64,
    /// Neighbor samples dropped (serving cell, full slot, no slot)
    pub neighbor_dropped: u64,
    /// Records skipped (unknown name or unusable values)
    pub records_skipped: u64,
    /// Samples dropped because the UE registry was full
    pub capacity_drops: u64,
    /// Records emitted
    pub emitted: u64,
    /// Emissions withheld for too few samples
    pub gated_samples: u64,
    /// Emissions withheld for too few qualifying neighbors
    pub gated_neighbors: u64,
    /// Emissions withheld because no valid serving SINR was in the window
    pub gated_serving: u64,
    /// Failed sink writes
    pub sink_failures: u64,
}

impl fmt::Display for AggregatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "indications={} serving={} neighbors={} (dropped {}) skipped={} capacity_drops={} \
             emitted={} gated[samples={} neighbors={} serving={}] sink_failures={}",
            self.indications,
            self.serving_samples,
            self.neighbor_samples,
            self.neighbor_dropped,
            self.records_skipped,
            self.capacity_drops,
            self.emitted,
            self.gated_samples,
            self.gated_neighbors,
            self.gated_serving,
            self.sink_failures
        )
    }
}
