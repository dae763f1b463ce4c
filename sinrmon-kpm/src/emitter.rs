//! Emission gating and sink delivery

use sinrmon_common::{LogThrottle, RoundId};
use tracing::{debug, warn};

use crate::error::SinkError;
use crate::ranker::NeighborRanker;
use crate::record::OutputRecord;
use crate::topology::CellTopology;
use crate::window::UeBuffer;

/// Destination for emitted CSV lines.
///
/// Writes are best effort: a sink reports failures through [`SinkError`]
/// and may declare itself unavailable, after which it is skipped.
pub trait RecordSink: Send {
    /// Sink name used in logs
    fn name(&self) -> &str;

    /// Returns false once the sink should no longer be written to
    fn is_available(&self) -> bool {
        true
    }

    /// Writes one complete line (including its newline)
    fn write_line(&mut self, line: &str) -> Result<(), SinkError>;
}

/// Decision taken after a serving append
#[derive(Debug, Clone, PartialEq)]
pub enum EmitOutcome {
    /// Record built and ready for delivery
    Emitted(OutputRecord),
    /// Still buffering
    InsufficientSamples {
        /// Filled slots
        have: usize,
        /// Required slots
        need: usize,
    },
    /// Too few neighbors passed the support threshold
    InsufficientNeighbors {
        /// Qualifying neighbors
        have: usize,
        /// Required neighbors
        need: usize,
    },
    /// Every serving sample in the window is invalid
    NoValidServing,
}

/// Delivery result of one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Sinks that accepted the line
    pub delivered: usize,
    /// Sinks whose write failed
    pub failed: usize,
}

/// Applies the emission gates and fans records out to the sinks
pub struct Emitter {
    min_samples: usize,
    min_qualifying: usize,
    ranker: NeighborRanker,
    sinks: Vec<Box<dyn RecordSink>>,
    throttle: LogThrottle,
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("min_samples", &self.min_samples)
            .field("min_qualifying", &self.min_qualifying)
            .field("ranker", &self.ranker)
            .field("sinks", &self.sink_names())
            .finish()
    }
}

impl Emitter {
    /// Creates an emitter with no sinks
    pub fn new(min_samples: usize, min_qualifying: usize, ranker: NeighborRanker) -> Self {
        Self {
            min_samples,
            min_qualifying,
            ranker,
            sinks: Vec::new(),
            throttle: LogThrottle::default(),
        }
    }

    /// Adds a sink; records go to sinks in insertion order
    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    /// Names of the attached sinks
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Number of sinks still accepting writes
    pub fn available_sinks(&self) -> usize {
        self.sinks.iter().filter(|s| s.is_available()).count()
    }

    /// Whether gating for `buffer` is logged at its current sample count
    fn gate_logged(&self, buffer: &UeBuffer) -> bool {
        self.throttle.should_log(buffer.total_appends())
    }

    /// Evaluates the gates for `buffer` and builds the record if they pass.
    pub fn evaluate(
        &self,
        buffer: &UeBuffer,
        round_id: RoundId,
        topology: &CellTopology,
    ) -> EmitOutcome {
        let ue_id = buffer.ue_id();
        let filled = buffer.filled();

        let log_gate = self.gate_logged(buffer);

        if filled < self.min_samples {
            if log_gate {
                debug!(
                    "UE {}: buffering, {}/{} samples collected",
                    ue_id, filled, self.min_samples
                );
            }
            return EmitOutcome::InsufficientSamples {
                have: filled,
                need: self.min_samples,
            };
        }

        let ranked = self.ranker.rank(buffer);
        if ranked.len() < self.min_qualifying {
            if log_gate {
                debug!(
                    "UE {}: insufficient valid neighbors ({}/{}), skipping",
                    ue_id,
                    ranked.len(),
                    self.min_qualifying
                );
            }
            return EmitOutcome::InsufficientNeighbors {
                have: ranked.len(),
                need: self.min_qualifying,
            };
        }

        let Some(serving_sinr_ma) = buffer.serving_average() else {
            debug!("UE {}: no valid serving SINR in window, skipping", ue_id);
            return EmitOutcome::NoValidServing;
        };

        let (serving_x, serving_y) = buffer
            .serving_cell_id()
            .map(|cell| topology.position_or_origin(cell))
            .unwrap_or((0.0, 0.0));

        let mut neighbor_sinr_ma: Vec<f64> = ranked.iter().map(|n| n.average).collect();
        neighbor_sinr_ma.resize(self.ranker.published(), 0.0);

        EmitOutcome::Emitted(OutputRecord {
            round_id,
            ue_id,
            serving_x,
            serving_y,
            serving_sinr_ma,
            neighbor_sinr_ma,
        })
    }

    /// Writes `record` to every available sink. Failures are logged, never returned.
    pub fn publish(&mut self, record: &OutputRecord) -> PublishReport {
        let line = record.to_csv_line();
        let mut report = PublishReport::default();

        for sink in self.sinks.iter_mut() {
            if !sink.is_available() {
                continue;
            }
            match sink.write_line(&line) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!("Sink {} write failed for UE {}: {}", sink.name(), record.ue_id, e);
                    if !sink.is_available() {
                        warn!("Sink {} marked unavailable", sink.name());
                    }
                }
            }
        }

        report
    }
}
