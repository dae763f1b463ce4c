//! Indication-level aggregation pipeline
//!
//! [`Aggregator`] owns every piece of mutable state: the UE registry, the
//! round synchronizer, the emitter with its sinks, and the counters. It is
//! not internally synchronized; [`SharedAggregator`] wraps it in one coarse
//! lock held for a whole indication.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sinrmon_common::{AggregationConfig, CellId, UeId};
use tracing::{debug, trace};

use crate::emitter::{EmitOutcome, Emitter, RecordSink};
use crate::parser::{parse_measurement_name, MeasurementKind};
use crate::ranker::NeighborRanker;
use crate::record::OutputRecord;
use crate::registry::EntityRegistry;
use crate::sequence::SequenceSynchronizer;
use crate::stats::AggregatorStats;
use crate::topology::CellTopology;
use crate::window::NeighborAppend;
use crate::{Indication, MeasValue, MeasurementRecord};

/// What one indication did to the aggregation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicationSummary {
    /// Serving samples appended
    pub serving_accepted: usize,
    /// Neighbor samples stored
    pub neighbor_accepted: usize,
    /// Records skipped (unrecognized name, unusable values, or full registry)
    pub records_skipped: usize,
    /// Records emitted, in emission order
    pub emitted: Vec<OutputRecord>,
}

/// Serving and neighbor SINR aggregation state
#[derive(Debug)]
pub struct Aggregator {
    registry: EntityRegistry,
    sequencer: SequenceSynchronizer,
    topology: CellTopology,
    emitter: Emitter,
    stats: AggregatorStats,
}

impl Aggregator {
    /// Creates an aggregator without sinks
    pub fn new(config: &AggregationConfig, topology: CellTopology) -> Self {
        let ranker = NeighborRanker::new(config.min_neighbor_support, config.published_neighbors);
        Self {
            registry: EntityRegistry::new(
                config.max_ues,
                config.window_capacity,
                config.neighbor_slot_capacity,
            ),
            sequencer: SequenceSynchronizer::new(config.effective_round_population()),
            topology,
            emitter: Emitter::new(config.min_samples, config.min_qualifying_neighbors, ranker),
            stats: AggregatorStats::default(),
        }
    }

    /// Attaches an output sink
    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.emitter.add_sink(sink);
    }

    /// Processes one indication to completion.
    ///
    /// Serving records are applied before neighbor records so that the
    /// neighbors of an indication attach to the slot its serving sample
    /// opened. Malformed records are skipped; nothing here fails.
    pub fn process_indication(&mut self, indication: &Indication) -> IndicationSummary {
        self.stats.indications += 1;
        let mut summary = IndicationSummary::default();

        trace!(
            "Indication at {} with {} UE reports",
            indication.collect_start_time,
            indication.ue_reports.len()
        );

        for record in indication.records() {
            match parse_measurement_name(&record.name) {
                Some(key) if key.kind == MeasurementKind::Serving => {
                    self.apply_serving(key.ue_id, key.cell_id, record, &mut summary);
                }
                Some(_) => {}
                None => {
                    trace!("Skipping measurement {}", record.name);
                    self.stats.records_skipped += 1;
                    summary.records_skipped += 1;
                }
            }
        }

        for record in indication.records() {
            if let Some(key) = parse_measurement_name(&record.name) {
                if key.kind == MeasurementKind::Neighbor {
                    self.apply_neighbors(key.ue_id, record, &mut summary);
                }
            }
        }

        summary
    }

    fn apply_serving(
        &mut self,
        ue_id: UeId,
        cell_id: CellId,
        record: &MeasurementRecord,
        summary: &mut IndicationSummary,
    ) {
        let Some(sinr) = record.values.first().and_then(MeasValue::as_f64) else {
            trace!("Serving record {} carries no usable value", record.name);
            self.stats.records_skipped += 1;
            summary.records_skipped += 1;
            return;
        };

        match self.ingest_serving(ue_id, cell_id, sinr) {
            None => summary.records_skipped += 1,
            Some(outcome) => {
                summary.serving_accepted += 1;
                if let EmitOutcome::Emitted(record) = outcome {
                    summary.emitted.push(record);
                }
            }
        }
    }

    fn apply_neighbors(
        &mut self,
        ue_id: UeId,
        record: &MeasurementRecord,
        summary: &mut IndicationSummary,
    ) {
        if self.registry.resolve(ue_id).is_none() {
            self.stats.capacity_drops += 1;
            summary.records_skipped += 1;
            return;
        }

        for pair in record.values.chunks_exact(2) {
            let (MeasValue::Real(sinr), MeasValue::Integer(cell)) = (pair[0], pair[1]) else {
                trace!("Skipping malformed neighbor pair in {}", record.name);
                continue;
            };
            let Ok(cell_id) = CellId::try_from(cell) else {
                trace!("Neighbor cell id {} out of range in {}", cell, record.name);
                continue;
            };
            if self.ingest_neighbor(ue_id, cell_id, sinr) == Some(NeighborAppend::Accepted) {
                summary.neighbor_accepted += 1;
            }
        }
    }

    /// Appends a serving sample and evaluates emission for the UE.
    ///
    /// Returns `None` when the registry has no room for the UE. Emitted
    /// records have already been delivered to the sinks.
    pub fn ingest_serving(
        &mut self,
        ue_id: UeId,
        cell_id: CellId,
        sinr: f64,
    ) -> Option<EmitOutcome> {
        let Some(buffer) = self.registry.resolve(ue_id) else {
            self.stats.capacity_drops += 1;
            return None;
        };

        let round_id = self.sequencer.assign(ue_id);
        buffer.append_serving(cell_id, sinr, round_id);
        self.stats.serving_samples += 1;

        let outcome = self.emitter.evaluate(buffer, round_id, &self.topology);
        match &outcome {
            EmitOutcome::Emitted(record) => {
                let report = self.emitter.publish(record);
                self.stats.emitted += 1;
                self.stats.sink_failures += report.failed as u64;
                debug!(
                    "UE {} emitted for {} (serving {:.3} dB)",
                    ue_id, round_id, record.serving_sinr_ma
                );
            }
            EmitOutcome::InsufficientSamples { .. } => self.stats.gated_samples += 1,
            EmitOutcome::InsufficientNeighbors { .. } => self.stats.gated_neighbors += 1,
            EmitOutcome::NoValidServing => self.stats.gated_serving += 1,
        }

        Some(outcome)
    }

    /// Attaches a neighbor sample to the UE's latest slot.
    ///
    /// Returns `None` when the registry has no room for the UE.
    pub fn ingest_neighbor(
        &mut self,
        ue_id: UeId,
        cell_id: CellId,
        sinr: f64,
    ) -> Option<NeighborAppend> {
        let Some(buffer) = self.registry.resolve(ue_id) else {
            self.stats.capacity_drops += 1;
            return None;
        };

        let result = buffer.append_neighbor(cell_id, sinr);
        if result == NeighborAppend::Accepted {
            self.stats.neighbor_samples += 1;
        } else {
            self.stats.neighbor_dropped += 1;
        }
        Some(result)
    }

    /// Counters since creation
    pub fn stats(&self) -> AggregatorStats {
        self.stats
    }

    /// UE registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Round synchronizer
    pub fn sequencer(&self) -> &SequenceSynchronizer {
        &self.sequencer
    }

    /// Cell topology
    pub fn topology(&self) -> &CellTopology {
        &self.topology
    }

    /// Emitter and its sinks
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}

/// [`Aggregator`] behind a single lock, safe to call from any thread
#[derive(Debug, Clone)]
pub struct SharedAggregator {
    inner: Arc<Mutex<Aggregator>>,
}

impl SharedAggregator {
    /// Wraps an aggregator
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(aggregator)),
        }
    }

    /// Processes an indication while holding the lock for its whole duration
    pub fn on_indication(&self, indication: &Indication) -> IndicationSummary {
        self.lock().process_indication(indication)
    }

    /// Counters snapshot
    pub fn stats(&self) -> AggregatorStats {
        self.lock().stats()
    }

    /// Runs `f` with exclusive access to the aggregator
    pub fn with<R>(&self, f: impl FnOnce(&mut Aggregator) -> R) -> R {
        f(&mut self.lock())
    }

    // A panic inside a sink leaves the state consistent between indications.
    fn lock(&self) -> MutexGuard<'_, Aggregator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
