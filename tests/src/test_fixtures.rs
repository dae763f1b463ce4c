//! Test fixtures and configuration helpers
//!
//! Builders for KPM indications in the measurement naming scheme the
//! aggregator consumes, and configurations that keep tests off the
//! filesystem and the default socket path.

use sinrmon_common::{CellId, MonitorConfig, SinkConfig, UeId};
use sinrmon_kpm::{Indication, MeasValue, MeasurementRecord, UeReport};

/// Neighbor cells of cell 2 in the default topology, in a fixed order
pub const UE_REPORT_CELLS: [CellId; 6] = [3, 4, 5, 6, 7, 8];

/// Serving SINR record for `ue` on `cell`
pub fn serving_record(ue: UeId, cell: CellId, sinr: f64) -> MeasurementRecord {
    MeasurementRecord::new(
        format!("L3servingSINR3gpp_cell_{cell}_UEID_{ue}"),
        vec![MeasValue::Real(sinr)],
    )
}

/// Neighbor SINR list for `ue` served by `cell`, as `(neighbor, sinr)` pairs
pub fn neighbor_record(ue: UeId, cell: CellId, neighbors: &[(CellId, f64)]) -> MeasurementRecord {
    let values = neighbors
        .iter()
        .flat_map(|(id, sinr)| [MeasValue::Real(*sinr), MeasValue::Integer(i64::from(*id))])
        .collect();
    MeasurementRecord::new(format!("L3neighSINRListOf_UEID_{ue}_of_Cell_{cell}"), values)
}

/// Builds an indication one UE report at a time
#[derive(Debug, Clone, Default)]
pub struct IndicationBuilder {
    collect_start_time: u64,
    reports: Vec<UeReport>,
}

impl IndicationBuilder {
    /// Starts an indication with the given collection time
    pub fn new(collect_start_time: u64) -> Self {
        Self {
            collect_start_time,
            reports: Vec::new(),
        }
    }

    /// Adds a report for `ue` holding a serving record
    pub fn serving(mut self, ue: UeId, cell: CellId, sinr: f64) -> Self {
        self.reports.push(UeReport {
            records: vec![serving_record(ue, cell, sinr)],
        });
        self
    }

    /// Adds a neighbor list to the last report, or a new report if there is none
    pub fn neighbors(mut self, ue: UeId, cell: CellId, neighbors: &[(CellId, f64)]) -> Self {
        let record = neighbor_record(ue, cell, neighbors);
        match self.reports.last_mut() {
            Some(report) => report.records.push(record),
            None => self.reports.push(UeReport {
                records: vec![record],
            }),
        }
        self
    }

    /// Adds an arbitrary record as its own report
    pub fn record(mut self, record: MeasurementRecord) -> Self {
        self.reports.push(UeReport {
            records: vec![record],
        });
        self
    }

    /// Finishes the indication
    pub fn build(self) -> Indication {
        Indication {
            collect_start_time: self.collect_start_time,
            ue_reports: self.reports,
        }
    }
}

/// Default configuration with every sink disabled and the given round population
pub fn test_monitor_config(round_population: usize) -> MonitorConfig {
    let mut config = MonitorConfig {
        sinks: SinkConfig {
            file: None,
            socket: None,
        },
        ..Default::default()
    };
    config.aggregation.round_population = Some(round_population);
    config
}
