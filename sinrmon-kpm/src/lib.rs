//! KPM SINR aggregation core
//!
//! Turns the stream of decoded KPM indications (per-UE serving and neighbor
//! SINR measurements) into one fixed-shape record per UE per serving report:
//! a synchronized round id, the serving cell position, and sliding-window
//! averages of the serving SINR and of the strongest neighbor cells.
//!
//! # Architecture
//!
//! ```text
//! Indication ──► parser ──► EntityRegistry ──► SequenceSynchronizer
//!                                 │                     │
//!                                 ▼                     ▼
//!                            UeBuffer ◄──── append_serving / append_neighbor
//!                                 │
//!                                 ▼
//!                  NeighborRanker + serving average
//!                                 │
//!                                 ▼
//!                   Emitter (gates) ──► RecordSink(s)
//! ```
//!
//! All state lives in one [`Aggregator`]. It is either owned by a single task
//! or shared behind the coarse lock of [`SharedAggregator`]; in both cases one
//! indication is processed to completion before the next one starts.

use serde::{Deserialize, Serialize};

pub mod aggregator;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod ranker;
pub mod record;
pub mod registry;
pub mod sequence;
pub mod stats;
pub mod topology;
pub mod window;

pub use aggregator::{Aggregator, IndicationSummary, SharedAggregator};
pub use emitter::{EmitOutcome, Emitter, PublishReport, RecordSink};
pub use error::{RecordParseError, SinkError};
pub use parser::{parse_measurement_name, MeasurementKey, MeasurementKind};
pub use ranker::{NeighborRanker, RankedNeighbor};
pub use record::{csv_header, OutputRecord};
pub use registry::EntityRegistry;
pub use sequence::SequenceSynchronizer;
pub use stats::AggregatorStats;
pub use topology::CellTopology;
pub use window::{MeasurementSlot, NeighborAppend, NeighborSample, UeBuffer};

/// A single measurement record value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasValue {
    /// Real-valued record
    Real(f64),
    /// Integer-valued record
    Integer(i64),
    /// Record present but carrying no value
    NoValue,
}

impl MeasValue {
    /// Returns the value as a float for real and integer records
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasValue::Real(v) => Some(*v),
            MeasValue::Integer(v) => Some(*v as f64),
            MeasValue::NoValue => None,
        }
    }
}

/// A named measurement with its record list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Measurement name, encoding the cell and UE ids
    pub name: String,
    /// Record values
    #[serde(default)]
    pub values: Vec<MeasValue>,
}

impl MeasurementRecord {
    /// Creates a record from a name and its values
    pub fn new(name: impl Into<String>, values: Vec<MeasValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Measurements reported for one UE within an indication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UeReport {
    /// Measurement records for this UE
    #[serde(default)]
    pub records: Vec<MeasurementRecord>,
}

/// One decoded KPM indication covering a batch of UEs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indication {
    /// Collection start time reported by the E2 node (simulation ms); logged only
    #[serde(default)]
    pub collect_start_time: u64,
    /// Per-UE measurement reports
    #[serde(default)]
    pub ue_reports: Vec<UeReport>,
}

impl Indication {
    /// Iterates every record of every UE report in delivery order
    pub fn records(&self) -> impl Iterator<Item = &MeasurementRecord> {
        self.ue_reports.iter().flat_map(|report| report.records.iter())
    }
}
