//! Configuration structures for the SINR monitor
//!
//! Every field carries a serde default so a partial YAML file (or none at
//! all) yields a working configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Cell;

/// Default ring capacity per UE
pub const DEFAULT_WINDOW_CAPACITY: usize = 50;
/// Default maximum number of distinct UEs tracked
pub const DEFAULT_MAX_UES: usize = 28;
/// Default number of serving samples required before emission is attempted
pub const DEFAULT_MIN_SAMPLES: usize = 5;
/// Default minimum samples for a neighbor cell to be ranked
pub const DEFAULT_MIN_NEIGHBOR_SUPPORT: usize = 5;
/// Default number of ranked neighbors published per record
pub const DEFAULT_PUBLISHED_NEIGHBORS: usize = 3;
/// Default number of qualifying neighbors required to emit
pub const DEFAULT_MIN_QUALIFYING_NEIGHBORS: usize = 3;
/// Default neighbor samples held per slot
pub const DEFAULT_NEIGHBOR_SLOT_CAPACITY: usize = 10;
/// Default path of the downstream Unix socket
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/sinr_localization.sock";
/// Default path of the CSV output file
pub const DEFAULT_OUTPUT_FILE: &str = "sinr_localization.csv";

/// Top-level monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Sliding-window and gating parameters
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Cell topology (defaults to the seven-cell hexagonal layout)
    #[serde(default = "default_cells")]
    pub cells: Vec<CellConfig>,
    /// Output sinks
    #[serde(default)]
    pub sinks: SinkConfig,
    /// Replay input pacing
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationConfig::default(),
            cells: default_cells(),
            sinks: SinkConfig::default(),
            replay: ReplayConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Returns the configured topology as cells.
    pub fn topology_cells(&self) -> Vec<Cell> {
        self.cells.iter().map(|c| Cell::new(c.cell_id, c.x, c.y)).collect()
    }
}

/// Sliding-window aggregation and emission thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Slots in each UE ring buffer
    pub window_capacity: usize,
    /// Maximum distinct UEs; reports from further UEs are dropped
    pub max_ues: usize,
    /// UEs that must report before a round advances (defaults to `max_ues`)
    pub round_population: Option<usize>,
    /// Filled slots required before emission is attempted
    pub min_samples: usize,
    /// Samples a neighbor cell needs inside the window to be ranked
    pub min_neighbor_support: usize,
    /// Ranked neighbors published per record
    pub published_neighbors: usize,
    /// Qualifying neighbors required to emit a record
    pub min_qualifying_neighbors: usize,
    /// Neighbor samples held per slot
    pub neighbor_slot_capacity: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            max_ues: DEFAULT_MAX_UES,
            round_population: None,
            min_samples: DEFAULT_MIN_SAMPLES,
            min_neighbor_support: DEFAULT_MIN_NEIGHBOR_SUPPORT,
            published_neighbors: DEFAULT_PUBLISHED_NEIGHBORS,
            min_qualifying_neighbors: DEFAULT_MIN_QUALIFYING_NEIGHBORS,
            neighbor_slot_capacity: DEFAULT_NEIGHBOR_SLOT_CAPACITY,
        }
    }
}

impl AggregationConfig {
    /// Returns the effective round population.
    pub fn effective_round_population(&self) -> usize {
        self.round_population.unwrap_or(self.max_ues)
    }
}

/// One cell of the static topology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellConfig {
    /// Cell identifier
    pub cell_id: u16,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// Seven-cell hexagonal layout used by the ns-O-RAN scenario.
pub fn default_cells() -> Vec<CellConfig> {
    [
        (2, 800.0, 800.0),
        (3, 1300.0, 800.0),
        (4, 1050.0, 1233.01),
        (5, 550.0, 1233.01),
        (6, 300.0, 800.0),
        (7, 550.0, 366.987),
        (8, 1050.0, 366.987),
    ]
    .into_iter()
    .map(|(cell_id, x, y)| CellConfig { cell_id, x, y })
    .collect()
}

/// Output sink configuration. Absent sinks are disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// CSV file sink
    #[serde(default)]
    pub file: Option<FileSinkConfig>,
    /// Unix stream socket sink
    #[serde(default)]
    pub socket: Option<SocketSinkConfig>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            file: Some(FileSinkConfig::default()),
            socket: Some(SocketSinkConfig::default()),
        }
    }
}

/// CSV file sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    /// Output file path (truncated at startup)
    pub path: PathBuf,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

/// Unix stream socket sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketSinkConfig {
    /// Listener socket path
    pub path: PathBuf,
    /// Connection attempts at startup
    pub connect_attempts: u32,
    /// Delay between connection attempts (ms)
    pub retry_interval_ms: u64,
    /// Per-write timeout (ms)
    pub write_timeout_ms: u64,
}

impl Default for SocketSinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOCKET_PATH),
            connect_attempts: 5,
            retry_interval_ms: 1000,
            write_timeout_ms: 100,
        }
    }
}

impl SocketSinkConfig {
    /// Delay between connection attempts
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Per-write timeout
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// Replay input configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between replayed indications (ms); 0 replays as fast as possible
    pub interval_ms: u64,
}

impl ReplayConfig {
    /// Pacing interval, or `None` when unpaced
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_ms > 0).then(|| Duration::from_millis(self.interval_ms))
    }
}
