//! sinrmon-xapp - SINR monitor xApp
//!
//! Runs the KPM SINR aggregation core as an application: it loads the
//! configuration, opens the output sinks, and feeds decoded indications
//! through a single monitor task.
//!
//! # Architecture
//!
//! ```text
//!  JSON-lines input ──► Replay Task ──(mpsc)──► Monitor Task ──► FileSink
//!                                                    │
//!                                                    └────────► SocketSink
//! ```
//!
//! The monitor task is the only owner of the aggregation state, so
//! indications are applied one at a time in arrival order.
//!
//! # Configuration Loading
//!
//! ```rust,ignore
//! use sinrmon_xapp::app::load_and_validate_monitor_config;
//!
//! let config = load_and_validate_monitor_config("config/sinr-monitor.yaml")?;
//! ```

pub mod app;
pub mod monitor;
pub mod replay;
pub mod sink;
pub mod tasks;

pub use app::{
    build_aggregator, build_sinks, load_and_validate_monitor_config, load_monitor_config,
    load_monitor_config_from_str, validate_monitor_config, ConfigError, ConfigValidationError,
};
pub use monitor::MonitorTask;
pub use replay::{ReplayError, ReplayReport, ReplaySource, ReplayTask};
pub use sink::{FileSink, SocketSink};
pub use tasks::{
    MonitorMessage, ShutdownTrigger, Task, TaskError, TaskHandle, TaskId, TaskInfo, TaskManager,
    TaskMessage, TaskState, XappTaskBase, DEFAULT_CHANNEL_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT_MS,
};
