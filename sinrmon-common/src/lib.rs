//! Common types and utilities for sinrmon
//!
//! This crate provides the identifier types, round counter, configuration
//! structures, logging setup, and transport helpers shared by the
//! aggregation core and the monitor application.

pub mod config;
pub mod error;
pub mod logging;
pub mod round;
pub mod transport;
pub mod types;

pub use config::{
    AggregationConfig, CellConfig, FileSinkConfig, MonitorConfig, ReplayConfig, SinkConfig,
    SocketSinkConfig,
};
pub use error::Error;
pub use logging::{init_logging, init_logging_with_filter, LogLevel, LogThrottle};
pub use round::RoundId;
pub use transport::connect_unix_with_retry;
pub use types::{Cell, CellId, UeId};
