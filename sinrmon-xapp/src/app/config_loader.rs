//! Configuration Loading for the SINR monitor
//!
//! Wraps the `MonitorConfig` from `sinrmon-common` with validation and
//! error handling specific to the xApp.
//!
//! # Example
//!
//! ```rust,ignore
//! use sinrmon_xapp::app::{load_monitor_config, validate_monitor_config};
//!
//! let config = load_monitor_config("config/sinr-monitor.yaml")?;
//! validate_monitor_config(&config)?;
//! ```

use std::collections::HashSet;
use std::path::Path;

use sinrmon_common::MonitorConfig;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Window, registry, or threshold values out of range
    #[error("Invalid aggregation settings: {0}")]
    InvalidAggregation(String),

    /// Duplicate or malformed cell entries
    #[error("Invalid cell topology: {0}")]
    InvalidTopology(String),

    /// Unusable sink settings
    #[error("Invalid sink configuration: {0}")]
    InvalidSink(String),
}

/// Loads a monitor configuration from a YAML file.
///
/// Missing sections take their defaults. Call `validate_monitor_config`
/// afterwards, or use `load_and_validate_monitor_config`.
pub fn load_monitor_config<P: AsRef<Path>>(path: P) -> Result<MonitorConfig, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_monitor_config_from_str(&contents)
}

/// Loads a monitor configuration from a YAML string.
pub fn load_monitor_config_from_str(yaml: &str) -> Result<MonitorConfig, ConfigError> {
    // An empty document deserializes as unit, not as an empty mapping.
    if yaml.trim().is_empty() {
        return Ok(MonitorConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Validates a monitor configuration.
///
/// # Validation Rules
///
/// - window capacity, max UEs, round population, published neighbors,
///   neighbor support and per-slot neighbor capacity must be at least 1
/// - minimum samples must not exceed the window capacity
/// - minimum qualifying neighbors must not exceed published neighbors
/// - cell ids must be unique and coordinates finite
/// - the socket sink needs at least one connect attempt and a non-zero write timeout
pub fn validate_monitor_config(config: &MonitorConfig) -> Result<(), ConfigValidationError> {
    let agg = &config.aggregation;

    let at_least_one = [
        ("window_capacity", agg.window_capacity),
        ("max_ues", agg.max_ues),
        ("round_population", agg.effective_round_population()),
        ("published_neighbors", agg.published_neighbors),
        ("min_neighbor_support", agg.min_neighbor_support),
        ("neighbor_slot_capacity", agg.neighbor_slot_capacity),
    ];
    for (name, value) in at_least_one {
        if value == 0 {
            return Err(ConfigValidationError::InvalidAggregation(format!(
                "{name} must be at least 1"
            )));
        }
    }

    if agg.min_samples > agg.window_capacity {
        return Err(ConfigValidationError::InvalidAggregation(format!(
            "min_samples {} exceeds window_capacity {}",
            agg.min_samples, agg.window_capacity
        )));
    }

    if agg.min_qualifying_neighbors > agg.published_neighbors {
        return Err(ConfigValidationError::InvalidAggregation(format!(
            "min_qualifying_neighbors {} exceeds published_neighbors {}",
            agg.min_qualifying_neighbors, agg.published_neighbors
        )));
    }

    let mut seen = HashSet::new();
    for cell in &config.cells {
        if !seen.insert(cell.cell_id) {
            return Err(ConfigValidationError::InvalidTopology(format!(
                "cell {} listed more than once",
                cell.cell_id
            )));
        }
        if !cell.x.is_finite() || !cell.y.is_finite() {
            return Err(ConfigValidationError::InvalidTopology(format!(
                "cell {} has non-finite coordinates",
                cell.cell_id
            )));
        }
    }

    if let Some(socket) = &config.sinks.socket {
        if socket.connect_attempts == 0 {
            return Err(ConfigValidationError::InvalidSink(
                "socket connect_attempts must be at least 1".to_string(),
            ));
        }
        if socket.write_timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidSink(
                "socket write_timeout_ms must be at least 1".to_string(),
            ));
        }
    }

    Ok(())
}

/// Loads and validates a monitor configuration from a YAML file.
pub fn load_and_validate_monitor_config<P: AsRef<Path>>(
    path: P,
) -> Result<MonitorConfig, ConfigError> {
    let config = load_monitor_config(path)?;
    validate_monitor_config(&config)?;
    Ok(config)
}
