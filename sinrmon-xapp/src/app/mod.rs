//! Application setup
//!
//! Configuration loading and validation, plus construction of the output
//! sinks named by the configuration.

mod config_loader;
mod setup;

pub use config_loader::{
    load_and_validate_monitor_config, load_monitor_config, load_monitor_config_from_str,
    validate_monitor_config, ConfigError, ConfigValidationError,
};

pub use setup::{build_aggregator, build_sinks};
