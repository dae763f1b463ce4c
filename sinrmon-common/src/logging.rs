//! Logging infrastructure for sinrmon
//!
//! Configurable `tracing` subscriber setup plus a small throttle used to keep
//! high-frequency buffering messages from flooding the log.

use std::fmt;
use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Trace level, includes every skipped measurement record
    Trace,
    /// Debug level, includes gating and round transitions
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

/// Initialize the tracing subscriber with the specified log level.
///
/// Call once at startup. `RUST_LOG` takes precedence over `level` when set.
///
/// # Example
///
/// ```
/// use sinrmon_common::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    init_logging_with_filter(&level.to_string());
}

/// Initialize logging with a custom filter string.
///
/// # Example
///
/// ```
/// use sinrmon_common::logging::init_logging_with_filter;
///
/// // Info everywhere, debug for the aggregation core
/// init_logging_with_filter("info,sinrmon_kpm=debug");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .init();
}

/// Decides whether a per-entity progress counter is worth logging.
///
/// Every count up to `head` is logged, after that only every `every`-th.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogThrottle {
    head: u64,
    every: u64,
}

impl LogThrottle {
    /// Creates a throttle logging the first `head` counts and then every `every`-th.
    pub const fn new(head: u64, every: u64) -> Self {
        Self { head, every }
    }

    /// Returns true if `count` should be logged.
    pub fn should_log(&self, count: u64) -> bool {
        count <= self.head || (self.every > 0 && count % self.every == 0)
    }
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::new(5, 10)
    }
}
