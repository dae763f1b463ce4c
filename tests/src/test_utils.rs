//! Test utility functions for integration tests
//!
//! Provides common utilities for test setup, logging, and sinks that record
//! what the aggregator emitted.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use sinrmon_kpm::{RecordSink, SinkError};
use tokio::time::{sleep, timeout};
use tracing_subscriber::{fmt, EnvFilter};

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "info"
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Wait for a condition to become true with timeout
///
/// # Returns
/// * `Ok(())` if condition became true within timeout
/// * `Err` if timeout elapsed
pub async fn wait_for_condition<F, Fut>(
    mut condition: F,
    timeout_duration: Duration,
    poll_interval: Duration,
) -> TestResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let result = timeout(timeout_duration, async {
        loop {
            if condition().await {
                return;
            }
            sleep(poll_interval).await;
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => Err("Condition not met within timeout".into()),
    }
}

/// Default timeout for test operations
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default poll interval for condition checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Lines captured by a [`CollectingSink`], readable after the sink moved into an aggregator
#[derive(Debug, Clone, Default)]
pub struct SharedLines(Arc<Mutex<Vec<String>>>);

impl SharedLines {
    /// Copy of every captured line
    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Captured line count
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing was captured
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, line: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// Sink keeping every line in memory
#[derive(Debug)]
pub struct CollectingSink {
    lines: SharedLines,
}

impl CollectingSink {
    /// Creates a sink and the handle to read its lines
    pub fn new() -> (Self, SharedLines) {
        let lines = SharedLines::default();
        (
            Self {
                lines: lines.clone(),
            },
            lines,
        )
    }
}

impl RecordSink for CollectingSink {
    fn name(&self) -> &str {
        "collect"
    }

    fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        self.lines.push(line);
        Ok(())
    }
}
