//! Replay task implementation

use std::path::PathBuf;
use std::time::Duration;

use sinrmon_kpm::Indication;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::tasks::{MonitorMessage, ShutdownTrigger, TaskHandle};

/// Errors that end a replay early.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Input could not be opened or read
    #[error("Replay input error: {0}")]
    Io(#[from] std::io::Error),

    /// The monitor task is no longer receiving
    #[error("Monitor task closed its channel")]
    MonitorClosed,
}

/// Where indications are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaySource {
    /// Standard input
    Stdin,
    /// JSON-lines file
    File(PathBuf),
}

impl ReplaySource {
    /// `-` selects standard input, anything else a file path.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => ReplaySource::Stdin,
            Some(path) => ReplaySource::File(PathBuf::from(path)),
        }
    }
}

impl std::fmt::Display for ReplaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplaySource::Stdin => write!(f, "stdin"),
            ReplaySource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of a replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Indications forwarded to the monitor task
    pub forwarded: u64,
    /// Lines that did not decode as an indication
    pub malformed: u64,
    /// Input exhausted (false when stopped by shutdown)
    pub completed: bool,
}

/// Reads indications and forwards them to the monitor task
pub struct ReplayTask {
    source: ReplaySource,
    monitor_tx: TaskHandle<MonitorMessage>,
    interval: Option<Duration>,
    shutdown: Option<ShutdownTrigger>,
}

impl ReplayTask {
    /// Creates a replay task; `interval` paces consecutive indications.
    pub fn new(
        source: ReplaySource,
        monitor_tx: TaskHandle<MonitorMessage>,
        interval: Option<Duration>,
    ) -> Self {
        Self {
            source,
            monitor_tx,
            interval,
            shutdown: None,
        }
    }

    /// Requests an application shutdown once the input is exhausted.
    pub fn shutdown_on_eof(mut self, trigger: ShutdownTrigger) -> Self {
        self.shutdown = Some(trigger);
        self
    }

    /// Opens the source and replays it until EOF or shutdown.
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<ReplayReport, ReplayError> {
        info!("Replaying indications from {}", self.source);
        let report = match &self.source {
            ReplaySource::Stdin => {
                self.replay(BufReader::new(tokio::io::stdin()), shutdown_rx)
                    .await?
            }
            ReplaySource::File(path) => {
                let file = tokio::fs::File::open(path).await?;
                self.replay(BufReader::new(file), shutdown_rx).await?
            }
        };

        info!(
            "Replay finished: {} indications forwarded, {} malformed lines",
            report.forwarded, report.malformed
        );
        if report.completed {
            if let Some(trigger) = &self.shutdown {
                trigger.trigger();
            }
        }
        Ok(report)
    }

    /// Replays JSON lines from `reader`.
    pub async fn replay<R>(
        &self,
        reader: R,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<ReplayReport, ReplayError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut report = ReplayReport::default();
        let mut line_no = 0u64;

        loop {
            if *shutdown_rx.borrow() {
                debug!("Replay stopped by shutdown after {} lines", line_no);
                return Ok(report);
            }

            let line = tokio::select! {
                line = lines.next_line() => line?,
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped, stopping replay");
                        return Ok(report);
                    }
                    continue;
                }
            };
            let Some(line) = line else {
                report.completed = true;
                return Ok(report);
            };
            line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let indication: Indication = match serde_json::from_str(&line) {
                Ok(indication) => indication,
                Err(e) => {
                    warn!("Line {}: not a valid indication: {}", line_no, e);
                    report.malformed += 1;
                    continue;
                }
            };

            self.monitor_tx
                .indication(indication)
                .await
                .map_err(|_| ReplayError::MonitorClosed)?;
            report.forwarded += 1;

            if let Some(interval) = self.interval {
                tokio::time::sleep(interval).await;
            }
        }
    }
}
