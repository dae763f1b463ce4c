//! Unix stream socket sink
//!
//! Connects once at startup with bounded retries, then writes each record
//! line with a short blocking write timeout. A connection-level failure
//! marks the sink unavailable for the rest of the session. SIGPIPE is
//! ignored by the Rust runtime, so a closed peer surfaces as `BrokenPipe`.

use std::io::{ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use sinrmon_common::{connect_unix_with_retry, SocketSinkConfig};
use sinrmon_kpm::{RecordSink, SinkError};
use tracing::{info, warn};

/// Streams record lines to a local listener
#[derive(Debug)]
pub struct SocketSink {
    path: PathBuf,
    stream: UnixStream,
    available: bool,
}

impl SocketSink {
    /// Connects to the configured listener.
    pub async fn connect(config: &SocketSinkConfig) -> Result<Self, sinrmon_common::Error> {
        let stream = connect_unix_with_retry(
            &config.path,
            config.connect_attempts,
            config.retry_interval(),
        )
        .await?;

        let stream = stream.into_std()?;
        stream.set_nonblocking(false)?;
        stream.set_write_timeout(Some(config.write_timeout()))?;

        info!("Connected to socket listener at {}", config.path.display());
        Ok(Self::from_stream(config.path.clone(), stream))
    }

    /// Wraps an already connected blocking stream.
    pub fn from_stream(path: PathBuf, stream: UnixStream) -> Self {
        Self {
            path,
            stream,
            available: true,
        }
    }

    /// Listener path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_connection_lost(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::UnexpectedEof
    )
}

impl RecordSink for SocketSink {
    fn name(&self) -> &str {
        "socket"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        if !self.available {
            return Err(SinkError::Unavailable {
                sink: self.name().to_string(),
            });
        }

        match self.stream.write_all(line.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) => {
                if is_connection_lost(e.kind()) {
                    warn!("Socket listener at {} disconnected", self.path.display());
                    self.available = false;
                }
                Err(SinkError::Io(e))
            }
        }
    }
}
