//! Local stream transport utilities
//!
//! Connects to the Unix-domain listener that consumes emitted records.

use std::path::Path;
use std::time::Duration;

use tokio::net::UnixStream;
use tracing::{debug, info, warn};

use crate::Error;

/// Connects to a Unix-domain stream listener, retrying a bounded number of times.
///
/// Waits `retry_interval` between attempts. Returns
/// [`Error::ConnectExhausted`] once `attempts` connections have failed; an
/// `attempts` of zero is treated as one.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use sinrmon_common::connect_unix_with_retry;
///
/// async fn example() -> Result<(), sinrmon_common::Error> {
///     let stream =
///         connect_unix_with_retry("/tmp/sinr_localization.sock", 5, Duration::from_secs(1)).await?;
///     Ok(())
/// }
/// ```
pub async fn connect_unix_with_retry<P: AsRef<Path>>(
    path: P,
    attempts: u32,
    retry_interval: Duration,
) -> Result<UnixStream, Error> {
    let path = path.as_ref();
    let attempts = attempts.max(1);

    for attempt in 1..=attempts {
        match UnixStream::connect(path).await {
            Ok(stream) => {
                info!("Connected to {} (attempt {}/{})", path.display(), attempt, attempts);
                return Ok(stream);
            }
            Err(e) => {
                if attempt == 1 {
                    warn!("Receiver at {} not ready ({}), retrying...", path.display(), e);
                } else {
                    debug!("Connect attempt {}/{} to {} failed: {}", attempt, attempts, path.display(), e);
                }
            }
        }

        if attempt < attempts {
            tokio::time::sleep(retry_interval).await;
        }
    }

    Err(Error::ConnectExhausted {
        path: path.display().to_string(),
        attempts,
    })
}
