//! Error types for sinrmon

use thiserror::Error;

/// Error types for the sinrmon library.
#[derive(Debug, Error)]
pub enum Error {
    /// Network I/O errors.
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// Peer could not be reached within the allowed number of attempts.
    #[error("Connection to {path} failed after {attempts} attempt(s)")]
    ConnectExhausted {
        /// Socket path that was tried
        path: String,
        /// Number of attempts made
        attempts: u32,
    },
}
