//! Error types for the aggregation core
//!
//! Nothing here propagates out of indication processing; sink errors are
//! logged and counted, record parse errors only concern downstream readers.

use thiserror::Error;

/// Errors raised by a record sink
#[derive(Error, Debug)]
pub enum SinkError {
    /// Write to the underlying file or socket failed
    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sink has been marked unavailable after an earlier failure
    #[error("Sink unavailable: {sink}")]
    Unavailable {
        /// Sink name
        sink: String,
    },
}

/// Errors parsing an emitted CSV line back into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    /// Not enough comma-separated fields
    #[error("Expected at least {expected} fields, found {found}")]
    FieldCount {
        /// Minimum field count
        expected: usize,
        /// Fields present
        found: usize,
    },

    /// A field could not be parsed as a number
    #[error("Invalid value for {field}: {value:?}")]
    InvalidField {
        /// Column name
        field: &'static str,
        /// Raw text
        value: String,
    },
}
