//! Output sinks
//!
//! Implementations of [`sinrmon_kpm::RecordSink`] for the two record
//! consumers: a CSV file and a local Unix stream socket.

mod file;
mod socket;

pub use file::FileSink;
pub use socket::SocketSink;
