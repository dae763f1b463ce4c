//! Monitor task
//!
//! Owns the [`sinrmon_kpm::Aggregator`] and applies indications strictly in
//! arrival order. Being the only owner of the aggregation state, it needs no
//! lock: the channel serializes access.

mod task;

pub use task::MonitorTask;
