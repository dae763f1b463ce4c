//! Indication replay
//!
//! Feeds recorded KPM indications (one JSON object per line) into the
//! monitor task, standing in for the live E2 subscription.

mod task;

pub use task::{ReplayError, ReplayReport, ReplaySource, ReplayTask};
