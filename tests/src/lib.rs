//! Integration test framework for sinrmon
#![allow(missing_docs)]
//!
//! Shared helpers for cross-crate tests of the SINR monitor.
//!
//! # Components
//!
//! - [`test_fixtures`] - Indication builders and configuration helpers
//! - [`test_utils`] - Logging setup, collecting sinks, and wait helpers
//!
//! # Test Categories
//!
//! 1. **End-to-end** - indications through the aggregator into file and socket sinks,
//!    and through the replay and monitor tasks
//! 2. **Multi-UE** - round synchronization, registry capacity, and serving cell changes

pub mod test_fixtures;
pub mod test_utils;

pub use test_fixtures::{
    neighbor_record, serving_record, test_monitor_config, IndicationBuilder, UE_REPORT_CELLS,
};
pub use test_utils::{
    init_test_logging, wait_for_condition, CollectingSink, SharedLines, TestResult,
    DEFAULT_POLL_INTERVAL, DEFAULT_TEST_TIMEOUT,
};

#[cfg(test)]
mod tests {
    use super::*;
    use sinrmon_kpm::RecordSink;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_wait_for_condition_success() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            flag_clone.store(true, Ordering::SeqCst);
        });

        let result = wait_for_condition(
            || async { flag.load(Ordering::SeqCst) },
            Duration::from_secs(1),
            Duration::from_millis(10),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_for_condition_timeout() {
        let result = wait_for_condition(
            || async { false },
            Duration::from_millis(100),
            Duration::from_millis(10),
        )
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_collecting_sink_shares_lines() {
        let (mut sink, lines) = CollectingSink::new();
        sink.write_line("a\n").unwrap();
        sink.write_line("b\n").unwrap();
        assert_eq!(lines.snapshot(), vec!["a\n".to_string(), "b\n".to_string()]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_indication_builder() {
        let indication = IndicationBuilder::new(5)
            .serving(7, 2, 12.0)
            .neighbors(7, 2, &[(3, 5.0), (4, 6.0)])
            .build();
        assert_eq!(indication.collect_start_time, 5);
        assert_eq!(indication.ue_reports.len(), 1);
        assert_eq!(indication.records().count(), 2);
    }
}
