//! End-to-End Scenario Tests for sinrmon
//!
//! These tests validate the full path of a UE's measurements:
//! - KPM indications through the aggregator into the CSV file sink
//! - Record delivery to a Unix socket listener, and survival when it leaves
//! - Replay task and monitor task wired together by the task manager

use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::time::Duration;

use integration_tests::{
    init_test_logging, test_monitor_config, wait_for_condition, CollectingSink,
    IndicationBuilder, TestResult, DEFAULT_POLL_INTERVAL, DEFAULT_TEST_TIMEOUT,
};
use sinrmon_common::{FileSinkConfig, SocketSinkConfig};
use sinrmon_kpm::{Aggregator, Indication};
use sinrmon_xapp::{
    build_aggregator, build_sinks, FileSink, MonitorTask, ReplaySource, ReplayTask, SocketSink,
    Task, TaskError, TaskId, TaskManager, TaskState, DEFAULT_CHANNEL_CAPACITY,
};

const UE: u16 = 7;
const SERVING_CELL: u16 = 2;
const HEADER: &str =
    "round_id,ue_id,serving_x,serving_y,serving_sinr_ma,neigh1_sinr_ma,neigh2_sinr_ma,neigh3_sinr_ma";
const LAST_RECORD: &str = "9,7,800.000,800.000,19.000,7.000,6.000,5.000";

/// Ten rounds of UE 7 on cell 2: serving 10, 12, ..., 28 dB with neighbors
/// 3, 4, 5 at 5, 6, 7 dB every round.
fn single_ue_trace() -> Vec<Indication> {
    (0..10u64)
        .map(|round| {
            IndicationBuilder::new(round * 100)
                .serving(UE, SERVING_CELL, 10.0 + 2.0 * round as f64)
                .neighbors(UE, SERVING_CELL, &[(3, 5.0), (4, 6.0), (5, 7.0)])
                .build()
        })
        .collect()
}

fn single_ue_aggregator() -> Aggregator {
    build_aggregator(&test_monitor_config(1), Vec::new())
}

/// E2E Test: single UE measurements into the CSV file
#[test]
fn test_e2e_single_ue_csv_file() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sinr_localization.csv");

    let mut aggregator = single_ue_aggregator();
    aggregator.add_sink(Box::new(FileSink::create(&path, 3).unwrap()));

    let emitted: usize = single_ue_trace()
        .iter()
        .map(|indication| aggregator.process_indication(indication).emitted.len())
        .sum();
    assert_eq!(emitted, 5);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].starts_with("5,7,800.000,800.000,15.000,"));
    assert_eq!(lines[5], LAST_RECORD);

    let stats = aggregator.stats();
    tracing::info!("Aggregator stats: {}", stats);
    assert_eq!(stats.emitted, 5);
    assert_eq!(stats.sink_failures, 0);
}

/// E2E Test: records streamed to a local socket listener
#[tokio::test]
async fn test_e2e_socket_sink_delivery() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sinr.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let config = SocketSinkConfig {
        path: path.clone(),
        connect_attempts: 3,
        retry_interval_ms: 10,
        write_timeout_ms: 500,
    };
    let socket = SocketSink::connect(&config).await.unwrap();
    let (peer, _) = listener.accept().unwrap();
    peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    let (collector, collected) = CollectingSink::new();
    let mut aggregator = single_ue_aggregator();
    aggregator.add_sink(Box::new(socket));
    aggregator.add_sink(Box::new(collector));

    for indication in single_ue_trace() {
        aggregator.process_indication(&indication);
    }

    // The socket carries records only, no header.
    let mut reader = BufReader::new(peer);
    let mut received = Vec::new();
    for _ in 0..5 {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        received.push(line);
    }
    assert_eq!(received, collected.snapshot());
    assert_eq!(received[4], format!("{LAST_RECORD}\n"));
}

/// E2E Test: the monitor keeps writing to the file when the listener disconnects
#[tokio::test]
async fn test_e2e_listener_disconnect_is_not_fatal() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sinr.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let config = SocketSinkConfig {
        path: path.clone(),
        connect_attempts: 1,
        retry_interval_ms: 10,
        write_timeout_ms: 500,
    };
    let socket = SocketSink::connect(&config).await.unwrap();
    let (peer, _) = listener.accept().unwrap();
    drop(peer);
    drop(listener);

    let (collector, collected) = CollectingSink::new();
    let mut aggregator = single_ue_aggregator();
    aggregator.add_sink(Box::new(socket));
    aggregator.add_sink(Box::new(collector));

    for indication in single_ue_trace() {
        aggregator.process_indication(&indication);
    }

    assert_eq!(collected.len(), 5);
    assert_eq!(aggregator.emitter().available_sinks(), 1);
    let stats = aggregator.stats();
    assert_eq!(stats.emitted, 5);
    assert!(stats.sink_failures >= 1);
}

/// E2E Test: replay file -> replay task -> monitor task -> CSV file
///
/// 1. Sinks and aggregator are built from configuration
/// 2. Monitor and replay tasks are spawned under the task manager
/// 3. The replay task requests shutdown at end of input
/// 4. Shutdown drains the monitor queue before stopping it
#[tokio::test]
async fn test_e2e_replay_pipeline() -> TestResult {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("indications.jsonl");
    let output = dir.path().join("out.csv");

    let mut trace = String::new();
    for indication in single_ue_trace() {
        trace.push_str(&serde_json::to_string(&indication)?);
        trace.push('\n');
    }
    trace.push_str("{ not an indication\n");
    std::fs::write(&input, trace)?;

    let mut config = test_monitor_config(1);
    config.sinks.file = Some(FileSinkConfig {
        path: output.clone(),
    });

    let sinks = build_sinks(&config, true).await?;
    let aggregator = build_aggregator(&config, sinks);
    let (mut manager, monitor_rx) = TaskManager::new(config, DEFAULT_CHANNEL_CAPACITY);
    let base = manager.task_base();

    let mut monitor = MonitorTask::new(aggregator);
    manager.register_task_handle(
        TaskId::Monitor,
        tokio::spawn(async move {
            monitor.run(monitor_rx).await;
            Ok::<(), TaskError>(())
        }),
    );

    let replay = ReplayTask::new(ReplaySource::File(input), base.monitor_tx.clone(), None)
        .shutdown_on_eof(base.shutdown.clone());
    let replay_shutdown = manager.shutdown_receiver();
    manager.register_task_handle(
        TaskId::Replay,
        tokio::spawn(async move {
            replay
                .run(replay_shutdown)
                .await
                .map(|_| ())
                .map_err(|e| TaskError {
                    task_id: TaskId::Replay,
                    message: e.to_string(),
                })
        }),
    );

    let shutdown_rx = manager.shutdown_receiver();
    wait_for_condition(
        || {
            let rx = shutdown_rx.clone();
            async move { *rx.borrow() }
        },
        DEFAULT_TEST_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
    )
    .await?;

    let stats = base.monitor_tx.stats().await.ok_or("monitor task gone")?;
    assert_eq!(stats.indications, 10);
    assert_eq!(stats.emitted, 5);

    manager.shutdown().await?;
    assert_eq!(manager.get_task_state(TaskId::Monitor), Some(TaskState::Stopped));
    assert_eq!(manager.get_task_state(TaskId::Replay), Some(TaskState::Stopped));

    let contents = std::fs::read_to_string(&output)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.first().copied(), Some(HEADER));
    assert_eq!(lines.last().copied(), Some(LAST_RECORD));
    assert_eq!(lines.len(), 6);
    Ok(())
}
