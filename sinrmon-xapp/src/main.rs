//! SINR monitor xApp
//!
//! Main binary for the SINR monitor. It implements:
//! - CLI argument parsing
//! - Configuration loading and validation
//! - Sink setup and task spawning
//! - Graceful shutdown on Ctrl+C, SIGTERM, or end of input
//!
//! # Usage
//!
//! ```bash
//! sinr-monitor -c config/sinr-monitor.yaml -i indications.jsonl
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use sinrmon_common::{init_logging, LogLevel, MonitorConfig};
use sinrmon_xapp::{
    build_aggregator, build_sinks, load_and_validate_monitor_config, validate_monitor_config,
    MonitorTask, ReplaySource, ReplayTask, Task, TaskError, TaskId, TaskManager,
    DEFAULT_CHANNEL_CAPACITY,
};

/// sinr-monitor - KPM SINR aggregation xApp
#[derive(Parser, Debug)]
#[command(name = "sinr-monitor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the monitor configuration file (YAML); defaults apply when omitted
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config_file: Option<String>,

    /// JSON-lines indication input; `-` or omitted reads stdin
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Do not connect the socket sink
    #[arg(long = "no-socket")]
    no_socket: bool,
}

/// Application state for the monitor
struct MonitorApp {
    /// Task manager for lifecycle management
    task_manager: TaskManager,
    /// Shutdown signal receiver
    shutdown_rx: watch::Receiver<bool>,
}

impl MonitorApp {
    /// Loads configuration, opens sinks, and spawns the tasks
    async fn new(args: &Args) -> Result<Self> {
        let config = match &args.config_file {
            Some(path) => {
                info!("Loading configuration from: {}", path);
                load_and_validate_monitor_config(path)
                    .with_context(|| format!("Failed to load configuration from {path}"))?
            }
            None => {
                info!("No configuration file given, using defaults");
                let config = MonitorConfig::default();
                validate_monitor_config(&config).context("Default configuration is invalid")?;
                config
            }
        };

        info!(
            "Configuration loaded: window={}, max_ues={}, min_samples={}, published_neighbors={}",
            config.aggregation.window_capacity,
            config.aggregation.max_ues,
            config.aggregation.min_samples,
            config.aggregation.published_neighbors
        );

        let sinks = build_sinks(&config, args.no_socket)
            .await
            .context("Failed to open output sinks")?;
        let aggregator = build_aggregator(&config, sinks);

        let (mut task_manager, monitor_rx) = TaskManager::new(config, DEFAULT_CHANNEL_CAPACITY);
        let task_base = task_manager.task_base();
        let shutdown_rx = task_manager.shutdown_receiver();

        let mut monitor_task = MonitorTask::new(aggregator);
        let handle = tokio::spawn(async move {
            monitor_task.run(monitor_rx).await;
            Ok::<(), TaskError>(())
        });
        task_manager.register_task_handle(TaskId::Monitor, handle);
        info!("Monitor task spawned");

        let source = ReplaySource::from_arg(args.input.as_deref());
        let interval = task_base.config.replay.interval();
        let replay_task = ReplayTask::new(source, task_base.monitor_tx.clone(), interval)
            .shutdown_on_eof(task_base.shutdown.clone());
        let replay_shutdown = task_manager.shutdown_receiver();
        let handle = tokio::spawn(async move {
            replay_task
                .run(replay_shutdown)
                .await
                .map(|_| ())
                .map_err(|e| TaskError {
                    task_id: TaskId::Replay,
                    message: e.to_string(),
                })
        });
        task_manager.register_task_handle(TaskId::Replay, handle);
        info!("Replay task spawned");

        Ok(Self {
            task_manager,
            shutdown_rx,
        })
    }

    /// Runs until a signal arrives or the input is exhausted
    async fn run(&mut self) -> Result<()> {
        info!("SINR monitor started, waiting for indications...");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = wait_for_sigterm() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
            _ = async {
                loop {
                    if *self.shutdown_rx.borrow() {
                        break;
                    }
                    if self.shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            } => {
                info!("Input exhausted, initiating shutdown...");
            }
        }

        Ok(())
    }

    /// Performs graceful shutdown of all tasks
    async fn shutdown(mut self) -> Result<()> {
        info!("Initiating graceful shutdown...");

        match self.task_manager.shutdown().await {
            Ok(()) => info!("All tasks shut down successfully"),
            Err(e) => warn!("Some tasks failed during shutdown: {}", e),
        }
        for (task_id, state) in self.task_manager.status_summary() {
            info!("Task {}: {}", task_id, state);
        }
        Ok(())
    }
}

/// Resolves when the process receives SIGTERM.
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.log_level);

    match run_monitor(args).await {
        Ok(()) => {
            info!("SINR monitor exited successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("SINR monitor failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main execution logic
async fn run_monitor(args: Args) -> Result<()> {
    let mut app = MonitorApp::new(&args).await?;
    app.run().await?;
    app.shutdown().await?;
    Ok(())
}
