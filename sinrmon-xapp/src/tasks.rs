//! xApp Task Framework
//!
//! Actor-style tasks communicating over typed message channels.
//!
//! # Architecture
//!
//! - **Monitor Task**: owns the aggregator and its sinks, applies indications
//!   one at a time in arrival order
//! - **Replay Task**: reads recorded indications and forwards them to the
//!   monitor task
//!
//! # Task Lifecycle
//!
//! Tasks follow a lifecycle managed by `TaskManager`:
//! 1. **Created**: Task is instantiated but not yet running
//! 2. **Running**: Task is actively processing messages
//! 3. **Stopping**: Task received shutdown signal, cleaning up
//! 4. **Stopped**: Task has terminated
//! 5. **Failed**: Task terminated due to an error

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use sinrmon_common::MonitorConfig;
use sinrmon_kpm::{AggregatorStats, Indication};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

// ============================================================================
// Task Message Envelope
// ============================================================================

/// Task message envelope wrapping typed messages with control signals.
#[derive(Debug)]
pub enum TaskMessage<T> {
    /// Regular message payload
    Message(T),
    /// Shutdown signal - task should terminate gracefully
    Shutdown,
}

// ============================================================================
// Task Lifecycle State
// ============================================================================

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    /// Task is created but not yet started
    #[default]
    Created,
    /// Task is running and processing messages
    Running,
    /// Task is in the process of stopping
    Stopping,
    /// Task has stopped gracefully
    Stopped,
    /// Task terminated due to an error
    Failed,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Created => write!(f, "Created"),
            TaskState::Running => write!(f, "Running"),
            TaskState::Stopping => write!(f, "Stopping"),
            TaskState::Stopped => write!(f, "Stopped"),
            TaskState::Failed => write!(f, "Failed"),
        }
    }
}

/// Task identifier for the xApp tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// Aggregation task
    Monitor,
    /// Indication replay task
    Replay,
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskId::Monitor => write!(f, "Monitor"),
            TaskId::Replay => write!(f, "Replay"),
        }
    }
}

/// Information about a running task.
#[derive(Debug)]
pub struct TaskInfo {
    /// Task identifier
    pub id: TaskId,
    /// Current state
    pub state: TaskState,
    /// Time when the task was started
    pub started_at: Option<Instant>,
    /// Time when the task was stopped
    pub stopped_at: Option<Instant>,
    /// Error message if task failed
    pub error: Option<String>,
}

// ============================================================================
// Task Trait
// ============================================================================

/// Base trait for message-driven xApp tasks.
#[async_trait::async_trait]
pub trait Task: Send + 'static {
    /// The message type this task processes.
    type Message: Send;

    /// Runs the task's main loop, processing messages until shutdown.
    async fn run(&mut self, rx: mpsc::Receiver<TaskMessage<Self::Message>>);
}

// ============================================================================
// Message Types
// ============================================================================

/// Messages for the Monitor task.
#[derive(Debug)]
pub enum MonitorMessage {
    /// Decoded KPM indication to aggregate
    Indication(Box<Indication>),
    /// Counters request
    Stats {
        /// Reply channel
        reply: oneshot::Sender<AggregatorStats>,
    },
}

// ============================================================================
// Task Handle
// ============================================================================

/// Handle for sending messages to a task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    tx: mpsc::Sender<TaskMessage<T>>,
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> TaskHandle<T> {
    /// Creates a new task handle from a sender.
    pub fn new(tx: mpsc::Sender<TaskMessage<T>>) -> Self {
        Self { tx }
    }

    /// Sends a message to the task.
    ///
    /// Returns an error if the task has been dropped.
    pub async fn send(&self, msg: T) -> Result<(), mpsc::error::SendError<TaskMessage<T>>> {
        self.tx.send(TaskMessage::Message(msg)).await
    }

    /// Sends a shutdown signal to the task.
    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<TaskMessage<T>>> {
        self.tx.send(TaskMessage::Shutdown).await
    }

    /// Returns true if the task channel is closed.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl TaskHandle<MonitorMessage> {
    /// Queues an indication for aggregation.
    pub async fn indication(
        &self,
        indication: Indication,
    ) -> Result<(), mpsc::error::SendError<TaskMessage<MonitorMessage>>> {
        self.send(MonitorMessage::Indication(Box::new(indication))).await
    }

    /// Requests a counters snapshot; `None` if the monitor task is gone.
    pub async fn stats(&self) -> Option<AggregatorStats> {
        let (reply, rx) = oneshot::channel();
        self.send(MonitorMessage::Stats { reply }).await.ok()?;
        rx.await.ok()
    }
}

// ============================================================================
// Task Base
// ============================================================================

/// Shared handles and configuration given to every task.
#[derive(Clone)]
pub struct XappTaskBase {
    /// Monitor configuration
    pub config: Arc<MonitorConfig>,
    /// Handle to the Monitor task
    pub monitor_tx: TaskHandle<MonitorMessage>,
    /// Requests an application-wide shutdown
    pub shutdown: ShutdownTrigger,
}

impl XappTaskBase {
    /// Creates a task base together with the monitor task's receiver.
    pub fn new(
        config: MonitorConfig,
        channel_capacity: usize,
        shutdown: ShutdownTrigger,
    ) -> (Self, mpsc::Receiver<TaskMessage<MonitorMessage>>) {
        let (monitor_tx, monitor_rx) = mpsc::channel(channel_capacity);
        let base = Self {
            config: Arc::new(config),
            monitor_tx: TaskHandle::new(monitor_tx),
            shutdown,
        };
        (base, monitor_rx)
    }

    /// Sends shutdown to every message-driven task.
    pub async fn shutdown_all(&self) {
        let _ = self.monitor_tx.shutdown().await;
    }
}

/// Cloneable sender side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownTrigger {
    /// Creates a trigger and the matching receiver.
    pub fn channel() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    /// Signals shutdown to every receiver.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once shutdown has been signalled.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Returns a new receiver for the signal.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Default channel capacity for task message queues.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default shutdown timeout in milliseconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Task Manager
// ============================================================================

/// Manages the lifecycle of the xApp tasks.
pub struct TaskManager {
    /// Task base with all message channels
    task_base: XappTaskBase,
    /// Task state information
    task_states: HashMap<TaskId, TaskInfo>,
    /// Shutdown signal receiver (cloneable)
    shutdown_rx: watch::Receiver<bool>,
    /// Join handles for spawned tasks
    join_handles: HashMap<TaskId, JoinHandle<Result<(), TaskError>>>,
}

/// Error type for task operations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Task {task_id} error: {message}")]
pub struct TaskError {
    /// Task that failed
    pub task_id: TaskId,
    /// Error message
    pub message: String,
}

impl TaskManager {
    /// Creates a new `TaskManager` with the given configuration.
    ///
    /// Returns the manager along with the monitor task's receiver.
    pub fn new(
        config: MonitorConfig,
        channel_capacity: usize,
    ) -> (Self, mpsc::Receiver<TaskMessage<MonitorMessage>>) {
        let (trigger, shutdown_rx) = ShutdownTrigger::channel();
        let (task_base, monitor_rx) = XappTaskBase::new(config, channel_capacity, trigger);

        let mut task_states = HashMap::new();
        for task_id in [TaskId::Monitor, TaskId::Replay] {
            task_states.insert(
                task_id,
                TaskInfo {
                    id: task_id,
                    state: TaskState::Created,
                    started_at: None,
                    stopped_at: None,
                    error: None,
                },
            );
        }

        let manager = Self {
            task_base,
            task_states,
            shutdown_rx,
            join_handles: HashMap::new(),
        };

        (manager, monitor_rx)
    }

    /// Returns a clone of the task base for inter-task communication.
    pub fn task_base(&self) -> XappTaskBase {
        self.task_base.clone()
    }

    /// Returns a receiver for the shutdown signal.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Gets the current state of a task.
    pub fn get_task_state(&self, task_id: TaskId) -> Option<TaskState> {
        self.task_states.get(&task_id).map(|info| info.state)
    }

    /// Gets information about a task.
    pub fn get_task_info(&self, task_id: TaskId) -> Option<&TaskInfo> {
        self.task_states.get(&task_id)
    }

    /// Returns true if any task has failed.
    pub fn any_task_failed(&self) -> bool {
        self.task_states
            .values()
            .any(|info| info.state == TaskState::Failed)
    }

    /// Marks a task as started.
    pub fn mark_task_started(&mut self, task_id: TaskId) {
        if let Some(info) = self.task_states.get_mut(&task_id) {
            info.state = TaskState::Running;
            info.started_at = Some(Instant::now());
        }
    }

    /// Marks a task as stopped.
    pub fn mark_task_stopped(&mut self, task_id: TaskId) {
        if let Some(info) = self.task_states.get_mut(&task_id) {
            info.state = TaskState::Stopped;
            info.stopped_at = Some(Instant::now());
        }
    }

    /// Marks a task as failed with an error message.
    pub fn mark_task_failed(&mut self, task_id: TaskId, error: String) {
        if let Some(info) = self.task_states.get_mut(&task_id) {
            info.state = TaskState::Failed;
            info.stopped_at = Some(Instant::now());
            info.error = Some(error);
        }
    }

    /// Registers a join handle for a spawned task and marks it running.
    pub fn register_task_handle(
        &mut self,
        task_id: TaskId,
        handle: JoinHandle<Result<(), TaskError>>,
    ) {
        self.join_handles.insert(task_id, handle);
        self.mark_task_started(task_id);
    }

    /// Initiates graceful shutdown of all tasks.
    ///
    /// Producers are joined before the monitor is told to stop, so every
    /// indication already queued is aggregated.
    pub async fn shutdown(&mut self) -> Result<(), TaskError> {
        self.task_base.shutdown.trigger();

        for info in self.task_states.values_mut() {
            if info.state == TaskState::Running {
                info.state = TaskState::Stopping;
            }
        }

        let timeout = tokio::time::Duration::from_millis(DEFAULT_SHUTDOWN_TIMEOUT_MS);
        let deadline = tokio::time::Instant::now() + timeout;

        let mut results: Vec<(TaskId, Result<(), String>)> = Vec::new();
        if let Some(handle) = self.join_handles.remove(&TaskId::Replay) {
            results.push((TaskId::Replay, Self::join(handle, deadline).await));
        }

        self.task_base.shutdown_all().await;

        let handles: Vec<_> = self.join_handles.drain().collect();
        for (task_id, handle) in handles {
            results.push((task_id, Self::join(handle, deadline).await));
        }

        for (task_id, result) in results {
            match result {
                Ok(()) => self.mark_task_stopped(task_id),
                Err(msg) => self.mark_task_failed(task_id, msg),
            }
        }

        if self.any_task_failed() {
            let failed: Vec<_> = self
                .task_states
                .values()
                .filter(|info| info.state == TaskState::Failed)
                .map(|info| {
                    format!(
                        "{}: {}",
                        info.id,
                        info.error.as_deref().unwrap_or("unknown error")
                    )
                })
                .collect();
            return Err(TaskError {
                task_id: TaskId::Monitor,
                message: format!("Tasks failed during shutdown: {}", failed.join(", ")),
            });
        }

        Ok(())
    }

    async fn join(
        handle: JoinHandle<Result<(), TaskError>>,
        deadline: tokio::time::Instant,
    ) -> Result<(), String> {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match tokio::time::timeout(remaining, handle).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(e.message),
            Ok(Err(_join_error)) => Err("Task panicked".to_string()),
            Err(_timeout) => Err("Shutdown timeout".to_string()),
        }
    }

    /// Returns every task's state, monitor first.
    pub fn status_summary(&self) -> Vec<(TaskId, TaskState)> {
        [TaskId::Monitor, TaskId::Replay]
            .into_iter()
            .filter_map(|id| self.get_task_state(id).map(|state| (id, state)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
