//! Monitor task implementation

use sinrmon_kpm::{Aggregator, Indication};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::tasks::{MonitorMessage, Task, TaskMessage};

/// Aggregation actor
pub struct MonitorTask {
    aggregator: Aggregator,
}

impl MonitorTask {
    /// Creates a monitor task around a configured aggregator.
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }

    /// Aggregation state
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Consumes the task, returning the aggregator.
    pub fn into_aggregator(self) -> Aggregator {
        self.aggregator
    }

    fn handle_indication(&mut self, indication: &Indication) {
        let summary = self.aggregator.process_indication(indication);
        debug!(
            "Indication at {}: serving={} neighbors={} skipped={} emitted={}",
            indication.collect_start_time,
            summary.serving_accepted,
            summary.neighbor_accepted,
            summary.records_skipped,
            summary.emitted.len()
        );
    }

    fn handle_message(&mut self, msg: MonitorMessage) {
        match msg {
            MonitorMessage::Indication(indication) => self.handle_indication(&indication),
            MonitorMessage::Stats { reply } => {
                if reply.send(self.aggregator.stats()).is_err() {
                    warn!("Stats requester went away before the reply");
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl Task for MonitorTask {
    type Message = MonitorMessage;

    async fn run(&mut self, mut rx: mpsc::Receiver<TaskMessage<Self::Message>>) {
        info!("Monitor task started");

        loop {
            match rx.recv().await {
                Some(TaskMessage::Message(msg)) => self.handle_message(msg),
                Some(TaskMessage::Shutdown) => {
                    info!("Monitor task received shutdown signal");
                    break;
                }
                None => {
                    info!("Monitor task channel closed");
                    break;
                }
            }
        }

        info!(
            "Monitor task stopped: {} UEs tracked, {}",
            self.aggregator.registry().len(),
            self.aggregator.stats()
        );
    }
}
