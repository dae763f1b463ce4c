//! Aggregator and sink construction from configuration

use sinrmon_common::MonitorConfig;
use sinrmon_kpm::{Aggregator, CellTopology, RecordSink, SinkError};
use tracing::{info, warn};

use crate::sink::{FileSink, SocketSink};

/// Builds the configured sinks.
///
/// The file sink is required once configured: failing to create it is an
/// error. The socket sink is optional; when its listener cannot be reached
/// the monitor continues without it.
pub async fn build_sinks(
    config: &MonitorConfig,
    disable_socket: bool,
) -> Result<Vec<Box<dyn RecordSink>>, SinkError> {
    let published = config.aggregation.published_neighbors;
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    if let Some(file) = &config.sinks.file {
        sinks.push(Box::new(FileSink::create(&file.path, published)?));
    }

    match &config.sinks.socket {
        Some(_) if disable_socket => info!("Socket sink disabled"),
        Some(socket) => match SocketSink::connect(socket).await {
            Ok(sink) => sinks.push(Box::new(sink)),
            Err(e) => warn!("Socket sink unavailable, continuing without it: {}", e),
        },
        None => {}
    }

    if sinks.is_empty() {
        warn!("No output sinks configured; records will only be counted");
    }

    Ok(sinks)
}

/// Builds an aggregator for the configured topology and attaches `sinks`.
pub fn build_aggregator(config: &MonitorConfig, sinks: Vec<Box<dyn RecordSink>>) -> Aggregator {
    let topology = CellTopology::new(config.topology_cells());
    let mut aggregator = Aggregator::new(&config.aggregation, topology);
    for sink in sinks {
        aggregator.add_sink(sink);
    }
    info!(
        "Aggregator ready: window={}, max_ues={}, round_population={}, cells={}, sinks={:?}",
        config.aggregation.window_capacity,
        config.aggregation.max_ues,
        config.aggregation.effective_round_population(),
        aggregator.topology().len(),
        aggregator.emitter().sink_names()
    );
    aggregator
}
