//! Multi-UE Scenario Tests
//!
//! Validates behavior with many UEs reporting through the same aggregator:
//! - Shared round ids across a full UE population
//! - Round completion when a round spans several indications
//! - Registry capacity limits
//! - Serving cell changes
//! - Concurrent delivery through the shared aggregator

use integration_tests::{
    init_test_logging, test_monitor_config, CollectingSink, IndicationBuilder, UE_REPORT_CELLS,
};
use sinrmon_common::{RoundId, UeId};
use sinrmon_kpm::{Indication, OutputRecord, SharedAggregator};
use sinrmon_xapp::build_aggregator;

const POPULATION: usize = 28;

/// One indication carrying a serving and neighbor report for every UE in `ues`.
fn population_indication(round: u64, ues: &[UeId]) -> Indication {
    let mut builder = IndicationBuilder::new(round);
    for &ue in ues {
        let neighbors: Vec<(u16, f64)> = UE_REPORT_CELLS
            .iter()
            .take(4)
            .enumerate()
            .map(|(i, &cell)| (cell, f64::from(ue) + i as f64))
            .collect();
        builder = builder
            .serving(ue, 2, 20.0 + f64::from(ue))
            .neighbors(ue, 2, &neighbors);
    }
    builder.build()
}

#[test]
fn test_full_population_shares_round_ids() {
    init_test_logging();
    let ues: Vec<UeId> = (1..=POPULATION as UeId).collect();
    let (sink, lines) = CollectingSink::new();
    let mut aggregator = build_aggregator(&test_monitor_config(POPULATION), Vec::new());
    aggregator.add_sink(Box::new(sink));

    for round in 0..8u64 {
        let summary = aggregator.process_indication(&population_indication(round, &ues));
        assert_eq!(aggregator.sequencer().current_round(), RoundId::new(round + 1));

        if round < 5 {
            assert!(summary.emitted.is_empty(), "round {round} emitted too early");
            continue;
        }
        assert_eq!(summary.emitted.len(), POPULATION);
        assert!(summary
            .emitted
            .iter()
            .all(|record| record.round_id == RoundId::new(round)));
    }

    assert_eq!(lines.len(), 3 * POPULATION);
    let first: OutputRecord = lines.snapshot()[0].trim_end().parse().unwrap();
    assert_eq!(first.ue_id, 1);
    // Neighbors 3, 4, 5, 6 at ue+0 .. ue+3 dB: the strongest three, descending.
    assert_eq!(first.neighbor_sinr_ma, vec![4.0, 3.0, 2.0]);
    assert!((first.serving_sinr_ma - 21.0).abs() < 1e-9);
}

#[test]
fn test_round_spanning_indications() {
    let mut aggregator = build_aggregator(&test_monitor_config(3), Vec::new());

    // Round 0: UE 1 twice, UE 2, then UE 3 completes it in a second indication.
    aggregator.process_indication(
        &IndicationBuilder::new(0)
            .serving(1, 2, 10.0)
            .serving(2, 2, 10.0)
            .serving(1, 2, 11.0)
            .build(),
    );
    assert_eq!(aggregator.sequencer().current_round(), RoundId::new(0));
    assert_eq!(aggregator.sequencer().assigned_count(), 2);

    aggregator.process_indication(
        &IndicationBuilder::new(1)
            .serving(3, 2, 10.0)
            .serving(1, 2, 12.0)
            .build(),
    );
    assert_eq!(aggregator.sequencer().current_round(), RoundId::new(1));

    let rounds = |ue: UeId| -> Vec<u64> {
        aggregator
            .registry()
            .get(ue)
            .map(|buffer| buffer.slots().map(|slot| slot.round_id.value()).collect())
            .unwrap_or_default()
    };
    assert_eq!(rounds(1), vec![0, 0, 1]);
    assert_eq!(rounds(2), vec![0]);
    assert_eq!(rounds(3), vec![0]);
}

#[test]
fn test_registry_capacity_drops_extra_ues() {
    let ues: Vec<UeId> = (1..=30).collect();
    let mut aggregator = build_aggregator(&test_monitor_config(POPULATION), Vec::new());

    let summary = aggregator.process_indication(&population_indication(0, &ues));
    assert_eq!(summary.serving_accepted, POPULATION);
    assert_eq!(aggregator.registry().len(), POPULATION);
    assert!(aggregator.registry().get(29).is_none());
    assert!(aggregator.registry().get(30).is_none());
    assert_eq!(aggregator.registry().rejected_count(), 2);

    // Two serving and two neighbor records dropped.
    assert_eq!(aggregator.stats().capacity_drops, 4);
    // The dropped UEs do not count toward the round.
    assert_eq!(aggregator.sequencer().current_round(), RoundId::new(1));
}

#[test]
fn test_serving_cell_change() {
    let mut aggregator = build_aggregator(&test_monitor_config(1), Vec::new());
    let neighbors = [(3, 10.0), (4, 6.0), (5, 5.0), (6, 4.0)];

    let mut last = None;
    for round in 0..6 {
        let summary = aggregator.process_indication(
            &IndicationBuilder::new(round)
                .serving(9, 2, 20.0)
                .neighbors(9, 2, &neighbors)
                .build(),
        );
        last = summary.emitted.last().cloned().or(last);
    }
    let before = last.expect("emission on cell 2");
    assert_eq!((before.serving_x, before.serving_y), (800.0, 800.0));
    assert_eq!(before.neighbor_sinr_ma, vec![10.0, 6.0, 5.0]);

    // Handover to cell 3: its history as a neighbor no longer ranks.
    let summary = aggregator.process_indication(
        &IndicationBuilder::new(6)
            .serving(9, 3, 20.0)
            .neighbors(9, 3, &[(2, 8.0), (4, 6.0), (5, 5.0), (6, 4.0)])
            .build(),
    );
    let after = summary.emitted.last().expect("emission on cell 3");
    assert_eq!((after.serving_x, after.serving_y), (1300.0, 800.0));
    assert_eq!(after.neighbor_sinr_ma, vec![6.0, 5.0, 4.0]);
    assert!((after.serving_sinr_ma - 20.0).abs() < 1e-9);
}

#[test]
fn test_shared_aggregator_concurrent_delivery() {
    let ues: Vec<UeId> = (1..=8).collect();
    let shared = SharedAggregator::new(build_aggregator(&test_monitor_config(8), Vec::new()));

    let handles: Vec<_> = ues
        .chunks(2)
        .map(|group| {
            let shared = shared.clone();
            let group = group.to_vec();
            std::thread::spawn(move || {
                for round in 0..10 {
                    shared.on_indication(&population_indication(round, &group));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = shared.stats();
    assert_eq!(stats.indications, 40);
    assert_eq!(stats.serving_samples, 80);
    assert_eq!(stats.neighbor_samples, 320);
    shared.with(|aggregator| {
        assert_eq!(aggregator.registry().ue_ids(), ues);
        for &ue in &ues {
            assert_eq!(aggregator.registry().get(ue).map(|b| b.filled()), Some(10));
        }
    });
}
