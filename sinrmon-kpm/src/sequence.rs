//! Burst-synchronized round assignment
//!
//! Reports for the UEs of one physical round arrive in arbitrary order and
//! carry no mutually comparable timestamps. The synchronizer hands every UE
//! the current round id on its first report in a round and advances the
//! round once `population` distinct UEs have reported.

use std::collections::HashSet;

use sinrmon_common::{RoundId, UeId};
use tracing::debug;

/// Assigns shared logical round ids across a known UE population
#[derive(Debug, Clone)]
pub struct SequenceSynchronizer {
    population: usize,
    current: RoundId,
    assigned: HashSet<UeId>,
}

impl SequenceSynchronizer {
    /// Creates a synchronizer starting at round 0. A zero population is raised to one.
    pub fn new(population: usize) -> Self {
        let population = population.max(1);
        Self {
            population,
            current: RoundId::initial(),
            assigned: HashSet::with_capacity(population),
        }
    }

    /// Returns the round id for `ue_id`.
    ///
    /// Repeated calls within a round return the same id without counting the
    /// UE again. The UE completing a round receives that round's id; the
    /// round advances afterwards.
    pub fn assign(&mut self, ue_id: UeId) -> RoundId {
        if self.assigned.contains(&ue_id) {
            return self.current;
        }

        let round = self.current;
        self.assigned.insert(ue_id);

        if self.assigned.len() >= self.population {
            debug!(
                "Round complete ({} UEs), advancing {} -> {}",
                self.assigned.len(),
                round,
                round.next_round()
            );
            self.current.advance();
            self.assigned.clear();
        }

        round
    }

    /// Round currently being filled
    pub fn current_round(&self) -> RoundId {
        self.current
    }

    /// Distinct UEs assigned in the current round
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    /// Returns true if `ue_id` already has an assignment in the current round
    pub fn is_assigned(&self, ue_id: UeId) -> bool {
        self.assigned.contains(&ue_id)
    }

    /// UEs required to complete a round
    pub fn population(&self) -> usize {
        self.population
    }
}
