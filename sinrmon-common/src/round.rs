//! Logical reporting round counter
//!
//! A round is one reporting cycle synchronized across every tracked UE. Round
//! ids are dense and monotonically increasing, so downstream consumers can use
//! them as a join key independent of wall-clock skew between UE reports.

use serde::{Deserialize, Serialize};

/// Logical round identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct RoundId(u64);

impl RoundId {
    /// Creates a round id from a raw value
    pub const fn new(round: u64) -> Self {
        Self(round)
    }

    /// The first round (round 0)
    pub const fn initial() -> Self {
        Self(0)
    }

    /// Returns the raw round value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Advances to the next round
    pub fn advance(&mut self) {
        self.0 += 1;
    }

    /// Returns the following round without mutating
    pub fn next_round(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns true if this is the first round
    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Round({})", self.0)
    }
}

impl From<u64> for RoundId {
    fn from(round: u64) -> Self {
        Self::new(round)
    }
}

impl From<RoundId> for u64 {
    fn from(round: RoundId) -> u64 {
        round.0
    }
}
