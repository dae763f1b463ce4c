//! Bounded registry of per-UE buffers

use std::collections::{HashMap, HashSet};

use sinrmon_common::UeId;
use tracing::{info, warn};

use crate::window::UeBuffer;

/// Owns one [`UeBuffer`] per UE, up to a fixed number of UEs
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    buffers: HashMap<UeId, UeBuffer>,
    max_ues: usize,
    window_capacity: usize,
    neighbor_capacity: usize,
    rejected: HashSet<UeId>,
}

impl EntityRegistry {
    /// Creates an empty registry
    pub fn new(max_ues: usize, window_capacity: usize, neighbor_capacity: usize) -> Self {
        Self {
            buffers: HashMap::with_capacity(max_ues),
            max_ues,
            window_capacity,
            neighbor_capacity,
            rejected: HashSet::new(),
        }
    }

    /// Returns the buffer for `ue_id`, creating it if there is room.
    ///
    /// `None` once `max_ues` distinct UEs are tracked and `ue_id` is not
    /// one of them. The first rejection of each UE is logged.
    pub fn resolve(&mut self, ue_id: UeId) -> Option<&mut UeBuffer> {
        if !self.buffers.contains_key(&ue_id) {
            if self.buffers.len() >= self.max_ues {
                if self.rejected.insert(ue_id) {
                    warn!(
                        "UE {} dropped: registry full ({} UEs tracked)",
                        ue_id, self.max_ues
                    );
                }
                return None;
            }
            self.buffers.insert(
                ue_id,
                UeBuffer::new(ue_id, self.window_capacity, self.neighbor_capacity),
            );
            info!("New UE buffer created: UE {} (total: {})", ue_id, self.buffers.len());
        }
        self.buffers.get_mut(&ue_id)
    }

    /// Returns the buffer for `ue_id` without creating it
    pub fn get(&self, ue_id: UeId) -> Option<&UeBuffer> {
        self.buffers.get(&ue_id)
    }

    /// Number of tracked UEs
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Returns true if no UE is tracked
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Returns true if no further UE can be admitted
    pub fn is_full(&self) -> bool {
        self.buffers.len() >= self.max_ues
    }

    /// Configured maximum
    pub fn max_ues(&self) -> usize {
        self.max_ues
    }

    /// Tracked UE ids in ascending order
    pub fn ue_ids(&self) -> Vec<UeId> {
        let mut ids: Vec<UeId> = self.buffers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Distinct UEs turned away so far
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}
