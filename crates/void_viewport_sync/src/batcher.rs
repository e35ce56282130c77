//! Debounce batcher.
//!
//! Coalesces rapid successive updates per target viewport. Each viewport
//! owns one timer slot: arming a new timer hands back the previous handle so
//! the caller can cancel it (trailing-edge coalescing). The batcher is
//! generic over the timer handle so the bookkeeping stays independent of the
//! event loop that actually fires the timers.

use std::collections::HashMap;

use void_camera::CameraDelta;

use crate::viewport::ViewportId;

/// Pending updates and their timer handles, keyed by target viewport
pub struct DebounceBatcher<H> {
    batches: HashMap<ViewportId, CameraDelta>,
    timers: HashMap<ViewportId, H>,
    coalesced: u64,
}

impl<H> DebounceBatcher<H> {
    pub fn new() -> Self {
        Self {
            batches: HashMap::new(),
            timers: HashMap::new(),
            coalesced: 0,
        }
    }

    /// Merge `partial` into the target's batch (last write wins per field)
    /// and detach its pending timer, which the caller must cancel.
    pub fn stage(&mut self, target_id: &str, partial: &CameraDelta) -> Option<H> {
        match self.batches.get_mut(target_id) {
            Some(batch) => {
                batch.merge(partial);
                self.coalesced += 1;
            }
            None => {
                self.batches.insert(ViewportId::from(target_id), partial.clone());
            }
        }
        self.timers.remove(target_id)
    }

    /// Record the timer that will flush the target's batch
    pub fn arm(&mut self, target_id: &str, handle: H) -> Option<H> {
        self.timers.insert(ViewportId::from(target_id), handle)
    }

    /// Detach the target's timer without touching its batch
    pub fn disarm(&mut self, target_id: &str) -> Option<H> {
        self.timers.remove(target_id)
    }

    /// Remove and return the target's batch
    pub fn take_batch(&mut self, target_id: &str) -> Option<CameraDelta> {
        self.batches.remove(target_id)
    }

    /// Drop the target's batch and detach its timer
    pub fn purge(&mut self, target_id: &str) -> Option<H> {
        self.batches.remove(target_id);
        self.timers.remove(target_id)
    }

    /// Drop every batch and detach every timer
    pub fn drain(&mut self) -> Vec<H> {
        self.batches.clear();
        self.timers.drain().map(|(_, handle)| handle).collect()
    }

    /// The batch waiting for a target, if any
    pub fn pending(&self, target_id: &str) -> Option<&CameraDelta> {
        self.batches.get(target_id)
    }

    /// Ids with a pending batch
    pub fn pending_ids(&self) -> Vec<ViewportId> {
        self.batches.keys().cloned().collect()
    }

    pub fn has_timer(&self, target_id: &str) -> bool {
        self.timers.contains_key(target_id)
    }

    /// Number of targets with a pending batch
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Updates merged into an already pending batch
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }
}

impl<H> Default for DebounceBatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}
