//! One calendar day's queue state.
//!
//! The allocator is lock-free; everything else (records, waiting index,
//! appointment dedup index, current-serving pointer) lives behind a single
//! RwLock so that multi-structure mutations appear atomic to readers.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::protocol::Token;

use super::{TokenAllocator, WaitingIndex};

pub struct PartitionState {
    /// Tokens currently `WAITING`, in dispatch order.
    pub waiting: WaitingIndex,
    /// Every token issued today, keyed by number. Records are never deleted
    /// during the day; terminal tokens stay for snapshot/summary queries.
    pub records: HashMap<u64, Token>,
    /// appointment_ref -> token number, for non-terminal tokens only.
    pub active_appointments: HashMap<String, u64>,
    /// Token currently being attended, if any. At most one per partition.
    pub current_serving: Option<u64>,
}

impl PartitionState {
    pub fn new() -> Self {
        Self {
            waiting: WaitingIndex::new(),
            records: HashMap::with_capacity(128),
            active_appointments: HashMap::with_capacity(64),
            current_serving: None,
        }
    }

    /// Drop the dedup entry for an appointment, but only if it still points
    /// at the given token.
    pub fn release_appointment(&mut self, appointment_ref: Option<&String>, number: u64) {
        if let Some(apt) = appointment_ref {
            if self.active_appointments.get(apt) == Some(&number) {
                self.active_appointments.remove(apt);
            }
        }
    }
}

impl Default for PartitionState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Partition {
    pub allocator: TokenAllocator,
    pub state: RwLock<PartitionState>,
}

impl Partition {
    pub fn new() -> Self {
        Self {
            allocator: TokenAllocator::new(),
            state: RwLock::new(PartitionState::new()),
        }
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::new()
    }
}
