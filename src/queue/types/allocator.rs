//! Atomic token number and sequence allocation.
//!
//! One allocator per partition. Numbers start at 1 and are never reused
//! within a day, even when a check-in later fails and its record is rolled
//! back - gaps in the issued range are acceptable by design.

use std::sync::atomic::{AtomicU64, Ordering};

pub struct TokenAllocator {
    number: AtomicU64,
    sequence: AtomicU64,
}

impl TokenAllocator {
    pub fn new() -> Self {
        Self {
            number: AtomicU64::new(0),
            sequence: AtomicU64::new(0),
        }
    }

    /// Atomically issue the next `(number, sequence)` pair.
    ///
    /// No two callers ever receive the same number, regardless of how many
    /// terminals check patients in concurrently.
    #[inline]
    pub fn next(&self) -> (u64, u64) {
        let number = self.number.fetch_add(1, Ordering::Relaxed) + 1;
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        (number, sequence)
    }

    /// Numbers issued so far (including any rolled-back gaps).
    #[inline]
    pub fn issued(&self) -> u64 {
        self.number.load(Ordering::Relaxed)
    }

    /// Move both counters past recovered values so freshly issued numbers
    /// stay monotonic after a restart.
    pub fn advance_past(&self, number: u64, sequence: u64) {
        self.number.fetch_max(number, Ordering::Relaxed);
        self.sequence.fetch_max(sequence, Ordering::Relaxed);
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new()
    }
}
