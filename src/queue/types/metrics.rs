//! Global metrics with atomic counters for O(1) stats queries.
//!
//! Counts across all partitions, updated on check-in/dispatch/terminal
//! transitions so status boards never have to iterate token records.

use std::sync::atomic::{AtomicU64, Ordering};

pub struct EngineMetrics {
    pub total_checked_in: AtomicU64,
    pub total_dispatched: AtomicU64,
    pub total_completed: AtomicU64,
    pub total_skipped: AtomicU64,
    pub wait_ms_sum: AtomicU64,
    pub wait_ms_count: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self {
            total_checked_in: AtomicU64::new(0),
            total_dispatched: AtomicU64::new(0),
            total_completed: AtomicU64::new(0),
            total_skipped: AtomicU64::new(0),
            wait_ms_sum: AtomicU64::new(0),
            wait_ms_count: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub fn record_check_in(&self) {
        self.total_checked_in.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_dispatch(&self, wait_ms: u64) {
        self.total_dispatched.fetch_add(1, Ordering::Relaxed);
        self.wait_ms_sum.fetch_add(wait_ms, Ordering::Relaxed);
        self.wait_ms_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_complete(&self) {
        self.total_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_skip(&self) {
        self.total_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// (checked_in, dispatched, completed, skipped)
    pub fn snapshot(&self) -> (u64, u64, u64, u64) {
        (
            self.total_checked_in.load(Ordering::Relaxed),
            self.total_dispatched.load(Ordering::Relaxed),
            self.total_completed.load(Ordering::Relaxed),
            self.total_skipped.load(Ordering::Relaxed),
        )
    }

    /// Mean wait before dispatch across all partitions since startup.
    pub fn average_wait_ms(&self) -> Option<u64> {
        let count = self.wait_ms_count.load(Ordering::Relaxed);
        if count == 0 {
            return None;
        }
        Some(self.wait_ms_sum.load(Ordering::Relaxed) / count)
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
