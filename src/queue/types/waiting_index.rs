//! Ordered index of waiting tokens.
//!
//! Combines a BinaryHeap (ordered pop) with a HashMap (O(1) membership and
//! lazy removal). The heap stores lightweight entries only; stale entries
//! left behind by `remove` are skipped on the next pop.

use std::collections::{BinaryHeap, HashMap};

use crate::protocol::SortKey;

/// Lightweight heap entry with only ordering metadata.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    number: u64,
    key: SortKey,
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; invert so the lowest sort key
        // (appointment lane first, then arrival order) pops first.
        other.key.cmp(&self.key)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The set of tokens currently `WAITING`, ordered by `(priority, sequence)`.
pub struct WaitingIndex {
    heap: BinaryHeap<HeapEntry>,
    index: HashMap<u64, SortKey>,
}

impl WaitingIndex {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            index: HashMap::with_capacity(64),
        }
    }

    /// Add a token to the active set. Idempotent: re-inserting an already
    /// present number is a no-op.
    pub fn insert(&mut self, number: u64, key: SortKey) {
        if self.index.contains_key(&number) {
            return;
        }
        self.index.insert(number, key);
        self.heap.push(HeapEntry { number, key });
    }

    /// Remove and return the lowest-sort-key member.
    pub fn pop_head(&mut self) -> Option<u64> {
        while let Some(entry) = self.heap.pop() {
            // Skip entries whose number was lazily removed.
            if self.index.remove(&entry.number).is_some() {
                return Some(entry.number);
            }
        }
        None
    }

    /// Lowest-sort-key member without removing it.
    pub fn peek_head(&mut self) -> Option<u64> {
        while let Some(entry) = self.heap.peek() {
            if self.index.contains_key(&entry.number) {
                return Some(entry.number);
            }
            self.heap.pop();
        }
        None
    }

    /// Remove a token from the active set - O(1), lazy. No-op if absent.
    pub fn remove(&mut self, number: u64) -> bool {
        self.index.remove(&number).is_some()
    }

    #[inline]
    pub fn contains(&self, number: u64) -> bool {
        self.index.contains_key(&number)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All waiting numbers in dispatch order.
    pub fn iter_ordered(&self) -> Vec<u64> {
        let mut members: Vec<(SortKey, u64)> =
            self.index.iter().map(|(&n, &k)| (k, n)).collect();
        members.sort_unstable();
        members.into_iter().map(|(_, n)| n).collect()
    }
}

impl Default for WaitingIndex {
    fn default() -> Self {
        Self::new()
    }
}
