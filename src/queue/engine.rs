//! Core QueueEngine struct and constructors.
//!
//! The engine is in-memory-authoritative: every operation coordinates
//! through the partition's atomic counters and its state lock, never through
//! caller-side locking. An optional storage backend receives write-through
//! copies of every mutation.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::info;

use crate::protocol::{QueueDate, QueueEvent, Token};

use super::storage::Storage;
use super::types::{now_ms, EngineMetrics, Partition};

pub struct QueueEngine {
    /// One partition per calendar date, created implicitly on first check-in.
    pub(crate) partitions: DashMap<QueueDate, Arc<Partition>>,
    pub(crate) storage: Option<Arc<dyn Storage>>,
    /// When true, mutations await the storage write and roll back on failure.
    pub(crate) durable: bool,
    pub(crate) metrics: EngineMetrics,
    pub(crate) event_tx: broadcast::Sender<QueueEvent>,
}

impl QueueEngine {
    /// Create an in-memory engine without persistence.
    pub fn new() -> Arc<Self> {
        Self::create(None, false)
    }

    /// Create with a storage backend.
    ///
    /// `durable` selects synchronous write-through: mutations fail with
    /// `StorageUnavailable` (and roll back) when the backend is down.
    /// Otherwise writes are fired asynchronously and logged on failure.
    pub fn with_storage(storage: Arc<dyn Storage>, durable: bool) -> Arc<Self> {
        Self::create(Some(storage), durable)
    }

    fn create(storage: Option<Arc<dyn Storage>>, durable: bool) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(1024);

        if let Some(ref s) = storage {
            info!(backend = %s.name(), durable, "Persistence enabled");
        }

        Arc::new(Self {
            partitions: DashMap::new(),
            storage,
            durable,
            metrics: EngineMetrics::new(),
            event_tx,
        })
    }

    /// Get or create the partition for a date.
    pub(crate) fn partition(&self, date: QueueDate) -> Arc<Partition> {
        if let Some(existing) = self.partitions.get(&date) {
            return Arc::clone(&existing);
        }
        let entry = self.partitions.entry(date).or_insert_with(|| {
            info!(date = %date, "Opened queue partition");
            Arc::new(Partition::new())
        });
        Arc::clone(&entry)
    }

    /// Partition for a date, without creating one. Read paths use this so
    /// that polling an idle day never allocates state.
    pub(crate) fn partition_if_exists(&self, date: QueueDate) -> Option<Arc<Partition>> {
        self.partitions.get(&date).map(|p| Arc::clone(&p))
    }

    /// Subscribe to audit events (check-ins, dispatches, terminal
    /// transitions). Slow subscribers lag and drop, never block the queue.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.event_tx.subscribe()
    }

    #[inline]
    pub(crate) fn has_event_listeners(&self) -> bool {
        self.event_tx.receiver_count() > 0
    }

    pub(crate) fn broadcast_event(
        &self,
        event_type: &str,
        date: QueueDate,
        token: Token,
        actor: Option<&str>,
    ) {
        // Fire-and-forget: a failed notify must never roll back the
        // queue operation.
        let _ = self.event_tx.send(QueueEvent {
            event_type: event_type.to_string(),
            date,
            token,
            actor: actor.map(str::to_string),
            timestamp: now_ms(),
        });
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }
}
