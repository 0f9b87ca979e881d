//! Queue module - daily token issuance and dispatch.
//!
//! ## Module Organization
//!
//! - `engine.rs` - Core QueueEngine struct, partition handles, events
//! - `types/` - Partition, TokenAllocator, WaitingIndex, EngineMetrics
//! - `storage.rs` - Pluggable write-through persistence trait
//!
//! ### Operations
//!
//! - `check_in.rs` - Token issuance (appointments and walk-ins)
//! - `dispatch.rs` - call_next and the current-serving pointer
//! - `status.rs` - Status transitions (complete, skip)
//! - `query.rs` - Snapshot reads (get, today, summary)
//! - `persistence.rs` - Write-through helpers and startup recovery

mod engine;
pub mod storage;
pub mod types;

mod check_in;
mod dispatch;
mod persistence;
mod query;
mod status;

#[cfg(test)]
mod tests;

pub use engine::QueueEngine;
