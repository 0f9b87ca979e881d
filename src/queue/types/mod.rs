//! Type definitions for the clinicQ engine.
//!
//! Module organization:
//! - `allocator.rs` - atomic per-day token number / sequence counters
//! - `waiting_index.rs` - ordered index of waiting tokens (pop-min dispatch)
//! - `partition.rs` - one calendar day's queue state
//! - `metrics.rs` - global atomic metrics
//! - `time.rs` - timestamp helper

mod allocator;
mod metrics;
mod partition;
mod time;
mod waiting_index;

pub use allocator::TokenAllocator;
pub use metrics::EngineMetrics;
pub use partition::{Partition, PartitionState};
pub use time::now_ms;
pub use waiting_index::WaitingIndex;
