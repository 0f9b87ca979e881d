//! Core protocol types for clinicQ.
//!
//! Contains Token, its status/channel enums, request/snapshot structures,
//! and the public error taxonomy.

mod error;
mod types;

pub use error::QueueError;
pub use types::{
    Channel, CheckIn, QueueDate, QueueEvent, QueueSummary, SortKey, TodayQueue, Token, TokenStatus,
};
