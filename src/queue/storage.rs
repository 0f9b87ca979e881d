//! Pluggable write-through persistence.
//!
//! The engine stays authoritative in memory; a backend receives a copy of
//! every token mutation and can hand the state back after a restart. The
//! audit/analytics sink is a separate collaborator (the event broadcast) -
//! this trait is only for queue-state durability.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{QueueDate, Token};

#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend unreachable or the write was rejected.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Common storage interface.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Connect to the backend. Called once before recovery.
    async fn connect(&self) -> Result<(), StorageError>;

    /// Persist a freshly issued token.
    async fn insert_token(&self, date: QueueDate, token: &Token) -> Result<(), StorageError>;

    /// Persist a status transition (the full updated record).
    async fn update_token(&self, date: QueueDate, token: &Token) -> Result<(), StorageError>;

    /// Dates with persisted state, for startup recovery.
    async fn load_dates(&self) -> Result<Vec<QueueDate>, StorageError>;

    /// Every token persisted for a date, in any order.
    async fn load_tokens(&self, date: QueueDate) -> Result<Vec<Token>, StorageError>;
}
