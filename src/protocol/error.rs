//! Public error taxonomy.
//!
//! Every error is scoped to a single operation on a single partition/token;
//! nothing here is fatal to the process. The engine never retries internally:
//! `call_next`/`set_status`/reads are safe for the caller to retry with
//! backoff, walk-in check-ins are not (a blind retry issues a second token).

use thiserror::Error;

use super::types::TokenStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Underlying store unreachable. Transient; the operation was rolled
    /// back and left no partial state.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The appointment already has a non-terminal token today. Caller error,
    /// do not retry.
    #[error("appointment '{0}' already has an active token")]
    DuplicateAppointmentActive(String),

    /// The requested edge is not legal, or a concurrent transition won the
    /// race. Re-fetch the token before deciding the next action.
    #[error("invalid transition {from} -> {to}")]
    InvalidTransition { from: TokenStatus, to: TokenStatus },

    /// Stale token reference.
    #[error("token {0} not found in partition")]
    TokenNotFound(u64),

    /// The current-serving token has not reached a terminal status yet
    /// (single-consultation-slot policy).
    #[error("token {0} is still with the doctor")]
    AlreadyServing(u64),
}
