//! Write-through helpers and startup recovery.

use std::sync::Arc;

use tracing::{error, info};

use crate::protocol::{QueueDate, Token, TokenStatus};

use super::engine::QueueEngine;
use super::storage::StorageError;

impl QueueEngine {
    /// Fire an async insert at the backend; failures are logged, never
    /// surfaced. Used when the engine is not in durable mode.
    pub(crate) fn persist_insert(&self, date: QueueDate, token: &Token) {
        let Some(storage) = self.storage.as_ref().map(Arc::clone) else {
            return;
        };
        let token = token.clone();
        tokio::spawn(async move {
            if let Err(e) = storage.insert_token(date, &token).await {
                error!(token = token.number, error = %e, "Failed to persist check-in");
            }
        });
    }

    /// Durable insert: awaited, error surfaced so the caller can roll back.
    pub(crate) async fn persist_insert_sync(
        &self,
        date: QueueDate,
        token: &Token,
    ) -> Result<(), StorageError> {
        match self.storage {
            Some(ref storage) => storage.insert_token(date, token).await,
            None => Ok(()),
        }
    }

    pub(crate) fn persist_update(&self, date: QueueDate, token: &Token) {
        let Some(storage) = self.storage.as_ref().map(Arc::clone) else {
            return;
        };
        let token = token.clone();
        tokio::spawn(async move {
            if let Err(e) = storage.update_token(date, &token).await {
                error!(token = token.number, error = %e, "Failed to persist transition");
            }
        });
    }

    pub(crate) async fn persist_update_sync(
        &self,
        date: QueueDate,
        token: &Token,
    ) -> Result<(), StorageError> {
        match self.storage {
            Some(ref storage) => storage.update_token(date, token).await,
            None => Ok(()),
        }
    }

    /// Connect the backend and rebuild in-memory state from it.
    ///
    /// Restores token records, the waiting index, the current-serving
    /// pointer, and the appointment dedup index, then advances the
    /// allocator past the highest recovered number so new issuance stays
    /// monotonic.
    pub async fn connect_storage(&self) -> Result<(), StorageError> {
        let Some(ref storage) = self.storage else {
            return Ok(());
        };
        storage.connect().await?;

        let mut recovered = 0usize;
        for date in storage.load_dates().await? {
            let tokens = storage.load_tokens(date).await?;
            if tokens.is_empty() {
                continue;
            }

            let part = self.partition(date);
            let mut max_number = 0u64;
            let mut max_sequence = 0u64;
            {
                let mut state = part.state.write();
                for token in tokens {
                    max_number = max_number.max(token.number);
                    max_sequence = max_sequence.max(token.sequence);

                    match token.status {
                        TokenStatus::Waiting => {
                            state.waiting.insert(token.number, token.sort_key());
                        }
                        TokenStatus::WithDoctor => {
                            state.current_serving = Some(token.number);
                        }
                        TokenStatus::Completed | TokenStatus::Skipped => {}
                    }
                    if !token.status.is_terminal() {
                        if let Some(ref apt) = token.appointment_ref {
                            state.active_appointments.insert(apt.clone(), token.number);
                        }
                    }
                    recovered += 1;
                    state.records.insert(token.number, token);
                }
            }
            part.allocator.advance_past(max_number, max_sequence);
        }

        if recovered > 0 {
            info!(count = recovered, backend = %storage.name(), "Recovered tokens from storage");
        }
        Ok(())
    }
}
