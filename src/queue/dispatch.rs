//! call_next and the current-serving pointer.

use tracing::debug;

use crate::protocol::{QueueDate, QueueError, Token, TokenStatus};

use super::engine::QueueEngine;
use super::types::now_ms;

impl QueueEngine {
    /// Dispatch the next waiting token to a doctor station.
    ///
    /// Pops the head of the waiting index (appointments before walk-ins,
    /// FIFO within a lane), transitions it to `WITH_DOCTOR`, and points the
    /// current-serving marker at it - all under the partition lock, so
    /// concurrent callers never receive the same token. An empty queue is
    /// `Ok(None)`, not an error: an idle doctor station is normal.
    ///
    /// Fails with `AlreadyServing` while the previously dispatched token
    /// has not reached a terminal status (one consultation slot per day).
    pub async fn call_next(
        &self,
        date: QueueDate,
        actor: Option<&str>,
    ) -> Result<Option<Token>, QueueError> {
        let Some(part) = self.partition_if_exists(date) else {
            return Ok(None);
        };
        let now = now_ms();

        let token = {
            let mut state = part.state.write();

            if let Some(current) = state.current_serving {
                let still_serving = state
                    .records
                    .get(&current)
                    .is_some_and(|t| t.status == TokenStatus::WithDoctor);
                if still_serving {
                    return Err(QueueError::AlreadyServing(current));
                }
                // Stale pointer (token already terminal), clear and proceed.
                state.current_serving = None;
            }

            let Some(number) = state.waiting.pop_head() else {
                return Ok(None);
            };

            let Some(record) = state.records.get_mut(&number) else {
                // Index invariant: every waiting number has a record.
                return Err(QueueError::TokenNotFound(number));
            };
            record.status = TokenStatus::WithDoctor;
            record.called_at = now;
            let token = record.clone();
            state.current_serving = Some(number);
            token
        }; // Lock released here before any await

        if self.durable {
            if let Err(e) = self.persist_update_sync(date, &token).await {
                // Revert only if the record is still exactly what this
                // call wrote. A transition that landed during the stalled
                // write (a completed consultation, say) stays intact;
                // resurrecting it to WAITING would re-dispatch it.
                let mut state = part.state.write();
                if state.records.get(&token.number) == Some(&token) {
                    if let Some(record) = state.records.get_mut(&token.number) {
                        record.status = TokenStatus::Waiting;
                        record.called_at = 0;
                    }
                    state.waiting.insert(token.number, token.sort_key());
                    if state.current_serving == Some(token.number) {
                        state.current_serving = None;
                    }
                }
                return Err(QueueError::StorageUnavailable(e.to_string()));
            }
        } else {
            self.persist_update(date, &token);
        }

        self.metrics
            .record_dispatch(now.saturating_sub(token.checked_in_at));
        if self.has_event_listeners() {
            self.broadcast_event("called", date, token.clone(), actor);
        }
        debug!(date = %date, token = token.number, "Token called for consultation");

        Ok(Some(token))
    }

    /// The token currently being attended, if any. Read-only, used by the
    /// display/status-board interface.
    pub fn current_serving(&self, date: QueueDate) -> Option<Token> {
        let part = self.partition_if_exists(date)?;
        let state = part.state.read();
        let number = state.current_serving?;
        state.records.get(&number).cloned()
    }
}
