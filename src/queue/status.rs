//! Status transitions (complete, skip, manual call).

use tracing::debug;

use crate::protocol::{QueueDate, QueueError, Token, TokenStatus};

use super::engine::QueueEngine;
use super::types::now_ms;

impl QueueEngine {
    /// Apply a status transition to one token.
    ///
    /// Validates the edge against the state machine and stamps the matching
    /// timestamp. Tokens leaving `WAITING` drop out of the dispatch index;
    /// terminal transitions clear the current-serving pointer and free the
    /// appointment for a future check-in. Transitions are linearizable per
    /// token: of two concurrent racers exactly one succeeds, the loser sees
    /// `InvalidTransition` against the post-transition status.
    pub async fn set_status(
        &self,
        date: QueueDate,
        number: u64,
        target: TokenStatus,
        actor: Option<&str>,
    ) -> Result<Token, QueueError> {
        let Some(part) = self.partition_if_exists(date) else {
            return Err(QueueError::TokenNotFound(number));
        };
        let now = now_ms();

        // Rollback snapshot for durable mode.
        let before;
        let was_waiting;
        let prior_current;

        let token = {
            let mut state = part.state.write();

            let Some(existing) = state.records.get(&number) else {
                return Err(QueueError::TokenNotFound(number));
            };
            let from = existing.status;
            if !from.can_transition_to(target) {
                return Err(QueueError::InvalidTransition { from, to: target });
            }

            if target == TokenStatus::WithDoctor {
                // Manual call of a specific token honors the same
                // single-consultation-slot policy as call_next.
                if let Some(current) = state.current_serving {
                    let still_serving = current != number
                        && state
                            .records
                            .get(&current)
                            .is_some_and(|t| t.status == TokenStatus::WithDoctor);
                    if still_serving {
                        return Err(QueueError::AlreadyServing(current));
                    }
                }
            }

            before = existing.clone();
            was_waiting = state.waiting.contains(number);
            prior_current = state.current_serving;

            let Some(record) = state.records.get_mut(&number) else {
                return Err(QueueError::TokenNotFound(number));
            };
            record.status = target;
            match target {
                TokenStatus::WithDoctor => record.called_at = now,
                TokenStatus::Completed | TokenStatus::Skipped => record.completed_at = now,
                TokenStatus::Waiting => {}
            }
            let token = record.clone();

            // Leaving WAITING by any path removes the token from the
            // dispatch index.
            state.waiting.remove(number);

            if target == TokenStatus::WithDoctor {
                state.current_serving = Some(number);
            }
            if target.is_terminal() {
                if state.current_serving == Some(number) {
                    state.current_serving = None;
                }
                state.release_appointment(token.appointment_ref.as_ref(), number);
            }
            token
        }; // Lock released here before any await

        if self.durable {
            if let Err(e) = self.persist_update_sync(date, &token).await {
                // Revert only if the record is still exactly what this
                // transition wrote; a newer state that landed during the
                // stalled write stays intact.
                let mut state = part.state.write();
                if state.records.get(&number) == Some(&token) {
                    if was_waiting {
                        state.waiting.insert(number, before.sort_key());
                    }
                    if let Some(ref apt) = before.appointment_ref {
                        if !before.status.is_terminal() {
                            // A check-in that claimed the freed
                            // appointment meanwhile keeps its reservation.
                            state
                                .active_appointments
                                .entry(apt.clone())
                                .or_insert(number);
                        }
                    }
                    state.current_serving = prior_current;
                    state.records.insert(number, before);
                }
                return Err(QueueError::StorageUnavailable(e.to_string()));
            }
        } else {
            self.persist_update(date, &token);
        }

        let event_type = match target {
            TokenStatus::WithDoctor => {
                self.metrics
                    .record_dispatch(now.saturating_sub(token.checked_in_at));
                "called"
            }
            TokenStatus::Completed => {
                self.metrics.record_complete();
                "completed"
            }
            TokenStatus::Skipped => {
                self.metrics.record_skip();
                "skipped"
            }
            // No edge leads back into WAITING; the validation above
            // already rejected it.
            TokenStatus::Waiting => "waiting",
        };
        if self.has_event_listeners() {
            self.broadcast_event(event_type, date, token.clone(), actor);
        }
        debug!(date = %date, token = number, status = %target, "Token transitioned");

        Ok(token)
    }
}
