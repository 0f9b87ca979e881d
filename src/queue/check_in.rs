//! Token issuance for arriving patients.

use tracing::debug;

use crate::protocol::{CheckIn, QueueDate, QueueError, Token, TokenStatus};

use super::engine::QueueEngine;
use super::types::now_ms;

impl QueueEngine {
    /// Check in a patient (appointment or walk-in) and issue a token.
    ///
    /// The record write and the waiting-index insert happen under one
    /// partition lock: a token is never queryable as waiting without being
    /// dispatchable, and vice versa. In durable mode only the appointment
    /// reservation is taken before the backend write; the token itself is
    /// published after the write confirms, so a concurrent `call_next` can
    /// never dispatch a token a failed write then erases. A failed write
    /// releases the reservation; the allocated number is simply a gap.
    ///
    /// Walk-in check-ins are not deduplicated - a caller that times out and
    /// blindly retries will issue a second token. Appointment check-ins
    /// dedup on `appointment_ref` while a non-terminal token exists.
    pub async fn check_in(&self, date: QueueDate, input: CheckIn) -> Result<Token, QueueError> {
        let part = self.partition(date);
        let (number, sequence) = part.allocator.next();

        let token = Token {
            number,
            sequence,
            channel: input.channel,
            patient_ref: input.patient_ref,
            patient_name: input.patient_name,
            appointment_ref: input.appointment_ref,
            chief_complaint: input.chief_complaint,
            status: TokenStatus::Waiting,
            checked_in_at: now_ms(),
            called_at: 0,
            completed_at: 0,
        };

        {
            let mut state = part.state.write();

            if let Some(ref apt) = token.appointment_ref {
                if let Some(&existing) = state.active_appointments.get(apt) {
                    // A reservation with no record belongs to a check-in
                    // whose durable write is still in flight; it counts
                    // as active.
                    let still_active = !state
                        .records
                        .get(&existing)
                        .is_some_and(|t| t.status.is_terminal());
                    if still_active {
                        return Err(QueueError::DuplicateAppointmentActive(apt.clone()));
                    }
                }
                state.active_appointments.insert(apt.clone(), number);
            }

            if !self.durable {
                state.records.insert(number, token.clone());
                state.waiting.insert(number, token.sort_key());
            }
        } // Lock released here before any await

        if self.durable {
            // Publish only after the backend confirms: until then the
            // token is invisible to dispatch and queries, so a failed
            // write has nothing to roll back beyond the reservation.
            if let Err(e) = self.persist_insert_sync(date, &token).await {
                let mut state = part.state.write();
                state.release_appointment(token.appointment_ref.as_ref(), number);
                return Err(QueueError::StorageUnavailable(e.to_string()));
            }
            let mut state = part.state.write();
            state.records.insert(number, token.clone());
            state.waiting.insert(number, token.sort_key());
        } else {
            self.persist_insert(date, &token);
        }

        self.metrics.record_check_in();
        if self.has_event_listeners() {
            self.broadcast_event("checked_in", date, token.clone(), input.actor.as_deref());
        }
        debug!(date = %date, token = number, channel = %token.channel, "Token issued");

        Ok(token)
    }
}
