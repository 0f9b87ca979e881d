//! Queue engine test suite.

mod core;
mod priority;

use std::sync::Arc;

use crate::protocol::{Channel, CheckIn, QueueDate, QueueError, Token, TokenStatus};

use super::QueueEngine;

fn setup() -> Arc<QueueEngine> {
    QueueEngine::new()
}

fn day() -> QueueDate {
    QueueDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn appointment(patient: &str, appointment_ref: &str) -> CheckIn {
    CheckIn {
        channel: Channel::Appointment,
        patient_ref: patient.to_string(),
        appointment_ref: Some(appointment_ref.to_string()),
        ..Default::default()
    }
}

fn walk_in(patient: &str) -> CheckIn {
    CheckIn {
        channel: Channel::WalkIn,
        patient_ref: patient.to_string(),
        ..Default::default()
    }
}

/// Dispatch the head token and immediately complete its consultation,
/// freeing the serving slot for the next call.
async fn serve_one(engine: &QueueEngine, date: QueueDate) -> Option<Token> {
    let token = engine.call_next(date, None).await.unwrap()?;
    engine
        .set_status(date, token.number, TokenStatus::Completed, None)
        .await
        .unwrap();
    Some(token)
}
