//! Core check-in, lifecycle, and snapshot tests.

use super::*;

#[tokio::test]
async fn test_check_in_issues_token() {
    let engine = setup();

    let token = engine.check_in(day(), walk_in("p-1")).await.unwrap();

    assert_eq!(token.number, 1);
    assert_eq!(token.sequence, 1);
    assert_eq!(token.status, TokenStatus::Waiting);
    assert_eq!(token.channel, Channel::WalkIn);
    assert!(token.checked_in_at > 0);
    assert_eq!(token.called_at, 0);
    assert_eq!(token.completed_at, 0);
}

#[tokio::test]
async fn test_numbers_increase_within_day() {
    let engine = setup();

    let t1 = engine.check_in(day(), walk_in("p-1")).await.unwrap();
    let t2 = engine.check_in(day(), walk_in("p-2")).await.unwrap();
    let t3 = engine.check_in(day(), walk_in("p-3")).await.unwrap();

    assert_eq!((t1.number, t2.number, t3.number), (1, 2, 3));
}

#[tokio::test]
async fn test_get_round_trip() {
    let engine = setup();

    let issued = engine.check_in(day(), walk_in("p-1")).await.unwrap();
    let fetched = engine.get(day(), issued.number).unwrap();

    assert_eq!(fetched.number, issued.number);
    assert_eq!(fetched.patient_ref, "p-1");
    assert_eq!(fetched.status, TokenStatus::Waiting);
}

#[tokio::test]
async fn test_get_unknown_token() {
    let engine = setup();
    engine.check_in(day(), walk_in("p-1")).await.unwrap();

    assert_eq!(engine.get(day(), 99), Err(QueueError::TokenNotFound(99)));
}

#[tokio::test]
async fn test_call_next_empty_partition_is_not_an_error() {
    let engine = setup();

    assert_eq!(engine.call_next(day(), None).await, Ok(None));
}

#[tokio::test]
async fn test_full_lifecycle() {
    let engine = setup();
    let date = day();

    let issued = engine.check_in(date, walk_in("p-1")).await.unwrap();
    assert_eq!(engine.today(date).waiting.len(), 1);

    let called = engine.call_next(date, None).await.unwrap().unwrap();
    assert_eq!(called.number, issued.number);
    assert_eq!(called.status, TokenStatus::WithDoctor);
    assert!(called.called_at > 0);

    let current = engine.current_serving(date).unwrap();
    assert_eq!(current.number, issued.number);
    assert_eq!(engine.today(date).with_doctor.len(), 1);
    assert!(engine.today(date).waiting.is_empty());

    let done = engine
        .set_status(date, issued.number, TokenStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(done.status, TokenStatus::Completed);
    assert!(done.completed_at > 0);

    let snapshot = engine.today(date);
    assert!(snapshot.waiting.is_empty());
    assert!(snapshot.with_doctor.is_empty());
    assert_eq!(snapshot.completed.len(), 1);
    assert!(engine.current_serving(date).is_none());
}

#[tokio::test]
async fn test_duplicate_appointment_rejected_while_active() {
    let engine = setup();
    let date = day();

    let first = engine
        .check_in(date, appointment("p-1", "apt-42"))
        .await
        .unwrap();

    let err = engine
        .check_in(date, appointment("p-1", "apt-42"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        QueueError::DuplicateAppointmentActive("apt-42".to_string())
    );

    // Still rejected while the first token is with the doctor.
    engine.call_next(date, None).await.unwrap();
    let err = engine
        .check_in(date, appointment("p-1", "apt-42"))
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::DuplicateAppointmentActive(_)));

    // After the first reaches a terminal status the reference is free again.
    engine
        .set_status(date, first.number, TokenStatus::Completed, None)
        .await
        .unwrap();
    let again = engine
        .check_in(date, appointment("p-1", "apt-42"))
        .await
        .unwrap();
    assert!(again.number > first.number);
}

#[tokio::test]
async fn test_partitions_never_mix_across_days() {
    let engine = setup();
    let monday = QueueDate::from_ymd_opt(2025, 3, 10).unwrap();
    let tuesday = QueueDate::from_ymd_opt(2025, 3, 11).unwrap();

    engine.check_in(monday, walk_in("p-1")).await.unwrap();
    engine.check_in(monday, walk_in("p-2")).await.unwrap();
    let t = engine.check_in(tuesday, walk_in("p-3")).await.unwrap();

    // Numbering restarts per day.
    assert_eq!(t.number, 1);
    assert_eq!(engine.today(monday).waiting.len(), 2);
    assert_eq!(engine.today(tuesday).waiting.len(), 1);

    // Dispatch on one day leaves the other untouched.
    engine.call_next(tuesday, None).await.unwrap();
    assert_eq!(engine.today(monday).waiting.len(), 2);
}

#[tokio::test]
async fn test_list_by_status() {
    let engine = setup();
    let date = day();

    engine.check_in(date, walk_in("p-1")).await.unwrap();
    engine
        .check_in(date, appointment("p-2", "apt-1"))
        .await
        .unwrap();
    engine.check_in(date, walk_in("p-3")).await.unwrap();

    let waiting = engine.list_by_status(date, TokenStatus::Waiting);
    // Dispatch order: the appointment token ahead of both walk-ins.
    assert_eq!(
        waiting.iter().map(|t| t.number).collect::<Vec<_>>(),
        vec![2, 1, 3]
    );
    assert!(engine.list_by_status(date, TokenStatus::Completed).is_empty());

    serve_one(&engine, date).await.unwrap();
    let completed = engine.list_by_status(date, TokenStatus::Completed);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].number, 2);
}

#[tokio::test]
async fn test_audit_events_fire_and_forget() {
    let engine = setup();
    let date = day();
    let mut events = engine.subscribe();

    let mut input = walk_in("p-1");
    input.actor = Some("fd-1".to_string());
    let token = engine.check_in(date, input).await.unwrap();

    let checked_in = events.recv().await.unwrap();
    assert_eq!(checked_in.event_type, "checked_in");
    assert_eq!(checked_in.token.number, token.number);
    assert_eq!(checked_in.actor.as_deref(), Some("fd-1"));

    engine.call_next(date, Some("dr-9")).await.unwrap();
    let called = events.recv().await.unwrap();
    assert_eq!(called.event_type, "called");
    assert_eq!(called.actor.as_deref(), Some("dr-9"));

    engine
        .set_status(date, token.number, TokenStatus::Completed, Some("dr-9"))
        .await
        .unwrap();
    let completed = events.recv().await.unwrap();
    assert_eq!(completed.event_type, "completed");
    assert_eq!(completed.token.status, TokenStatus::Completed);
}

#[tokio::test]
async fn test_token_wire_format() {
    let engine = setup();

    let token = engine
        .check_in(day(), appointment("p-1", "apt-7"))
        .await
        .unwrap();

    let value = serde_json::to_value(&token).unwrap();
    assert_eq!(value["status"], "WAITING");
    assert_eq!(value["channel"], "APPOINTMENT");
    assert_eq!(value["appointment_ref"], "apt-7");
}
