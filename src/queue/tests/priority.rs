//! Dispatch ordering: appointment lane before walk-ins, FIFO within a lane.

use super::*;

#[tokio::test]
async fn test_appointment_lane_before_walk_ins() {
    let engine = setup();
    let date = day();

    // A (appointment, seq 1), B (walk-in, seq 2), C (appointment, seq 3).
    let a = engine
        .check_in(date, appointment("p-a", "apt-a"))
        .await
        .unwrap();
    let b = engine.check_in(date, walk_in("p-b")).await.unwrap();
    let c = engine
        .check_in(date, appointment("p-c", "apt-c"))
        .await
        .unwrap();

    // C outranks B despite arriving later: lower priority class wins.
    let first = serve_one(&engine, date).await.unwrap();
    let second = serve_one(&engine, date).await.unwrap();
    let third = serve_one(&engine, date).await.unwrap();

    assert_eq!(first.number, a.number);
    assert_eq!(second.number, c.number);
    assert_eq!(third.number, b.number);
}

#[tokio::test]
async fn test_fifo_within_channel() {
    let engine = setup();
    let date = day();

    let t1 = engine.check_in(date, walk_in("p-1")).await.unwrap();
    let t2 = engine.check_in(date, walk_in("p-2")).await.unwrap();
    let t3 = engine.check_in(date, walk_in("p-3")).await.unwrap();

    assert_eq!(serve_one(&engine, date).await.unwrap().number, t1.number);
    assert_eq!(serve_one(&engine, date).await.unwrap().number, t2.number);
    assert_eq!(serve_one(&engine, date).await.unwrap().number, t3.number);
}

#[tokio::test]
async fn test_late_appointment_still_outranks_earlier_walk_ins() {
    let engine = setup();
    let date = day();

    engine.check_in(date, walk_in("p-1")).await.unwrap();
    engine.check_in(date, walk_in("p-2")).await.unwrap();
    let apt = engine
        .check_in(date, appointment("p-3", "apt-1"))
        .await
        .unwrap();

    assert_eq!(serve_one(&engine, date).await.unwrap().number, apt.number);
}

#[tokio::test]
async fn test_walk_in_dispatched_once_appointment_lane_drains() {
    let engine = setup();
    let date = day();

    let w = engine.check_in(date, walk_in("p-w")).await.unwrap();
    let a = engine
        .check_in(date, appointment("p-a", "apt-1"))
        .await
        .unwrap();

    assert_eq!(serve_one(&engine, date).await.unwrap().number, a.number);
    assert_eq!(serve_one(&engine, date).await.unwrap().number, w.number);
    assert_eq!(engine.call_next(date, None).await, Ok(None));
}

#[tokio::test]
async fn test_skipped_token_leaves_dispatch_order() {
    let engine = setup();
    let date = day();

    let t1 = engine.check_in(date, walk_in("p-1")).await.unwrap();
    let t2 = engine.check_in(date, walk_in("p-2")).await.unwrap();

    engine
        .set_status(date, t1.number, TokenStatus::Skipped, None)
        .await
        .unwrap();

    assert_eq!(serve_one(&engine, date).await.unwrap().number, t2.number);
    assert_eq!(engine.call_next(date, None).await, Ok(None));
}
