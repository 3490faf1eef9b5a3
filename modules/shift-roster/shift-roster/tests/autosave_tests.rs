#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Debounced autosave behaviour, driven on a paused clock.

mod common;

use std::time::Duration;

use common::*;
use shift_roster::domain::ScheduleCommand;
use shift_roster_sdk::{CellKey, SaveStatus};

const QUIET: Duration = Duration::from_millis(1100);

fn edit(member: &str, day: u32, value: &str) -> ScheduleCommand {
    ScheduleCommand::EditCell {
        key: CellKey::top(member, day),
        value: value.to_owned(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_saves_once() {
    let (store, service) = create_service();
    let mut session = open(&service, boss(), march()).await;

    for day in 0..3 {
        session.dispatch(edit("n1", day, MORNING)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    assert_eq!(session.save_status(), SaveStatus::Pending);
    assert_eq!(store.write_count(), 0);

    tokio::time::sleep(QUIET).await;
    assert_eq!(store.write_count(), 1);
    assert_eq!(session.save_status(), SaveStatus::Saved);

    let doc = stored_schedule(&store, march()).unwrap();
    for day in ["0", "1", "2"] {
        assert_eq!(doc["schedule"]["n1"][day]["top"], MORNING);
    }
    assert_eq!(doc["updatedBy"], "boss");
    // autosave never touches the lifecycle fields
    assert!(doc.get("status").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_status_channel_reports_transitions() {
    let (_store, service) = create_service();
    let mut session = open(&service, boss(), march()).await;
    let mut status = session.subscribe_save_status();
    assert_eq!(*status.borrow_and_update(), SaveStatus::Idle);

    session.dispatch(edit("n1", 0, NIGHT)).await.unwrap();
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), SaveStatus::Pending);

    tokio::time::sleep(QUIET).await;
    assert_eq!(*status.borrow_and_update(), SaveStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_keeps_local_state_and_recovers() {
    let (store, service) = create_service();
    let mut session = open(&service, boss(), march()).await;
    store.set_fail_writes(true);

    session.dispatch(edit("n1", 4, EVENING)).await.unwrap();
    tokio::time::sleep(QUIET).await;

    assert!(matches!(session.save_status(), SaveStatus::Failed(_)));
    assert_eq!(session.cell(&CellKey::top("n1", 4)), EVENING);
    assert_eq!(session.history_len(), 1);
    assert!(stored_schedule(&store, march()).is_none());

    store.set_fail_writes(false);
    session.dispatch(edit("n1", 5, EVENING)).await.unwrap();
    tokio::time::sleep(QUIET).await;

    assert_eq!(session.save_status(), SaveStatus::Saved);
    assert_eq!(store.write_count(), 1);
    let doc = stored_schedule(&store, march()).unwrap();
    assert_eq!(doc["schedule"]["n1"]["4"]["top"], EVENING);
    assert_eq!(doc["schedule"]["n1"]["5"]["top"], EVENING);
}

#[tokio::test(start_paused = true)]
async fn test_undo_is_autosaved() {
    let (store, service) = create_service();
    let mut session = open(&service, boss(), march()).await;

    session.dispatch(edit("a1", 9, NIGHT)).await.unwrap();
    tokio::time::sleep(QUIET).await;
    session.dispatch(ScheduleCommand::Undo).await.unwrap();
    tokio::time::sleep(QUIET).await;

    assert_eq!(store.write_count(), 2);
    let doc = stored_schedule(&store, march()).unwrap();
    assert!(doc["schedule"].get("a1").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_month_switch_lets_pending_save_land() {
    let (store, service) = create_service();
    seed_schedule(&store, april(), Some("draft"), &[("n2", 1, "top", NIGHT)]);
    let mut session = open(&service, boss(), march()).await;

    session.dispatch(edit("n1", 0, MORNING)).await.unwrap();
    session.switch_month(april()).await.unwrap();

    assert_eq!(session.month(), april());
    assert_eq!(session.history_len(), 0);
    assert_eq!(session.cell(&CellKey::top("n1", 0)), "");
    assert_eq!(session.cell(&CellKey::top("n2", 1)), NIGHT);
    assert_eq!(session.save_status(), SaveStatus::Idle);

    tokio::time::sleep(QUIET).await;

    let march_doc = stored_schedule(&store, march()).unwrap();
    assert_eq!(march_doc["schedule"]["n1"]["0"]["top"], MORNING);
    let april_doc = stored_schedule(&store, april()).unwrap();
    assert!(april_doc["schedule"].get("n1").is_none());
    assert_eq!(store.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_previous_month_save_reports_to_its_own_channel() {
    let (store, service) = create_service();
    seed_schedule(&store, april(), Some("draft"), &[("n2", 1, "top", NIGHT)]);
    let mut session = open(&service, boss(), march()).await;
    let march_status = session.subscribe_save_status();
    store.set_fail_writes(true);

    session.dispatch(edit("n1", 0, MORNING)).await.unwrap();
    session.switch_month(april()).await.unwrap();
    let april_status = session.subscribe_save_status();

    tokio::time::sleep(QUIET).await;

    assert!(matches!(*march_status.borrow(), SaveStatus::Failed(_)));
    assert_eq!(session.save_status(), SaveStatus::Idle);
    assert_eq!(*april_status.borrow(), SaveStatus::Idle);
    assert_eq!(session.cell(&CellKey::top("n2", 1)), NIGHT);

    store.set_fail_writes(false);
    session.dispatch(edit("n2", 2, EVENING)).await.unwrap();
    tokio::time::sleep(QUIET).await;

    assert_eq!(*april_status.borrow(), SaveStatus::Saved);
    assert!(matches!(*march_status.borrow(), SaveStatus::Failed(_)));
}

#[tokio::test(start_paused = true)]
async fn test_publish_supersedes_pending_autosave() {
    let (store, service) = create_service();
    let mut session = open(&service, boss(), march()).await;

    session.dispatch(edit("n1", 0, MORNING)).await.unwrap();
    session.dispatch(ScheduleCommand::Publish).await.unwrap();
    tokio::time::sleep(QUIET).await;

    assert_eq!(store.write_count(), 1);
    let doc = stored_schedule(&store, march()).unwrap();
    assert_eq!(doc["status"], "published");
    assert_eq!(doc["schedule"]["n1"]["0"]["top"], MORNING);
}
