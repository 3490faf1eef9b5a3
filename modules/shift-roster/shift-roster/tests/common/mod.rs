#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for shift-roster integration tests

use std::sync::Arc;

use serde_json::{Value, json};
use shift_roster::{
    Actor, MonthKey,
    config::ShiftRosterConfig,
    domain::{ScheduleSession, ShiftRosterService},
    infra::InMemoryDocumentStore,
};

pub const DEPARTMENT: &str = "icu";
pub const MORNING: &str = "\u{0e0a}";
pub const EVENING: &str = "\u{0e1a}";
pub const NIGHT: &str = "\u{0e14}";

pub fn march() -> MonthKey {
    "2026-03".parse().unwrap()
}

pub fn april() -> MonthKey {
    "2026-04".parse().unwrap()
}

pub fn boss() -> Actor {
    Actor::supervisor("boss")
}

/// Staff member holding an `editSchedule` grant.
pub fn editor() -> Actor {
    Actor::staff("editor")
}

/// Staff member without a grant.
pub fn viewer() -> Actor {
    Actor::staff("viewer")
}

/// Team, options and permissions of the test department.
///
/// Options and permissions use the legacy shapes on purpose.
pub fn seed_department(store: &InMemoryDocumentStore) {
    store.insert(
        "teams",
        DEPARTMENT,
        json!({
            "members": [
                {"id": "n1", "firstName": "Nok", "role": "registered_nurse"},
                {"id": "n2", "role": "head_nurse"},
                {"id": "a1", "role": "nursing_assistant"},
                {"id": "a2", "role": "nursing_assistant"},
                {"id": "a3", "role": "patient_care_worker"},
                {"id": "a4", "role": "patient_care_worker"}
            ]
        }),
    );
    store.insert(
        "shiftOptions",
        DEPARTMENT,
        json!({
            "options": [
                {"name": MORNING, "includeInTeam": true},
                {"name": EVENING, "includeInTeam": true},
                {"name": NIGHT, "includeInTeam": true},
                "OFF"
            ]
        }),
    );
    store.insert(
        "permissions",
        DEPARTMENT,
        json!({
            "editor": true,
            "viewer": {"editSchedule": false}
        }),
    );
}

/// Stores a schedule document for `month` with the given `(member, day, row, value)` cells.
pub fn seed_schedule(
    store: &InMemoryDocumentStore,
    month: MonthKey,
    status: Option<&str>,
    cells: &[(&str, u32, &str, &str)],
) {
    let mut schedule = serde_json::Map::new();
    for (member, day, row, value) in cells {
        let days = schedule
            .entry((*member).to_owned())
            .or_insert_with(|| json!({}));
        let slot = days
            .as_object_mut()
            .unwrap()
            .entry(day.to_string())
            .or_insert_with(|| json!({}));
        slot[*row] = json!(value);
    }
    let mut doc = json!({
        "department": DEPARTMENT,
        "monthKey": month.to_string(),
        "schedule": schedule,
        "cellStyles": {}
    });
    if let Some(status) = status {
        doc["status"] = json!(status);
    }
    store.insert("schedules", &month.document_id(DEPARTMENT), doc);
}

pub fn create_service() -> (Arc<InMemoryDocumentStore>, ShiftRosterService) {
    let store = Arc::new(InMemoryDocumentStore::new());
    seed_department(&store);
    let service = ShiftRosterService::new(store.clone(), ShiftRosterConfig::default());
    (store, service)
}

pub async fn open(service: &ShiftRosterService, actor: Actor, month: MonthKey) -> ScheduleSession {
    let mut session = service.open_session(actor, DEPARTMENT, month).await.unwrap();
    session.seed_rng(7);
    session
}

pub fn stored_schedule(store: &InMemoryDocumentStore, month: MonthKey) -> Option<Value> {
    store.snapshot("schedules", &month.document_id(DEPARTMENT))
}
