//! Local client implementing the `ShiftRosterApi` trait.

use std::sync::Arc;

use async_trait::async_trait;
use shift_roster_sdk::{
    Actor, LifecycleState, MemberSummary, MonthKey, ScheduleDocument, ShiftRosterApi,
    ShiftRosterError,
};

use crate::domain::service::ShiftRosterService;

/// Local client for the Shift Roster module.
///
/// Read-only access for consumers that do not edit the grid; delegates to
/// the domain service.
pub struct ShiftRosterLocalClient {
    service: Arc<ShiftRosterService>,
}

impl ShiftRosterLocalClient {
    /// Creates a new local client with the given service.
    #[must_use]
    pub fn new(service: Arc<ShiftRosterService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ShiftRosterApi for ShiftRosterLocalClient {
    async fn load_schedule(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<ScheduleDocument, ShiftRosterError> {
        self.service
            .visible_schedule(actor, department, month)
            .await
            .map_err(ShiftRosterError::from)
    }

    async fn member_summaries(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<Vec<MemberSummary>, ShiftRosterError> {
        self.service
            .member_summaries(actor, department, month)
            .await
            .map_err(ShiftRosterError::from)
    }

    async fn lifecycle_state(
        &self,
        department: &str,
        month: MonthKey,
    ) -> Result<LifecycleState, ShiftRosterError> {
        self.service
            .lifecycle_state(department, month)
            .await
            .map_err(ShiftRosterError::from)
    }
}
