//! Domain service for the Shift Roster module.

use std::sync::Arc;

use shift_roster_sdk::{
    Actor, Holiday, LifecycleState, Member, MemberSummary, MonthKey, ScheduleDocument, ShiftOption,
};

use super::cells::CellStore;
use super::documents::{self, SchedulePatch};
use super::error::DomainError;
use super::lifecycle;
use super::metrics;
use super::permission::PermissionMap;
use super::repo::DocumentStore;
use super::session::ScheduleSession;
use crate::config::ShiftRosterConfig;

/// Everything loaded for one department-month, after the visibility rule.
#[derive(Debug, Clone, Default)]
pub struct MonthSnapshot {
    pub members: Vec<Member>,
    pub options: Vec<ShiftOption>,
    pub permissions: PermissionMap,
    pub holidays: Vec<Holiday>,
    pub state: LifecycleState,
    pub cells: CellStore,
}

/// Domain service for schedule loading and persistence.
///
/// Reads collaborator documents through the [`DocumentStore`] and opens
/// editing sessions. Cheap to clone.
#[derive(Clone)]
pub struct ShiftRosterService {
    store: Arc<dyn DocumentStore>,
    config: Arc<ShiftRosterConfig>,
}

impl ShiftRosterService {
    /// Creates a new `ShiftRosterService` with the given store and config.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: ShiftRosterConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ShiftRosterConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self.store.get(collection, id).await?)
    }

    /// Roster of `teams/{department}`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store read fails.
    pub async fn members(&self, department: &str) -> Result<Vec<Member>, DomainError> {
        let doc = self.read(&self.config.collections.teams, department).await?;
        Ok(doc.as_ref().map(documents::members_from_value).unwrap_or_default())
    }

    /// Shift options of `shiftOptions/{department}`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store read fails.
    pub async fn shift_options(&self, department: &str) -> Result<Vec<ShiftOption>, DomainError> {
        let doc = self
            .read(&self.config.collections.shift_options, department)
            .await?;
        Ok(doc.as_ref().map(documents::options_from_value).unwrap_or_default())
    }

    /// Edit permissions of `permissions/{department}`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store read fails.
    pub async fn permissions(&self, department: &str) -> Result<PermissionMap, DomainError> {
        let doc = self
            .read(&self.config.collections.permissions, department)
            .await?;
        Ok(doc
            .as_ref()
            .map(documents::permissions_from_value)
            .unwrap_or_default())
    }

    /// Holidays of `holidays/{department}-{monthKey}`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store read fails.
    pub async fn holidays(&self, department: &str, month: MonthKey) -> Result<Vec<Holiday>, DomainError> {
        let doc = self
            .read(&self.config.collections.holidays, &month.document_id(department))
            .await?;
        Ok(doc.as_ref().map(documents::holidays_from_value).unwrap_or_default())
    }

    /// Replaces the stored holiday list of a department-month.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the write is rejected.
    pub async fn save_holidays(
        &self,
        department: &str,
        month: MonthKey,
        holidays: &[Holiday],
    ) -> Result<(), DomainError> {
        let doc = documents::holidays_document(holidays).map_err(anyhow::Error::from)?;
        self.store
            .set(&self.config.collections.holidays, &month.document_id(department), doc)
            .await?;
        tracing::debug!(department, month = %month, count = holidays.len(), "Saved holidays");
        Ok(())
    }

    /// Stored schedule document, `None` before the first save.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store read fails and `MalformedDocument`
    /// if the stored document does not decode.
    pub async fn stored_schedule(
        &self,
        department: &str,
        month: MonthKey,
    ) -> Result<Option<ScheduleDocument>, DomainError> {
        let collection = &self.config.collections.schedules;
        let id = month.document_id(department);
        self.read(collection, &id)
            .await?
            .map(|value| documents::schedule_from_value(collection, &id, value))
            .transpose()
    }

    /// Lifecycle of the stored schedule, `Unset` before the first save.
    ///
    /// # Errors
    ///
    /// Same as [`Self::stored_schedule`].
    pub async fn lifecycle_state(
        &self,
        department: &str,
        month: MonthKey,
    ) -> Result<LifecycleState, DomainError> {
        let doc = self.stored_schedule(department, month).await?;
        Ok(state_of(doc.as_ref()))
    }

    /// Schedule as seen by `actor`: an empty document for non-supervisors
    /// until the month is published.
    ///
    /// # Errors
    ///
    /// Same as [`Self::stored_schedule`].
    pub async fn visible_schedule(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<ScheduleDocument, DomainError> {
        let doc = self.stored_schedule(department, month).await?;
        Ok(visible_to(actor, department, month, doc))
    }

    /// Loads everything a session needs for one department-month.
    ///
    /// The schedule document is read once; lifecycle state and visible
    /// cells both derive from that read.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if any store read fails and `MalformedDocument`
    /// if the stored schedule does not decode.
    pub async fn load_month(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<MonthSnapshot, DomainError> {
        let members = self.members(department).await?;
        let options = self.shift_options(department).await?;
        let permissions = self.permissions(department).await?;
        let holidays = self.holidays(department, month).await?;
        let stored = self.stored_schedule(department, month).await?;
        let state = state_of(stored.as_ref());
        let schedule = visible_to(actor, department, month, stored);

        tracing::debug!(
            department,
            month = %month,
            actor = %actor.id,
            members = members.len(),
            options = options.len(),
            holidays = holidays.len(),
            state = ?state,
            "Loaded schedule month"
        );

        Ok(MonthSnapshot {
            members,
            options,
            permissions,
            holidays,
            state,
            cells: documents::cells_from_document(&schedule),
        })
    }

    /// Opens an editing session for `actor` on a department-month.
    ///
    /// # Errors
    ///
    /// Returns `Storage` / `MalformedDocument` if loading fails.
    pub async fn open_session(
        &self,
        actor: Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<ScheduleSession, DomainError> {
        let snapshot = self.load_month(&actor, department, month).await?;
        tracing::info!(department, month = %month, actor = %actor.id, "Opened schedule session");
        Ok(ScheduleSession::new(self.clone(), actor, department, month, snapshot))
    }

    /// Per-member figures of the schedule visible to `actor`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_month`].
    pub async fn member_summaries(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<Vec<MemberSummary>, DomainError> {
        let snapshot = self.load_month(actor, department, month).await?;
        Ok(snapshot
            .members
            .iter()
            .map(|m| {
                metrics::member_summary(&snapshot.cells, &m.id, month, &snapshot.holidays, &self.config)
            })
            .collect())
    }

    /// Merges a schedule patch into the stored document.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the patch is rejected.
    pub(crate) async fn write_schedule(
        &self,
        department: &str,
        month: MonthKey,
        patch: &SchedulePatch,
    ) -> Result<(), DomainError> {
        let value = patch.to_value().map_err(anyhow::Error::from)?;
        self.store
            .update(&self.config.collections.schedules, &month.document_id(department), value)
            .await?;
        Ok(())
    }
}

fn state_of(doc: Option<&ScheduleDocument>) -> LifecycleState {
    doc.map_or(LifecycleState::Unset, ScheduleDocument::lifecycle)
}

fn visible_to(
    actor: &Actor,
    department: &str,
    month: MonthKey,
    doc: Option<ScheduleDocument>,
) -> ScheduleDocument {
    match doc {
        Some(doc) if lifecycle::can_view(actor, doc.lifecycle()) => doc,
        _ => ScheduleDocument::empty(department, month),
    }
}
