//! `ShiftRosterApi` trait definition.
//!
//! Read-side API for the `shift-roster` module. Mutations go through a
//! `ScheduleSession` owned by the editing UI, not through this trait.

use async_trait::async_trait;

use crate::error::ShiftRosterError;
use crate::models::{Actor, LifecycleState, MemberSummary, MonthKey, ScheduleDocument};

/// Public API trait for the `shift-roster` module.
///
/// All methods take the requesting `Actor`; visibility of unpublished
/// months depends on it.
#[async_trait]
pub trait ShiftRosterApi: Send + Sync {
    /// Load the schedule of a department-month as seen by `actor`.
    ///
    /// Non-supervisors receive an empty document until the month is published.
    ///
    /// # Errors
    ///
    /// * `Storage` - If the document store rejects the read
    async fn load_schedule(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<ScheduleDocument, ShiftRosterError>;

    /// Per-member attendance, overtime and pay counters for the visible schedule.
    ///
    /// # Errors
    ///
    /// * `Storage` - If the document store rejects one of the reads
    async fn member_summaries(
        &self,
        actor: &Actor,
        department: &str,
        month: MonthKey,
    ) -> Result<Vec<MemberSummary>, ShiftRosterError>;

    /// Current lifecycle state of a department-month.
    ///
    /// # Errors
    ///
    /// * `Storage` - If the document store rejects the read
    async fn lifecycle_state(
        &self,
        department: &str,
        month: MonthKey,
    ) -> Result<LifecycleState, ShiftRosterError>;
}
