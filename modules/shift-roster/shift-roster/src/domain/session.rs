//! Editing session of one department-month.
//!
//! A [`ScheduleSession`] owns all in-memory state of the open month and
//! processes [`ScheduleCommand`]s through a single dispatcher. Every
//! command passes the permission gate before anything is mutated; cell
//! mutations record history and arm the debounced autosave.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use shift_roster_sdk::{
    Actor, CellKey, CellStyle, CellStylePatch, DaySummary, HistoryChange, HistoryEntry,
    HistoryKind, Holiday, LifecycleState, Member, MemberSummary, MonthKey, SaveStatus,
    ShiftOption, Subgroup, ValueEditKind,
};
use tokio::sync::watch;

use super::auto_assign::{self, CoverageReport, Recolor};
use super::autosave::Debouncer;
use super::calendar::{self, DayInfo};
use super::cells::CellStore;
use super::documents::SchedulePatch;
use super::error::DomainError;
use super::history::HistoryStack;
use super::lifecycle::{self, LifecycleAction};
use super::metrics;
use super::permission::{self, PermissionMap};
use super::repo::DocumentStore;
use super::service::{MonthSnapshot, ShiftRosterService};

/// A mutation request against the open month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommand {
    /// Writes a value; the empty string clears the cell.
    EditCell { key: CellKey, value: String },
    ChangeColor { key: CellKey, color: String },
    ChangeFontSize { key: CellKey, size: u16 },
    /// Reverts the most recent recorded edit.
    Undo,
    /// Fills empty assistant days.
    AutoAssignCoverage,
    /// Recolours cells to cover outstanding overtime.
    MarkOvertime,
    /// Adds a holiday, replacing any entry on the same date.
    AddHoliday(Holiday),
    RemoveHoliday { date: u8 },
    SaveDraft,
    Publish,
}

impl ScheduleCommand {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EditCell { .. } => "edit_cell",
            Self::ChangeColor { .. } => "change_color",
            Self::ChangeFontSize { .. } => "change_font_size",
            Self::Undo => "undo",
            Self::AutoAssignCoverage => "auto_assign_coverage",
            Self::MarkOvertime => "mark_overtime",
            Self::AddHoliday(_) => "add_holiday",
            Self::RemoveHoliday { .. } => "remove_holiday",
            Self::SaveDraft => "save_draft",
            Self::Publish => "publish",
        }
    }
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command had nothing to do.
    Unchanged,
    /// A single cell edit was recorded.
    Edited(HistoryKind),
    Undone(HistoryEntry),
    Coverage(CoverageReport),
    Overtime(Vec<Recolor>),
    HolidaysChanged { working_days: u32 },
    Lifecycle(LifecycleState),
}

/// Kind of a value edit from `old` to `new` given the configured options.
#[must_use]
pub fn classify_edit(old: &str, new: &str, options: &[ShiftOption]) -> ValueEditKind {
    let is_option = options.iter().any(|o| o.name == new);
    if !new.is_empty() && !is_option {
        ValueEditKind::TypeShift
    } else if old.is_empty() && is_option {
        ValueEditKind::AddShift
    } else {
        ValueEditKind::EditShift
    }
}

/// State of one open department-month.
pub struct ScheduleSession {
    service: ShiftRosterService,
    actor: Actor,
    department: String,
    month: MonthKey,
    members: Vec<Member>,
    options: Vec<ShiftOption>,
    permissions: PermissionMap,
    holidays: Vec<Holiday>,
    state: LifecycleState,
    cells: CellStore,
    history: HistoryStack,
    autosave: Debouncer,
    save_status: Arc<watch::Sender<SaveStatus>>,
    rng: StdRng,
}

impl std::fmt::Debug for ScheduleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleSession")
            .field("actor", &self.actor)
            .field("department", &self.department)
            .field("month", &self.month)
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl ScheduleSession {
    pub(crate) fn new(
        service: ShiftRosterService,
        actor: Actor,
        department: &str,
        month: MonthKey,
        snapshot: MonthSnapshot,
    ) -> Self {
        let config = service.config();
        let history = HistoryStack::new(config.history_limit);
        let autosave = Debouncer::new(config.autosave_debounce());
        let (save_status, _) = watch::channel(SaveStatus::Idle);
        let mut session = Self {
            service,
            actor,
            department: department.to_owned(),
            month,
            members: Vec::new(),
            options: Vec::new(),
            permissions: PermissionMap::new(),
            holidays: Vec::new(),
            state: LifecycleState::Unset,
            cells: CellStore::new(),
            history,
            autosave,
            save_status: Arc::new(save_status),
            rng: StdRng::from_rng(&mut rand::rng()),
        };
        session.install(month, snapshot);
        session
    }

    fn install(&mut self, month: MonthKey, snapshot: MonthSnapshot) {
        self.month = month;
        self.members = snapshot.members;
        self.options = snapshot.options;
        self.permissions = snapshot.permissions;
        self.holidays = snapshot.holidays;
        self.state = snapshot.state;
        self.cells = snapshot.cells;
        self.history.clear();
    }

    /// Replaces the random source with a seeded one.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // --- reads -------------------------------------------------------------

    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    #[must_use]
    pub const fn month(&self) -> MonthKey {
        self.month
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    #[must_use]
    pub fn options(&self) -> &[ShiftOption] {
        &self.options
    }

    #[must_use]
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    #[must_use]
    pub const fn lifecycle(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub fn cell(&self, key: &CellKey) -> &str {
        self.cells.get(key)
    }

    #[must_use]
    pub fn style(&self, key: &CellKey) -> CellStyle {
        self.cells.style(key)
    }

    #[must_use]
    pub const fn cells(&self) -> &CellStore {
        &self.cells
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Recorded edits, newest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Whether the actor may issue mutating commands right now.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.authorize().is_ok()
    }

    #[must_use]
    pub fn days(&self) -> Vec<DayInfo> {
        calendar::month_days(self.month)
    }

    #[must_use]
    pub fn working_days(&self) -> u32 {
        calendar::working_days(self.month, &self.holidays)
    }

    #[must_use]
    pub fn member_summary(&self, member_id: &str) -> MemberSummary {
        metrics::member_summary(
            &self.cells,
            member_id,
            self.month,
            &self.holidays,
            self.service.config(),
        )
    }

    #[must_use]
    pub fn member_summaries(&self) -> Vec<MemberSummary> {
        self.members
            .iter()
            .map(|m| self.member_summary(&m.id))
            .collect()
    }

    #[must_use]
    pub fn day_summaries(&self, subgroup: Subgroup) -> Vec<DaySummary> {
        metrics::day_summaries(&self.cells, &self.members, subgroup, &self.options, self.month)
    }

    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.save_status.borrow().clone()
    }

    /// Receiver of save status transitions of the open month.
    ///
    /// Each month gets its own channel; subscribe again after
    /// [`Self::switch_month`].
    #[must_use]
    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.save_status.subscribe()
    }

    // --- commands ----------------------------------------------------------

    fn authorize(&self) -> Result<(), DomainError> {
        permission::check(&self.actor, &self.permissions)?;
        // non-supervisors see an empty grid until publish; saving it would
        // overwrite the hidden content
        if !lifecycle::can_view(&self.actor, self.state) {
            return Err(DomainError::permission_denied(self.actor.id.as_str()));
        }
        Ok(())
    }

    /// Applies `command` after the permission gate.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` / `SupervisorOnly` before any mutation,
    /// `InvalidCell` for keys outside the month or roster, `InvalidHoliday`
    /// for dates outside the month and `Storage` when a lifecycle write
    /// fails.
    pub async fn dispatch(&mut self, command: ScheduleCommand) -> Result<CommandOutcome, DomainError> {
        if let Err(e) = self.authorize() {
            tracing::warn!(
                actor = %self.actor.id,
                department = %self.department,
                month = %self.month,
                command = command.name(),
                "Schedule command denied"
            );
            return Err(e);
        }
        tracing::debug!(
            actor = %self.actor.id,
            department = %self.department,
            month = %self.month,
            command = command.name(),
            "Dispatching schedule command"
        );

        match command {
            ScheduleCommand::EditCell { key, value } => {
                self.check_cell(&key)?;
                Ok(self.edit_cell(key, value))
            }
            ScheduleCommand::ChangeColor { key, color } => {
                self.check_cell(&key)?;
                Ok(self.change_color(key, color))
            }
            ScheduleCommand::ChangeFontSize { key, size } => {
                self.check_cell(&key)?;
                Ok(self.change_font_size(key, size))
            }
            ScheduleCommand::Undo => Ok(self.undo()),
            ScheduleCommand::AutoAssignCoverage => Ok(self.auto_assign_coverage()),
            ScheduleCommand::MarkOvertime => Ok(self.mark_overtime()),
            ScheduleCommand::AddHoliday(holiday) => self.add_holiday(holiday).await,
            ScheduleCommand::RemoveHoliday { date } => Ok(self.remove_holiday(date).await),
            ScheduleCommand::SaveDraft => self.transition(LifecycleAction::SaveDraft).await,
            ScheduleCommand::Publish => self.transition(LifecycleAction::Publish).await,
        }
    }

    /// Rejects keys outside the open month or the roster.
    fn check_cell(&self, key: &CellKey) -> Result<(), DomainError> {
        if key.day_index >= u32::from(self.month.days_in_month()) {
            return Err(DomainError::invalid_cell(key.to_string(), "day outside the month"));
        }
        if !self.members.iter().any(|m| m.id == key.member_id) {
            return Err(DomainError::invalid_cell(key.to_string(), "member not on the roster"));
        }
        Ok(())
    }

    fn record(&mut self, key: CellKey, change: HistoryChange) -> HistoryKind {
        let entry = HistoryEntry::new(key, change);
        let kind = entry.kind();
        self.history.push(entry);
        kind
    }

    fn edit_cell(&mut self, key: CellKey, value: String) -> CommandOutcome {
        if self.cells.get(&key) == value {
            return CommandOutcome::Unchanged;
        }
        let old = self.cells.set(key.clone(), value.as_str());
        let kind = classify_edit(&old, &value, &self.options);
        let recorded = self.record(key, HistoryChange::Value { kind, old, new: value });
        self.schedule_autosave();
        CommandOutcome::Edited(recorded)
    }

    fn change_color(&mut self, key: CellKey, color: String) -> CommandOutcome {
        if self.cells.style(&key).text_color == color {
            return CommandOutcome::Unchanged;
        }
        let old = self.cells.set_style(key.clone(), CellStylePatch::color(color.as_str()));
        let kind = self.record(
            key,
            HistoryChange::Color {
                old: old.text_color,
                new: color,
            },
        );
        self.schedule_autosave();
        CommandOutcome::Edited(kind)
    }

    fn change_font_size(&mut self, key: CellKey, size: u16) -> CommandOutcome {
        if self.cells.style(&key).font_size == size {
            return CommandOutcome::Unchanged;
        }
        let old = self.cells.set_style(key.clone(), CellStylePatch::font_size(size));
        let kind = self.record(
            key,
            HistoryChange::FontSize {
                old: old.font_size,
                new: size,
            },
        );
        self.schedule_autosave();
        CommandOutcome::Edited(kind)
    }

    fn undo(&mut self) -> CommandOutcome {
        match self.history.undo_into(&mut self.cells) {
            Some(entry) => {
                tracing::debug!(key = %entry.key, kind = ?entry.kind(), "Undid edit");
                self.schedule_autosave();
                CommandOutcome::Undone(entry)
            }
            None => CommandOutcome::Unchanged,
        }
    }

    fn auto_assign_coverage(&mut self) -> CommandOutcome {
        let report = auto_assign::assign_coverage(
            &mut self.cells,
            &self.members,
            self.month,
            self.service.config(),
            &mut self.rng,
        );
        for write in &report.writes {
            let kind = classify_edit(&write.old, &write.new, &self.options);
            self.history.push(HistoryEntry::new(
                write.key.clone(),
                HistoryChange::Value {
                    kind,
                    old: write.old.clone(),
                    new: write.new.clone(),
                },
            ));
        }
        tracing::info!(
            department = %self.department,
            month = %self.month,
            writes = report.writes.len(),
            filled_days = report.filled_days().len(),
            skipped_days = report.skipped.len(),
            "Coverage auto-assignment finished"
        );
        if report.writes.is_empty() {
            return CommandOutcome::Unchanged;
        }
        self.schedule_autosave();
        CommandOutcome::Coverage(report)
    }

    fn mark_overtime(&mut self) -> CommandOutcome {
        let recolored = auto_assign::mark_overtime(
            &mut self.cells,
            &self.members,
            self.month,
            &self.holidays,
            self.service.config(),
            &mut self.rng,
        );
        for recolor in &recolored {
            self.history.push(HistoryEntry::new(
                recolor.key.clone(),
                HistoryChange::Color {
                    old: recolor.old_color.clone(),
                    new: recolor.new_color.clone(),
                },
            ));
        }
        tracing::info!(
            department = %self.department,
            month = %self.month,
            recolored = recolored.len(),
            "Overtime marking finished"
        );
        if recolored.is_empty() {
            return CommandOutcome::Unchanged;
        }
        self.schedule_autosave();
        CommandOutcome::Overtime(recolored)
    }

    async fn add_holiday(&mut self, holiday: Holiday) -> Result<CommandOutcome, DomainError> {
        if !(1..=self.month.days_in_month()).contains(&holiday.date) {
            return Err(DomainError::invalid_holiday(holiday.date, self.month.to_string()));
        }
        self.holidays.retain(|h| h.date != holiday.date);
        self.holidays.push(holiday);
        self.holidays.sort_by_key(|h| h.date);
        Ok(self.persist_holidays().await)
    }

    async fn remove_holiday(&mut self, date: u8) -> CommandOutcome {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.date != date);
        if self.holidays.len() == before {
            return CommandOutcome::Unchanged;
        }
        self.persist_holidays().await
    }

    /// Writes the holiday list. A failed write keeps the local list and is
    /// reported through the save status.
    async fn persist_holidays(&mut self) -> CommandOutcome {
        if let Err(e) = self
            .service
            .save_holidays(&self.department, self.month, &self.holidays)
            .await
        {
            tracing::error!(
                department = %self.department,
                month = %self.month,
                error = %e,
                "Failed to save holidays"
            );
            self.save_status.send_replace(SaveStatus::Failed(e.to_string()));
        }
        CommandOutcome::HolidaysChanged {
            working_days: self.working_days(),
        }
    }

    async fn transition(&mut self, action: LifecycleAction) -> Result<CommandOutcome, DomainError> {
        permission::require_supervisor(&self.actor, action.name())?;

        let next = lifecycle::next_state(self.state, action);
        let mut patch = SchedulePatch::snapshot(&self.department, self.month, &self.cells, &self.actor.id)
            .with_status(lifecycle::status_of(next));
        if lifecycle::stamps_publish(self.state, action) {
            patch = patch.with_publish_stamp();
        }

        // the full snapshot supersedes any pending autosave
        self.autosave.cancel();
        self.save_status.send_replace(SaveStatus::Saving);
        if let Err(e) = self.service.write_schedule(&self.department, self.month, &patch).await {
            tracing::error!(
                department = %self.department,
                month = %self.month,
                action = action.name(),
                error = %e,
                "Lifecycle write failed"
            );
            self.save_status.send_replace(SaveStatus::Failed(e.to_string()));
            return Err(e);
        }
        self.save_status.send_replace(SaveStatus::Saved);

        tracing::info!(
            department = %self.department,
            month = %self.month,
            actor = %self.actor.id,
            from = ?self.state,
            to = ?next,
            "Schedule lifecycle updated"
        );
        self.state = next;
        Ok(CommandOutcome::Lifecycle(next))
    }

    /// Arms the debounced autosave with a snapshot of the current cells.
    fn schedule_autosave(&mut self) {
        let patch = SchedulePatch::snapshot(&self.department, self.month, &self.cells, &self.actor.id);
        let store = self.service.store();
        let collection = self.service.config().collections.schedules.clone();
        let id = self.month.document_id(&self.department);
        let status = Arc::clone(&self.save_status);

        status.send_replace(SaveStatus::Pending);
        self.autosave
            .schedule(persist_snapshot(store, collection, id, patch, status));
    }

    /// Opens another month of the same department.
    ///
    /// The pending autosave of the current month is left to fire and keeps
    /// reporting to that month's status channel; the new month starts on a
    /// fresh `Idle` channel. Cells, styles and history are discarded and
    /// rehydrated from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the new month cannot be loaded; the session then
    /// stays on the current month.
    pub async fn switch_month(&mut self, month: MonthKey) -> Result<(), DomainError> {
        let snapshot = self
            .service
            .load_month(&self.actor, &self.department, month)
            .await?;
        self.autosave.detach();
        tracing::info!(
            department = %self.department,
            from = %self.month,
            to = %month,
            "Switched schedule month"
        );
        self.install(month, snapshot);
        let (save_status, _) = watch::channel(SaveStatus::Idle);
        self.save_status = Arc::new(save_status);
        Ok(())
    }
}

async fn persist_snapshot(
    store: Arc<dyn DocumentStore>,
    collection: String,
    id: String,
    patch: SchedulePatch,
    status: Arc<watch::Sender<SaveStatus>>,
) {
    status.send_replace(SaveStatus::Saving);
    let result = match patch.to_value() {
        Ok(value) => store.update(&collection, &id, value).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => {
            tracing::debug!(collection = %collection, id = %id, "Schedule autosaved");
            status.send_replace(SaveStatus::Saved);
        }
        Err(e) => {
            tracing::error!(collection = %collection, id = %id, error = %e, "Schedule autosave failed");
            status.send_replace(SaveStatus::Failed(e.to_string()));
        }
    }
}
