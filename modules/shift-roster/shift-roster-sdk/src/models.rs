//! Public models for the `shift-roster` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `shift-roster` module, its document store, and its consumers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

use crate::error::ShiftRosterError;

/// Text colour of a cell with no explicit style.
pub const DEFAULT_TEXT_COLOR: &str = "black";

/// Font size of a cell with no explicit style.
pub const DEFAULT_FONT_SIZE: u16 = 14;

// ============================================================================
// Roster
// ============================================================================

/// Job title of a roster member.
///
/// Stored as a free-form label by the roster collaborator; unknown labels
/// collapse to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberRole {
    HeadNurse,
    RegisteredNurse,
    PracticalNurse,
    NursingAssistant,
    PatientCareWorker,
    #[default]
    Other,
}

impl MemberRole {
    /// Canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeadNurse => "head_nurse",
            Self::RegisteredNurse => "registered_nurse",
            Self::PracticalNurse => "practical_nurse",
            Self::NursingAssistant => "nursing_assistant",
            Self::PatientCareWorker => "patient_care_worker",
            Self::Other => "other",
        }
    }

    /// Parses a role label, accepting canonical labels, spaced titles and
    /// the usual ward abbreviations.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "head_nurse" | "hn" => Self::HeadNurse,
            "registered_nurse" | "rn" | "nurse" => Self::RegisteredNurse,
            "practical_nurse" | "pn" => Self::PracticalNurse,
            "nursing_assistant" | "na" => Self::NursingAssistant,
            "patient_care_worker" | "pcw" => Self::PatientCareWorker,
            _ => Self::Other,
        }
    }

    /// Roster subgroup used for coverage planning and summary rows.
    #[must_use]
    pub const fn subgroup(self) -> Subgroup {
        match self {
            Self::NursingAssistant | Self::PatientCareWorker => Subgroup::Assistant,
            Self::HeadNurse | Self::RegisteredNurse | Self::PracticalNurse | Self::Other => {
                Subgroup::Nurse
            }
        }
    }
}

impl From<String> for MemberRole {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<MemberRole> for String {
    fn from(value: MemberRole) -> Self {
        value.as_str().to_owned()
    }
}

/// The two populations a roster is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subgroup {
    Nurse,
    Assistant,
}

/// A roster member, owned by the team collaborator and read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: MemberRole,
}

impl Member {
    #[must_use]
    pub fn new(id: impl Into<String>, role: MemberRole) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            role,
        }
    }

    #[must_use]
    pub const fn subgroup(&self) -> Subgroup {
        self.role.subgroup()
    }
}

/// Per-member permission record from `permissions/{department}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPermission {
    #[serde(default)]
    pub edit_schedule: bool,
}

// ============================================================================
// Actors
// ============================================================================

/// Actor class for permission decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Supervisor,
    Staff,
}

/// The user issuing a command or read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub kind: ActorKind,
}

impl Actor {
    #[must_use]
    pub fn supervisor(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ActorKind::Supervisor,
        }
    }

    #[must_use]
    pub fn staff(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ActorKind::Staff,
        }
    }

    #[must_use]
    pub const fn is_supervisor(&self) -> bool {
        matches!(self.kind, ActorKind::Supervisor)
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// A calendar month, rendered as `YYYY-MM`.
///
/// Internally anchored on the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(Date);

impl MonthKey {
    /// Creates a month key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` if the year is outside `1..=9999`.
    pub fn new(year: i32, month: Month) -> Result<Self, ShiftRosterError> {
        if !(1..=9999).contains(&year) {
            return Err(ShiftRosterError::invalid_month(format!("{year}-{month}")));
        }
        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .map_err(|e| ShiftRosterError::invalid_month(e.to_string()))
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub const fn month(self) -> Month {
        self.0.month()
    }

    /// First calendar day of the month.
    #[must_use]
    pub const fn first_day(self) -> Date {
        self.0
    }

    /// Following month, `None` past year 9999.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let year = if self.month() == Month::December {
            self.year() + 1
        } else {
            self.year()
        };
        Self::new(year, self.month().next()).ok()
    }

    /// Preceding month, `None` before year 1.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        let year = if self.month() == Month::January {
            self.year() - 1
        } else {
            self.year()
        };
        Self::new(year, self.month().previous()).ok()
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(self) -> u8 {
        self.next()
            .and_then(|next| next.first_day().previous_day())
            .map_or(31, Date::day)
    }

    /// Document id shared by the schedule and holiday collections.
    #[must_use]
    pub fn document_id(self, department: &str) -> String {
        format!("{department}-{self}")
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}

impl FromStr for MonthKey {
    type Err = ShiftRosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| ShiftRosterError::invalid_month(s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| ShiftRosterError::invalid_month(s))?;
        let month: u8 = month
            .parse()
            .map_err(|_| ShiftRosterError::invalid_month(s))?;
        let month = Month::try_from(month).map_err(|_| ShiftRosterError::invalid_month(s))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ShiftRosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// A department holiday; only the day of month matters to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Day of month, 1-based.
    pub date: u8,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Holiday {
    #[must_use]
    pub fn new(date: u8, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: String::new(),
        }
    }
}

// ============================================================================
// Cells
// ============================================================================

/// One of the two slots a member holds per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Top,
    Bottom,
}

impl RowType {
    pub const ALL: [Self; 2] = [Self::Top, Self::Bottom];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for RowType {
    type Err = ShiftRosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(ShiftRosterError::invalid_cell_key(other)),
        }
    }
}

/// Address of a grid cell: `(member, day, row)`.
///
/// `day_index` is 0-based within the month. Serialized as
/// `"{memberId}-{dayIndex}-{rowType}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellKey {
    pub member_id: String,
    pub day_index: u32,
    pub row: RowType,
}

impl CellKey {
    #[must_use]
    pub fn new(member_id: impl Into<String>, day_index: u32, row: RowType) -> Self {
        Self {
            member_id: member_id.into(),
            day_index,
            row,
        }
    }

    #[must_use]
    pub fn top(member_id: impl Into<String>, day_index: u32) -> Self {
        Self::new(member_id, day_index, RowType::Top)
    }

    #[must_use]
    pub fn bottom(member_id: impl Into<String>, day_index: u32) -> Self {
        Self::new(member_id, day_index, RowType::Bottom)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.member_id,
            self.day_index,
            self.row.as_str()
        )
    }
}

impl FromStr for CellKey {
    type Err = ShiftRosterError;

    /// Parses `"{memberId}-{dayIndex}-{rowType}"`. Member ids may contain `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, '-');
        let (Some(row), Some(day), Some(member)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ShiftRosterError::invalid_cell_key(s));
        };
        if member.is_empty() {
            return Err(ShiftRosterError::invalid_cell_key(s));
        }
        let day_index = day
            .parse()
            .map_err(|_| ShiftRosterError::invalid_cell_key(s))?;
        let row = row
            .parse()
            .map_err(|_| ShiftRosterError::invalid_cell_key(s))?;
        Ok(Self::new(member, day_index, row))
    }
}

impl TryFrom<String> for CellKey {
    type Error = ShiftRosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellKey> for String {
    fn from(value: CellKey) -> Self {
        value.to_string()
    }
}

/// Visual style of a cell. Red text carries business meaning (overtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_font_size")]
    pub font_size: u16,
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

const fn default_font_size() -> u16 {
    DEFAULT_FONT_SIZE
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            text_color: default_text_color(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl CellStyle {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial style update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStylePatch {
    pub text_color: Option<String>,
    pub font_size: Option<u16>,
}

impl CellStylePatch {
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            text_color: Some(color.into()),
            font_size: None,
        }
    }

    #[must_use]
    pub const fn font_size(size: u16) -> Self {
        Self {
            text_color: None,
            font_size: Some(size),
        }
    }
}

/// A configured shift type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftOption {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether occurrences are tallied in the per-day summary row.
    #[serde(default)]
    pub include_in_team: bool,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

fn default_background_color() -> String {
    "white".to_owned()
}

impl ShiftOption {
    /// Structured option built from a bare name, with safe defaults.
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            description: String::new(),
            include_in_team: false,
            text_color: default_text_color(),
            background_color: default_background_color(),
        }
    }

    #[must_use]
    pub fn counted(mut self) -> Self {
        self.include_in_team = true;
        self
    }
}

// ============================================================================
// History
// ============================================================================

/// Flavour of a value edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueEditKind {
    /// Empty cell received a configured option.
    AddShift,
    /// Non-empty cell replaced or cleared.
    EditShift,
    /// Free text that matches no configured option.
    TypeShift,
}

/// The five history entry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryKind {
    AddShift,
    EditShift,
    TypeShift,
    ChangeColor,
    ChangeFontSize,
}

/// What an undoable edit changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryChange {
    Value {
        kind: ValueEditKind,
        old: String,
        new: String,
    },
    Color {
        old: String,
        new: String,
    },
    FontSize {
        old: u16,
        new: u16,
    },
}

/// One undoable edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: CellKey,
    pub change: HistoryChange,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(key: CellKey, change: HistoryChange) -> Self {
        Self {
            key,
            change,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> HistoryKind {
        match &self.change {
            HistoryChange::Value { kind, .. } => match kind {
                ValueEditKind::AddShift => HistoryKind::AddShift,
                ValueEditKind::EditShift => HistoryKind::EditShift,
                ValueEditKind::TypeShift => HistoryKind::TypeShift,
            },
            HistoryChange::Color { .. } => HistoryKind::ChangeColor,
            HistoryChange::FontSize { .. } => HistoryKind::ChangeFontSize,
        }
    }
}

// ============================================================================
// Persisted schedule
// ============================================================================

/// Persisted publish status. An absent status means the month is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Draft,
    Published,
}

/// Lifecycle of a department-month: `Unset -> Draft -> Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Unset,
    Draft,
    Published,
}

impl LifecycleState {
    #[must_use]
    pub const fn from_status(status: Option<ScheduleStatus>) -> Self {
        match status {
            None => Self::Unset,
            Some(ScheduleStatus::Draft) => Self::Draft,
            Some(ScheduleStatus::Published) => Self::Published,
        }
    }

    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Both rows of one member-day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCells {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
}

/// `schedules/{department}-{monthKey}` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub month_key: String,
    #[serde(default)]
    pub schedule: BTreeMap<String, BTreeMap<u32, DayCells>>,
    #[serde(default)]
    pub cell_styles: BTreeMap<String, CellStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_by: Option<String>,
}

impl ScheduleDocument {
    /// An empty document for a department-month.
    #[must_use]
    pub fn empty(department: &str, month: MonthKey) -> Self {
        Self {
            department: department.to_owned(),
            month_key: month.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> LifecycleState {
        LifecycleState::from_status(self.status)
    }
}

// ============================================================================
// Derived figures
// ============================================================================

/// Attendance, overtime and pay counters of one member for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub member_id: String,
    pub total_shifts: u32,
    pub working_days: u32,
    /// `max(0, total_shifts - working_days)`.
    pub ot_count: u32,
    /// Cells marked with the overtime colour.
    pub red_shift_count: u32,
    /// Default-coloured evening/night cells (shift allowance basis).
    pub black_bd_count: u32,
}

/// Per-day tally of summary-tracked shift names for one subgroup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day_index: u32,
    pub counts: BTreeMap<String, u32>,
}

impl DaySummary {
    #[must_use]
    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or_default()
    }
}

/// Transient persistence indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// A save is armed and waiting for the quiet interval.
    Pending,
    Saving,
    Saved,
    Failed(String),
}
