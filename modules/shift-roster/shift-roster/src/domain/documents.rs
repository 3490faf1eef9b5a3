//! Conversions between stored documents and domain state.
//!
//! Configuration documents written by older clients come in several
//! shapes; they are normalized here and never rejected.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use shift_roster_sdk::{
    CellKey, CellStyle, CellStylePatch, DayCells, Holiday, Member, MemberPermission, MonthKey, RowType,
    ScheduleDocument, ScheduleStatus, ShiftOption,
};
use time::OffsetDateTime;

use super::cells::CellStore;
use super::error::DomainError;
use super::permission::PermissionMap;

/// Rebuilds a cell store from a schedule document.
///
/// Style entries with unparsable keys are dropped.
#[must_use]
pub fn cells_from_document(doc: &ScheduleDocument) -> CellStore {
    let mut cells = CellStore::new();
    for (member_id, days) in &doc.schedule {
        for (day_index, day) in days {
            for (row, value) in [(RowType::Top, &day.top), (RowType::Bottom, &day.bottom)] {
                if let Some(value) = value {
                    cells.set(CellKey::new(member_id.as_str(), *day_index, row), value.as_str());
                }
            }
        }
    }
    for (raw_key, style) in &doc.cell_styles {
        match raw_key.parse::<CellKey>() {
            Ok(key) => {
                cells.set_style(
                    key,
                    CellStylePatch {
                        text_color: Some(style.text_color.clone()),
                        font_size: Some(style.font_size),
                    },
                );
            }
            Err(e) => tracing::warn!(key = %raw_key, error = %e, "Dropping style with bad cell key"),
        }
    }
    cells
}

/// Nested value map of the persisted `schedule` field.
pub type ScheduleMap = BTreeMap<String, BTreeMap<u32, DayCells>>;

/// `schedule` and `cellStyles` fields for a cell store. Default styles are
/// not persisted.
#[must_use]
pub fn document_content(cells: &CellStore) -> (ScheduleMap, BTreeMap<String, CellStyle>) {
    let mut schedule = ScheduleMap::new();
    for (key, value) in cells.values() {
        let day = schedule
            .entry(key.member_id.clone())
            .or_default()
            .entry(key.day_index)
            .or_default();
        let slot = match key.row {
            RowType::Top => &mut day.top,
            RowType::Bottom => &mut day.bottom,
        };
        *slot = Some(value.to_owned());
    }
    let styles = cells
        .styles()
        .filter(|(_, style)| !style.is_default())
        .map(|(key, style)| (key.to_string(), style.clone()))
        .collect();
    (schedule, styles)
}

/// Top-level fields merged into `schedules/{department}-{monthKey}`.
///
/// Autosaves leave `status` and the publish stamp out so the stored
/// lifecycle is untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    pub department: String,
    pub month_key: String,
    pub schedule: ScheduleMap,
    pub cell_styles: BTreeMap<String, CellStyle>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub updated_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_by: Option<String>,
}

impl SchedulePatch {
    /// Content snapshot of `cells`, stamped now by `actor_id`.
    #[must_use]
    pub fn snapshot(department: &str, month: MonthKey, cells: &CellStore, actor_id: &str) -> Self {
        let (schedule, cell_styles) = document_content(cells);
        Self {
            department: department.to_owned(),
            month_key: month.to_string(),
            schedule,
            cell_styles,
            updated_at: OffsetDateTime::now_utc(),
            updated_by: actor_id.to_owned(),
            status: None,
            published_at: None,
            published_by: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<ScheduleStatus>) -> Self {
        self.status = status;
        self
    }

    /// Stamps `publishedAt/By` with the update time and actor.
    #[must_use]
    pub fn with_publish_stamp(mut self) -> Self {
        self.published_at = Some(self.updated_at);
        self.published_by = Some(self.updated_by.clone());
        self
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Decodes a stored schedule document.
///
/// # Errors
///
/// Returns `MalformedDocument` if the value does not match the schema.
pub fn schedule_from_value(
    collection: &str,
    id: &str,
    value: Value,
) -> Result<ScheduleDocument, DomainError> {
    serde_json::from_value(value).map_err(|e| DomainError::malformed(collection, id, e))
}

/// Array stored either bare or under `field`.
fn list_field<'a>(value: &'a Value, field: &str) -> &'a [Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get(field)
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    }
}

/// Roster from `teams/{department}`. Members without a usable role get
/// the `other` role; entries without an id are dropped.
#[must_use]
pub fn members_from_value(value: &Value) -> Vec<Member> {
    list_field(value, "members")
        .iter()
        .filter_map(|item| {
            let mut item = item.clone();
            if let Value::Object(map) = &mut item
                && map.get("role").is_some_and(|role| !role.is_string())
            {
                map.remove("role");
            }
            match serde_json::from_value::<Member>(item) {
                Ok(member) => Some(member),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed roster entry");
                    None
                }
            }
        })
        .collect()
}

/// Options from `shiftOptions/{department}`. Bare names become structured
/// options that are not counted in the daily summary.
#[must_use]
pub fn options_from_value(value: &Value) -> Vec<ShiftOption> {
    list_field(value, "options")
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(ShiftOption::from_name(name.as_str())),
            Value::Object(_) => match serde_json::from_value::<ShiftOption>(item.clone()) {
                Ok(mut option) => {
                    if option.id.is_empty() {
                        option.id.clone_from(&option.name);
                    }
                    Some(option)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed shift option");
                    None
                }
            },
            _ => None,
        })
        .collect()
}

/// Permission map from `permissions/{department}`.
///
/// Entries are either `{ editSchedule }` records or bare booleans; other
/// shapes grant nothing.
#[must_use]
pub fn permissions_from_value(value: &Value) -> PermissionMap {
    let Some(map) = value.as_object() else {
        return PermissionMap::new();
    };
    let map = map
        .get("permissions")
        .and_then(Value::as_object)
        .unwrap_or(map);
    map.iter()
        .filter_map(|(member_id, entry)| {
            let permission = match entry {
                Value::Bool(edit_schedule) => MemberPermission {
                    edit_schedule: *edit_schedule,
                },
                Value::Object(_) => serde_json::from_value(entry.clone()).ok()?,
                _ => return None,
            };
            Some((member_id.clone(), permission))
        })
        .collect()
}

/// Holidays from `holidays/{department}-{monthKey}`.
#[must_use]
pub fn holidays_from_value(value: &Value) -> Vec<Holiday> {
    list_field(value, "holidays")
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

/// Document body written to `holidays/{department}-{monthKey}`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn holidays_document(holidays: &[Holiday]) -> Result<Value, serde_json::Error> {
    #[derive(Serialize)]
    struct HolidaysDoc<'a> {
        holidays: &'a [Holiday],
    }
    serde_json::to_value(HolidaysDoc { holidays })
}
