//! Domain error types for the Shift Roster module.

use shift_roster_sdk::ShiftRosterError;
use thiserror::Error;

/// Domain-level errors for the Shift Roster module.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The actor may not mutate this schedule.
    #[error("Permission denied: {actor_id} may not edit the schedule")]
    PermissionDenied { actor_id: String },

    /// The operation is reserved for supervisors.
    #[error("Supervisor only: {operation}")]
    SupervisorOnly { operation: &'static str },

    /// A cell outside the open month or roster.
    #[error("Invalid cell {key}: {reason}")]
    InvalidCell { key: String, reason: &'static str },

    /// A holiday date outside the month.
    #[error("Invalid holiday: day {date} is not in {month}")]
    InvalidHoliday { date: u8, month: String },

    /// A stored document could not be decoded.
    #[error("Malformed document {collection}/{id}: {source}")]
    MalformedDocument {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document store rejected a call.
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn permission_denied(actor_id: impl Into<String>) -> Self {
        Self::PermissionDenied {
            actor_id: actor_id.into(),
        }
    }

    #[must_use]
    pub const fn supervisor_only(operation: &'static str) -> Self {
        Self::SupervisorOnly { operation }
    }

    #[must_use]
    pub fn invalid_cell(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidCell {
            key: key.into(),
            reason,
        }
    }

    #[must_use]
    pub fn invalid_holiday(date: u8, month: impl Into<String>) -> Self {
        Self::InvalidHoliday {
            date,
            month: month.into(),
        }
    }

    #[must_use]
    pub fn malformed(collection: &str, id: &str, source: serde_json::Error) -> Self {
        Self::MalformedDocument {
            collection: collection.to_owned(),
            id: id.to_owned(),
            source,
        }
    }

    /// Returns `true` for both permission-gate rejections.
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. } | Self::SupervisorOnly { .. }
        )
    }
}

impl From<DomainError> for ShiftRosterError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::PermissionDenied { .. } | DomainError::SupervisorOnly { .. } => {
                Self::permission_denied(e.to_string())
            }
            DomainError::InvalidCell { .. } | DomainError::InvalidHoliday { .. } => {
                Self::validation(e.to_string())
            }
            DomainError::MalformedDocument { .. } => Self::internal(e.to_string()),
            DomainError::Storage(source) => Self::storage(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::permission_denied("u-17");
        assert_eq!(
            err.to_string(),
            "Permission denied: u-17 may not edit the schedule"
        );

        let err = DomainError::supervisor_only("publish");
        assert_eq!(err.to_string(), "Supervisor only: publish");
    }

    #[test]
    fn test_denials_map_to_sdk_permission_denied() {
        assert!(DomainError::permission_denied("u-17").is_denied());
        let sdk: ShiftRosterError = DomainError::supervisor_only("publish").into();
        assert!(sdk.is_permission_denied());
    }

    #[test]
    fn test_invalid_holiday_maps_to_validation() {
        let err = DomainError::invalid_holiday(31, "2026-02");
        assert_eq!(err.to_string(), "Invalid holiday: day 31 is not in 2026-02");
        let sdk: ShiftRosterError = err.into();
        assert!(matches!(sdk, ShiftRosterError::Validation(_)));
    }

    #[test]
    fn test_invalid_cell_maps_to_validation() {
        let err = DomainError::invalid_cell("ghost-400-top", "day outside the month");
        assert_eq!(
            err.to_string(),
            "Invalid cell ghost-400-top: day outside the month"
        );
        let sdk: ShiftRosterError = err.into();
        assert!(matches!(sdk, ShiftRosterError::Validation(_)));
    }

    #[test]
    fn test_storage_maps_to_sdk_storage() {
        let err: DomainError = anyhow::anyhow!("offline").into();
        assert!(!err.is_denied());
        let sdk: ShiftRosterError = err.into();
        assert_eq!(sdk, ShiftRosterError::storage("offline"));
    }
}
