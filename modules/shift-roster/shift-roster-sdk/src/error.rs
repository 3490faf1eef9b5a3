//! Public error types for the `shift-roster` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors that can be returned by the `ShiftRosterApi`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftRosterError {
    /// The actor is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A month key could not be parsed.
    #[error("Invalid month key: {0}")]
    InvalidMonth(String),

    /// A cell key could not be parsed.
    #[error("Invalid cell key: {0}")]
    InvalidCellKey(String),

    /// A command argument was rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The document store rejected a call.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShiftRosterError {
    /// Creates a `PermissionDenied` error.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Creates an `InvalidMonth` error.
    #[must_use]
    pub fn invalid_month(raw: impl Into<String>) -> Self {
        Self::InvalidMonth(raw.into())
    }

    /// Creates an `InvalidCellKey` error.
    #[must_use]
    pub fn invalid_cell_key(raw: impl Into<String>) -> Self {
        Self::InvalidCellKey(raw.into())
    }

    /// Creates a `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns `true` if this is a permission denial.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Returns `true` if this is a storage failure.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
