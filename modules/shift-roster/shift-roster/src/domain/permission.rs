//! Mutation gate for schedule commands.
//!
//! Supervisors are always permitted. Staff need an explicit
//! `editSchedule: true` record; a missing record denies.

use std::collections::HashMap;

use shift_roster_sdk::{Actor, MemberPermission};

use super::error::DomainError;

/// Permission records keyed by member id.
pub type PermissionMap = HashMap<String, MemberPermission>;

/// Whether `actor` may mutate the schedule.
#[must_use]
pub fn can_edit(actor: &Actor, permissions: &PermissionMap) -> bool {
    actor.is_supervisor()
        || permissions
            .get(&actor.id)
            .is_some_and(|p| p.edit_schedule)
}

/// Checks the edit permission of `actor`.
///
/// # Errors
///
/// Returns `PermissionDenied` for staff without an `editSchedule` grant.
pub fn check(actor: &Actor, permissions: &PermissionMap) -> Result<(), DomainError> {
    if can_edit(actor, permissions) {
        Ok(())
    } else {
        Err(DomainError::permission_denied(actor.id.as_str()))
    }
}

/// Checks that `actor` is a supervisor.
///
/// # Errors
///
/// Returns `SupervisorOnly` naming `operation` for any other actor.
pub fn require_supervisor(actor: &Actor, operation: &'static str) -> Result<(), DomainError> {
    if actor.is_supervisor() {
        Ok(())
    } else {
        Err(DomainError::supervisor_only(operation))
    }
}
