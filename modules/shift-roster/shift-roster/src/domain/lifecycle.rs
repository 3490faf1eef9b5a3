//! Draft / publish lifecycle and read visibility.

use shift_roster_sdk::{Actor, LifecycleState, ScheduleStatus};

/// Supervisor-only lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    SaveDraft,
    Publish,
}

impl LifecycleAction {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SaveDraft => "save_draft",
            Self::Publish => "publish",
        }
    }
}

/// State after applying `action` to `current`. Published is terminal.
#[must_use]
pub const fn next_state(current: LifecycleState, action: LifecycleAction) -> LifecycleState {
    match (current, action) {
        (LifecycleState::Published, _) | (_, LifecycleAction::Publish) => LifecycleState::Published,
        (_, LifecycleAction::SaveDraft) => LifecycleState::Draft,
    }
}

/// Persisted status for a state; `Unset` has none.
#[must_use]
pub const fn status_of(state: LifecycleState) -> Option<ScheduleStatus> {
    match state {
        LifecycleState::Unset => None,
        LifecycleState::Draft => Some(ScheduleStatus::Draft),
        LifecycleState::Published => Some(ScheduleStatus::Published),
    }
}

/// Whether `action` on `current` sets the publish stamp.
///
/// Only the first publish stamps; re-publishing keeps the original.
#[must_use]
pub const fn stamps_publish(current: LifecycleState, action: LifecycleAction) -> bool {
    matches!(action, LifecycleAction::Publish) && !current.is_published()
}

/// Whether `actor` may see the stored content of a month in `state`.
#[must_use]
pub const fn can_view(actor: &Actor, state: LifecycleState) -> bool {
    actor.is_supervisor() || state.is_published()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use LifecycleAction::{Publish, SaveDraft};
        use LifecycleState::{Draft, Published, Unset};

        assert_eq!(next_state(Unset, SaveDraft), Draft);
        assert_eq!(next_state(Draft, SaveDraft), Draft);
        assert_eq!(next_state(Unset, Publish), Published);
        assert_eq!(next_state(Draft, Publish), Published);
        // publish is one-way
        assert_eq!(next_state(Published, SaveDraft), Published);
        assert_eq!(next_state(Published, Publish), Published);
    }

    #[test]
    fn test_publish_stamp_only_once() {
        assert!(stamps_publish(LifecycleState::Draft, LifecycleAction::Publish));
        assert!(stamps_publish(LifecycleState::Unset, LifecycleAction::Publish));
        assert!(!stamps_publish(LifecycleState::Published, LifecycleAction::Publish));
        assert!(!stamps_publish(LifecycleState::Draft, LifecycleAction::SaveDraft));
    }

    #[test]
    fn test_visibility() {
        let boss = Actor::supervisor("boss");
        let staff = Actor::staff("u1");
        for state in [LifecycleState::Unset, LifecycleState::Draft, LifecycleState::Published] {
            assert!(can_view(&boss, state));
        }
        assert!(!can_view(&staff, LifecycleState::Unset));
        assert!(!can_view(&staff, LifecycleState::Draft));
        assert!(can_view(&staff, LifecycleState::Published));
    }

    #[test]
    fn test_status_of() {
        assert_eq!(status_of(LifecycleState::Unset), None);
        assert_eq!(
            LifecycleState::from_status(status_of(LifecycleState::Draft)),
            LifecycleState::Draft
        );
    }
}
