//! Domain layer for the Shift Roster module.
//!
//! Contains the grid state, derived metrics, auto-assignment, lifecycle
//! rules, the editing session and the document store trait.

pub mod auto_assign;
pub mod autosave;
pub mod calendar;
pub mod cells;
pub mod documents;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod metrics;
pub mod permission;
pub mod repo;
pub mod service;
pub mod session;

pub use error::DomainError;
pub use repo::DocumentStore;
pub use service::ShiftRosterService;
pub use session::{CommandOutcome, ScheduleCommand, ScheduleSession};
