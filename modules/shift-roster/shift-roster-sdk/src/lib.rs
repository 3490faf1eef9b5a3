//! Shift Roster SDK
//!
//! This crate provides the public API for the `shift-roster` module:
//! - `ShiftRosterApi` trait for read access from other modules
//! - Schedule models (`CellKey`, `CellStyle`, `ScheduleDocument`, ...)
//! - `ShiftRosterError` for error handling
//!
//! ## Usage
//!
//! ```ignore
//! use shift_roster_sdk::{Actor, MonthKey, ShiftRosterApi};
//!
//! let month: MonthKey = "2026-03".parse()?;
//! let doc = client.load_schedule(&Actor::staff("u-17"), "icu", month).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root for convenience
pub use api::ShiftRosterApi;
pub use error::ShiftRosterError;
pub use models::{
    Actor, ActorKind, CellKey, CellStyle, CellStylePatch, DayCells, DaySummary, HistoryChange,
    HistoryEntry, HistoryKind, Holiday, LifecycleState, Member, MemberPermission, MemberRole,
    MemberSummary, MonthKey, RowType, SaveStatus, ScheduleDocument, ScheduleStatus, ShiftOption,
    Subgroup, ValueEditKind,
};
