//! Shift Roster Module Implementation
//!
//! Monthly shift-assignment grid engine for a hospital department. The
//! public read API is defined in `shift-roster-sdk` and re-exported here.
//!
//! ## Architecture
//!
//! - **Cell store**: sparse `(member, day, row)` values and styles, mutated only
//!   through `set` / `set_style`
//! - **Session**: one owned state object per open department-month; commands
//!   pass the permission gate, record undo history and arm a debounced autosave
//! - **Document store**: `get` / `set` / `update` over JSON documents, with an
//!   in-memory implementation

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === PUBLIC API (from SDK) ===
pub use shift_roster_sdk::{
    Actor, CellKey, CellStyle, LifecycleState, MonthKey, ScheduleDocument, ShiftRosterApi,
    ShiftRosterError,
};

// === CONFIGURATION ===
pub mod config;
pub use config::ShiftRosterConfig;

// === LOCAL CLIENT ===
pub mod local_client;
pub use local_client::ShiftRosterLocalClient;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
