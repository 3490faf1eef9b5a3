//! Infrastructure layer for the Shift Roster module.
//!
//! Contains the document store implementations.

pub mod storage;

pub use storage::InMemoryDocumentStore;
