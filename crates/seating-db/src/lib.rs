//! Persistence layer for the seating planner.
//!
//! The engine itself never touches storage. After each state-producing
//! command the caller hands the new state to a [`StateStore`], which writes
//! guests and tables as JSON under two keys of a [`KeyValueStore`]. On
//! startup the same keys are read back; anything unreadable falls back to
//! an empty collection.
//!
//! # Modules
//!
//! - [`kv`] -- The [`KeyValueStore`] trait with file and in-memory backends
//! - [`state_store`] -- Load/save of a whole `SeatingState`
//! - [`error`] -- Shared error types

pub mod error;
pub mod kv;
pub mod state_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use state_store::{GUESTS_KEY, StateStore, TABLES_KEY};
