//! Seating assignment engine for the seating planner.
//!
//! Guests are assigned to numbered seats at capacity-bounded tables. Every
//! command either applies completely or leaves the state untouched, and
//! every applied command can be undone.
//!
//! # Modules
//!
//! - [`store`] -- [`EntityStore`]: the guest and table collections with
//!   create/delete/rename/move/clear and the paired seat primitives.
//! - [`assign`] -- Seat assignment with swap and eviction on conflicts.
//! - [`history`] -- Bounded snapshot history for undo/redo.
//! - [`import`] -- Guest-list parsing (RSVP export or one name per line).
//! - [`invariants`] -- Consistency checks and repair of untrusted state.
//! - [`engine`] -- [`SeatingEngine`], the façade the presentation layer
//!   drives.
//! - [`viewport`] -- Canvas zoom/pan geometry.
//! - [`config`] -- YAML configuration.
//! - [`error`] -- [`SeatingError`] and its [`ErrorKind`] grouping.

pub mod assign;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod import;
pub mod invariants;
pub mod store;
pub mod viewport;

pub use assign::Placement;
pub use config::{ConfigError, PlannerConfig};
pub use engine::{ImportReport, SeatingEngine};
pub use error::{ErrorKind, SeatingError};
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use import::{ImportBatch, ImportFormat, parse_guest_list};
pub use invariants::InvariantViolation;
pub use store::EntityStore;
pub use viewport::{Bounds, Size, Viewport};
