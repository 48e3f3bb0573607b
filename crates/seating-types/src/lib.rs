//! Shared type definitions for the seating planner.
//!
//! This crate is the single source of truth for the guest/table data model
//! used across the workspace. Types flow downstream to `TypeScript` via
//! `ts-rs` for the web front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for guest and table identifiers
//! - [`enums`] -- Enumeration types (table shape)
//! - [`structs`] -- Entity structs (guest, table, position, seating state)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::TableShape;
pub use ids::{GuestId, TableId};
pub use structs::{Guest, Position, SeatingState, Table};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::GuestId::export_all();
        let _ = crate::ids::TableId::export_all();
        let _ = crate::enums::TableShape::export_all();
        let _ = crate::structs::Position::export_all();
        let _ = crate::structs::Guest::export_all();
        let _ = crate::structs::Table::export_all();
        let _ = crate::structs::SeatingState::export_all();
    }
}
