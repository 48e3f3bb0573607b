//! Core entity structs: guests, tables, and the combined seating state.
//!
//! Field names serialize in camelCase and optional fields are omitted when
//! absent, matching the JSON the web front end has always persisted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::TableShape;
use crate::ids::{GuestId, TableId};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point (or offset) on the canvas, in canvas units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// The canvas origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this position shifted by `delta`.
    #[must_use]
    pub fn offset(self, delta: Self) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    /// Whether both coordinates are exactly zero.
    pub fn is_zero(self) -> bool {
        self.x.abs() < f64::EPSILON && self.y.abs() < f64::EPSILON
    }

    /// Whether both coordinates are finite. JSON has no encoding for the
    /// others.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Guest
// ---------------------------------------------------------------------------

/// A person to be seated.
///
/// `table_id` and `seat_position` are either both present (seated) or both
/// absent (unassigned) between engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Guest {
    /// Unique guest identifier.
    pub id: GuestId,
    /// Display name, never empty.
    pub name: String,
    /// Table the guest is seated at, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub table_id: Option<TableId>,
    /// Zero-based seat index at `table_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub seat_position: Option<u32>,
    /// Free-form dietary notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub dietary_restrictions: Option<String>,
    /// Free-form planner notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,
}

impl Guest {
    /// Create an unassigned guest with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GuestId::new(),
            name: name.into(),
            table_id: None,
            seat_position: None,
            dietary_restrictions: None,
            notes: None,
        }
    }

    /// Whether the guest currently has a table.
    pub const fn is_seated(&self) -> bool {
        self.table_id.is_some()
    }

    /// The guest's `(table, seat)` pair, if fully placed.
    pub const fn placement(&self) -> Option<(TableId, u32)> {
        match (self.table_id, self.seat_position) {
            (Some(table), Some(seat)) => Some((table, seat)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A capacity-bounded seating unit with numbered seats `0..capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Table {
    /// Unique table identifier.
    pub id: TableId,
    /// Display name.
    pub name: String,
    /// Number of seats.
    pub capacity: u32,
    /// Canvas placement of the table centre.
    #[serde(flatten)]
    pub position: Position,
    /// Outline used when rendering.
    #[serde(default)]
    pub shape: TableShape,
    /// Guests at this table in display order (not seat order).
    #[serde(default)]
    pub guest_ids: Vec<GuestId>,
}

impl Table {
    /// Create an empty round table with a fresh id.
    pub fn new(name: impl Into<String>, capacity: u32, position: Position) -> Self {
        Self {
            id: TableId::new(),
            name: name.into(),
            capacity,
            position,
            shape: TableShape::default(),
            guest_ids: Vec::new(),
        }
    }

    /// Number of guests currently at the table.
    ///
    /// Saturates at `u32::MAX`, which no real table reaches.
    pub fn occupancy(&self) -> u32 {
        u32::try_from(self.guest_ids.len()).unwrap_or(u32::MAX)
    }

    /// Whether every seat is taken.
    pub fn is_full(&self) -> bool {
        self.occupancy() >= self.capacity
    }

    /// Whether the guest is listed at this table.
    pub fn has_guest(&self, guest: GuestId) -> bool {
        self.guest_ids.contains(&guest)
    }
}

// ---------------------------------------------------------------------------
// Seating state
// ---------------------------------------------------------------------------

/// The complete guest and table collections at one point in time.
///
/// This is the unit of persistence and of undo/redo snapshots. Both
/// collections are kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeatingState {
    /// All guests.
    pub guests: Vec<Guest>,
    /// All tables.
    pub tables: Vec<Table>,
}

impl SeatingState {
    /// Create a state from existing collections.
    pub const fn new(guests: Vec<Guest>, tables: Vec<Table>) -> Self {
        Self { guests, tables }
    }

    /// Whether both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty() && self.tables.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn guest_serializes_camel_case_and_omits_absent_fields() {
        let mut guest = Guest::new("Ada Lovelace");
        let json = serde_json::to_value(&guest).unwrap();
        assert!(json.get("tableId").is_none());
        assert!(json.get("seatPosition").is_none());

        let table = TableId::new();
        guest.table_id = Some(table);
        guest.seat_position = Some(3);
        let json = serde_json::to_value(&guest).unwrap();
        assert_eq!(json["tableId"], serde_json::json!(table.to_string()));
        assert_eq!(json["seatPosition"], serde_json::json!(3));
    }

    #[test]
    fn table_position_is_flattened() {
        let table = Table::new("Table 1", 8, Position::new(200.0, 250.0));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["x"], serde_json::json!(200.0));
        assert_eq!(json["y"], serde_json::json!(250.0));
        assert_eq!(json["shape"], serde_json::json!("round"));
        assert_eq!(json["guestIds"], serde_json::json!([]));
    }

    #[test]
    fn table_parses_front_end_json() {
        let raw = r#"{
            "id": "6f1c2b4e-8d2a-4f7e-9a57-2f0a3c1d9b10",
            "name": "Head Table",
            "capacity": 10,
            "x": 120.5,
            "y": 80,
            "shape": "rectangular",
            "guestIds": []
        }"#;
        let table: Table = serde_json::from_str(raw).unwrap();
        assert_eq!(table.name, "Head Table");
        assert_eq!(table.capacity, 10);
        assert_eq!(table.shape, TableShape::Rectangular);
        assert!((table.position.x - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn placement_requires_both_fields() {
        let mut guest = Guest::new("Grace");
        guest.table_id = Some(TableId::new());
        assert!(guest.is_seated());
        assert!(guest.placement().is_none());
        guest.seat_position = Some(0);
        assert!(guest.placement().is_some());
    }

    #[test]
    fn full_table_detection() {
        let mut table = Table::new("T", 1, Position::ORIGIN);
        assert!(!table.is_full());
        table.guest_ids.push(GuestId::new());
        assert!(table.is_full());
    }

    #[test]
    fn position_offset_and_zero() {
        let moved = Position::new(1.0, 2.0).offset(Position::new(-1.0, 3.0));
        assert!((moved.x).abs() < f64::EPSILON);
        assert!((moved.y - 5.0).abs() < f64::EPSILON);
        assert!(Position::ORIGIN.is_zero());
        assert!(!moved.is_zero());
    }
}
