//! The entity store: authoritative guest and table collections.
//!
//! [`EntityStore`] owns a [`SeatingState`] and exposes queries plus the
//! simple mutations (create, delete, rename, move, clear). Seat conflicts and
//! swaps live in [`crate::assign`], built on the paired seat primitives
//! below.
//!
//! `guest.table_id` / `guest.seat_position` and `table.guest_ids` describe
//! the same relation from two sides. Outside this module they are only ever
//! changed together, through [`EntityStore::seat`], [`EntityStore::unseat`]
//! and [`EntityStore::swap_placements`]. Every public mutation validates its
//! inputs before touching anything, so a returned error means the state is
//! unchanged.

use std::collections::BTreeSet;

use seating_types::{Guest, GuestId, Position, SeatingState, Table, TableId};

use crate::error::SeatingError;

/// Holder of the guest and table collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    state: SeatingState,
}

impl EntityStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            state: SeatingState {
                guests: Vec::new(),
                tables: Vec::new(),
            },
        }
    }

    /// Wrap existing collections as-is.
    ///
    /// The state is trusted; run [`crate::invariants::repair`] first when it
    /// comes from outside the engine.
    pub const fn from_state(state: SeatingState) -> Self {
        Self { state }
    }

    /// The current collections.
    pub const fn state(&self) -> &SeatingState {
        &self.state
    }

    /// Consume the store, returning its collections.
    pub fn into_state(self) -> SeatingState {
        self.state
    }

    /// Replace everything, used when history restores a snapshot.
    pub(crate) fn restore(&mut self, state: SeatingState) {
        self.state = state;
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// All guests in insertion order.
    pub fn guests(&self) -> &[Guest] {
        &self.state.guests
    }

    /// All tables in insertion order.
    pub fn tables(&self) -> &[Table] {
        &self.state.tables
    }

    /// Look up a guest.
    pub fn guest(&self, id: GuestId) -> Option<&Guest> {
        self.state.guests.iter().find(|g| g.id == id)
    }

    /// Look up a table.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.state.tables.iter().find(|t| t.id == id)
    }

    fn guest_mut(&mut self, id: GuestId) -> Option<&mut Guest> {
        self.state.guests.iter_mut().find(|g| g.id == id)
    }

    fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.state.tables.iter_mut().find(|t| t.id == id)
    }

    /// Guests without a table, in insertion order.
    pub fn unassigned_guests(&self) -> Vec<&Guest> {
        self.state.guests.iter().filter(|g| !g.is_seated()).collect()
    }

    /// Unassigned guests whose name contains `query`, ignoring case.
    ///
    /// An empty (or all-whitespace) query matches every unassigned guest.
    pub fn search_unassigned(&self, query: &str) -> Vec<&Guest> {
        let needle = query.trim().to_lowercase();
        self.state
            .guests
            .iter()
            .filter(|g| !g.is_seated())
            .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// The guest holding `seat` at `table`, if any.
    pub fn seat_occupant(&self, table: TableId, seat: u32) -> Option<GuestId> {
        self.state
            .guests
            .iter()
            .find(|g| g.table_id == Some(table) && g.seat_position == Some(seat))
            .map(|g| g.id)
    }

    /// Seat indices currently taken at `table`.
    pub fn occupied_seats(&self, table: TableId) -> BTreeSet<u32> {
        self.state
            .guests
            .iter()
            .filter(|g| g.table_id == Some(table))
            .filter_map(|g| g.seat_position)
            .collect()
    }

    /// Lowest seat index not taken at `table`.
    ///
    /// Returns `None` if the table does not exist or every seat is taken.
    pub fn first_free_seat(&self, table: TableId) -> Option<u32> {
        let capacity = self.table(table)?.capacity;
        let occupied = self.occupied_seats(table);
        (0..capacity).find(|seat| !occupied.contains(seat))
    }

    /// One slot per seat at `table`, holding the occupant if there is one.
    pub fn seat_map(&self, table: TableId) -> Option<Vec<Option<GuestId>>> {
        let capacity = self.table(table)?.capacity;
        Some(
            (0..capacity)
                .map(|seat| self.seat_occupant(table, seat))
                .collect(),
        )
    }

    /// Where the next new table goes: staggered diagonally from `origin`.
    pub fn next_table_position(&self, origin: f64, spacing: f64) -> Position {
        let offset = f64::from(self.table_count()) * spacing;
        Position::new(origin + offset, origin + offset)
    }

    fn table_count(&self) -> u32 {
        u32::try_from(self.state.tables.len()).unwrap_or(u32::MAX)
    }

    // -------------------------------------------------------------------
    // Simple mutations
    // -------------------------------------------------------------------

    /// Create an unassigned guest.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::EmptyName`] if `name` trims to empty.
    pub fn create_guest(&mut self, name: &str) -> Result<GuestId, SeatingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SeatingError::EmptyName);
        }
        let guest = Guest::new(name);
        let id = guest.id;
        self.state.guests.push(guest);
        Ok(id)
    }

    /// Create an empty table named `Table N`.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidCapacity`] if `capacity` is zero.
    pub fn create_table(
        &mut self,
        capacity: u32,
        position: Position,
    ) -> Result<TableId, SeatingError> {
        if capacity == 0 {
            return Err(SeatingError::InvalidCapacity { capacity });
        }
        if !position.is_finite() {
            return Err(SeatingError::NonFinitePosition {
                operation: "create_table",
            });
        }
        let name = format!("Table {}", self.table_count().saturating_add(1));
        let table = Table::new(name, capacity, position);
        let id = table.id;
        self.state.tables.push(table);
        Ok(id)
    }

    /// Delete a guest, freeing their seat first.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::GuestNotFound`] if the guest does not exist.
    pub fn delete_guest(&mut self, id: GuestId) -> Result<Guest, SeatingError> {
        if self.guest(id).is_none() {
            return Err(SeatingError::GuestNotFound(id));
        }
        self.unseat(id);
        let index = self
            .state
            .guests
            .iter()
            .position(|g| g.id == id)
            .ok_or(SeatingError::GuestNotFound(id))?;
        Ok(self.state.guests.remove(index))
    }

    /// Delete a table, unassigning everyone who sat there.
    ///
    /// Returns the removed table and the guests that were unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::TableNotFound`] if the table does not exist.
    pub fn delete_table(&mut self, id: TableId) -> Result<(Table, Vec<GuestId>), SeatingError> {
        let index = self
            .state
            .tables
            .iter()
            .position(|t| t.id == id)
            .ok_or(SeatingError::TableNotFound(id))?;
        let released = self.release_all(id);
        let table = self.state.tables.remove(index);
        Ok((table, released))
    }

    /// Rename a table. The stored name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::TableNotFound`] for an unknown table and
    /// [`SeatingError::Unchanged`] if the name is blank or identical.
    pub fn rename_table(&mut self, id: TableId, name: &str) -> Result<(), SeatingError> {
        let name = name.trim();
        let table = self.table_mut(id).ok_or(SeatingError::TableNotFound(id))?;
        if name.is_empty() || table.name == name {
            return Err(SeatingError::Unchanged {
                operation: "rename_table",
            });
        }
        name.clone_into(&mut table.name);
        Ok(())
    }

    /// Shift a table by `delta`. The canvas is unbounded.
    ///
    /// Returns the new position.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::TableNotFound`] for an unknown table,
    /// [`SeatingError::Unchanged`] for a zero delta, and
    /// [`SeatingError::NonFinitePosition`] if the result would overflow.
    pub fn move_table(&mut self, id: TableId, delta: Position) -> Result<Position, SeatingError> {
        let table = self.table_mut(id).ok_or(SeatingError::TableNotFound(id))?;
        if delta.is_zero() {
            return Err(SeatingError::Unchanged {
                operation: "move_table",
            });
        }
        let moved = table.position.offset(delta);
        if !moved.is_finite() {
            return Err(SeatingError::NonFinitePosition {
                operation: "move_table",
            });
        }
        table.position = moved;
        Ok(moved)
    }

    /// Unassign every guest at a table in one step.
    ///
    /// Returns the guests that were unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::TableNotFound`] for an unknown table and
    /// [`SeatingError::Unchanged`] if nobody sits there.
    pub fn clear_table(&mut self, id: TableId) -> Result<Vec<GuestId>, SeatingError> {
        let table = self.table(id).ok_or(SeatingError::TableNotFound(id))?;
        let anyone_seated = !table.guest_ids.is_empty()
            || self.state.guests.iter().any(|g| g.table_id == Some(id));
        if !anyone_seated {
            return Err(SeatingError::Unchanged {
                operation: "clear_table",
            });
        }
        Ok(self.release_all(id))
    }

    /// Clear every guest's reference to `table` and empty its guest list.
    fn release_all(&mut self, table: TableId) -> Vec<GuestId> {
        let mut released = Vec::new();
        for guest in &mut self.state.guests {
            if guest.table_id == Some(table) {
                guest.table_id = None;
                guest.seat_position = None;
                released.push(guest.id);
            }
        }
        if let Some(t) = self.table_mut(table) {
            t.guest_ids.clear();
        }
        released
    }

    // -------------------------------------------------------------------
    // Paired seat primitives
    // -------------------------------------------------------------------

    /// Remove a guest from their table, updating both sides.
    ///
    /// Returns the `(table, seat)` the guest left, or `None` if they were
    /// not seated. Other guests keep their seat numbers.
    pub(crate) fn unseat(&mut self, guest: GuestId) -> Option<(TableId, u32)> {
        let g = self.guest_mut(guest)?;
        let table = g.table_id.take();
        let seat = g.seat_position.take();
        let table = table?;
        if let Some(t) = self.table_mut(table) {
            t.guest_ids.retain(|id| *id != guest);
        }
        seat.map(|s| (table, s))
    }

    /// Place an unseated guest at `(table, seat)`, updating both sides.
    ///
    /// Callers have already checked that the seat is free and in range.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if either entity is missing; nothing is
    /// changed in that case.
    pub(crate) fn seat(
        &mut self,
        guest: GuestId,
        table: TableId,
        seat: u32,
    ) -> Result<(), SeatingError> {
        if self.table(table).is_none() {
            return Err(SeatingError::TableNotFound(table));
        }
        let g = self.guest_mut(guest).ok_or(SeatingError::GuestNotFound(guest))?;
        g.table_id = Some(table);
        g.seat_position = Some(seat);
        if let Some(t) = self.table_mut(table)
            && !t.has_guest(guest)
        {
            t.guest_ids.push(guest);
        }
        Ok(())
    }

    /// Exchange the placements of two seated guests in one step.
    ///
    /// Each guest's id takes the other's slot in the table guest lists, so
    /// display order and table counts are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::NotSeated`] if either guest lacks a full
    /// placement, or a not-found error; nothing is changed in either case.
    pub(crate) fn swap_placements(&mut self, a: GuestId, b: GuestId) -> Result<(), SeatingError> {
        let (table_a, seat_a) = self
            .guest(a)
            .ok_or(SeatingError::GuestNotFound(a))?
            .placement()
            .ok_or(SeatingError::NotSeated(a))?;
        let (table_b, seat_b) = self
            .guest(b)
            .ok_or(SeatingError::GuestNotFound(b))?
            .placement()
            .ok_or(SeatingError::NotSeated(b))?;

        if table_a != table_b {
            if let Some(t) = self.table_mut(table_a) {
                replace_id(&mut t.guest_ids, a, b);
            }
            if let Some(t) = self.table_mut(table_b) {
                replace_id(&mut t.guest_ids, b, a);
            }
        }
        if let Some(g) = self.guest_mut(a) {
            g.table_id = Some(table_b);
            g.seat_position = Some(seat_b);
        }
        if let Some(g) = self.guest_mut(b) {
            g.table_id = Some(table_a);
            g.seat_position = Some(seat_a);
        }
        Ok(())
    }
}

/// Replace `from` with `to` in place.
fn replace_id(ids: &mut [GuestId], from: GuestId, to: GuestId) {
    for id in ids.iter_mut().filter(|id| **id == from) {
        *id = to;
    }
}
