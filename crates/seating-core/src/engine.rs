//! The seating engine: single owner of the store and its history.
//!
//! Every command runs against the [`EntityStore`] and, on success, commits
//! the resulting state to [`History`]. A rejected command leaves both
//! untouched. Callers only ever get shared references to the state.

use seating_types::{Guest, GuestId, Position, SeatingState, Table, TableId};
use tracing::{debug, info, warn};

use crate::assign::{self, Placement};
use crate::config::{PlannerConfig, TableConfig};
use crate::error::SeatingError;
use crate::history::History;
use crate::import::{self, ImportFormat};
use crate::invariants;
use crate::store::EntityStore;

/// Outcome of a successful guest-list import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Layout the payload was read as.
    pub format: ImportFormat,
    /// Ids of the created guests, in file order.
    pub imported: Vec<GuestId>,
}

/// Façade over the entity store and undo history.
#[derive(Debug, Clone)]
pub struct SeatingEngine {
    store: EntityStore,
    history: History,
    tables: TableConfig,
}

impl SeatingEngine {
    /// Adopt `state` (typically loaded from storage) as the starting point.
    ///
    /// The state is repaired first, so inconsistent persisted data never
    /// reaches the store. It becomes snapshot 0 of the history.
    pub fn new(mut state: SeatingState, config: &PlannerConfig) -> Self {
        let fixes = invariants::repair(&mut state);
        if fixes > 0 {
            warn!(fixes, "Repaired inconsistent seating state");
        }
        info!(
            guests = state.guests.len(),
            tables = state.tables.len(),
            history_limit = config.history.limit,
            "Seating engine ready"
        );
        Self {
            history: History::new(state.clone(), config.history.limit),
            store: EntityStore::from_state(state),
            tables: config.tables.clone(),
        }
    }

    /// An engine with no guests or tables.
    pub fn empty(config: &PlannerConfig) -> Self {
        Self::new(SeatingState::default(), config)
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// The authoritative state.
    pub const fn state(&self) -> &SeatingState {
        self.store.state()
    }

    /// All guests in insertion order.
    pub fn guests(&self) -> &[Guest] {
        self.store.guests()
    }

    /// All tables in insertion order.
    pub fn tables(&self) -> &[Table] {
        self.store.tables()
    }

    /// Look up a guest.
    pub fn guest(&self, id: GuestId) -> Option<&Guest> {
        self.store.guest(id)
    }

    /// Look up a table.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.store.table(id)
    }

    /// Guests without a table.
    pub fn unassigned_guests(&self) -> Vec<&Guest> {
        self.store.unassigned_guests()
    }

    /// Unassigned guests whose name contains `query`, ignoring case.
    pub fn search_unassigned(&self, query: &str) -> Vec<&Guest> {
        self.store.search_unassigned(query)
    }

    /// Occupant of each seat at `table`, or `None` for an unknown table.
    pub fn seat_map(&self, table: TableId) -> Option<Vec<Option<GuestId>>> {
        self.store.seat_map(table)
    }

    /// Where a table created now would be placed by default.
    pub fn next_table_position(&self) -> Position {
        self.store
            .next_table_position(self.tables.origin, self.tables.spacing)
    }

    /// Whether [`SeatingEngine::undo`] would succeed.
    pub const fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`SeatingEngine::redo`] would succeed.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots currently held.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The undo history.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Table defaults this engine was configured with.
    pub const fn table_config(&self) -> &TableConfig {
        &self.tables
    }

    // -------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------

    /// Add an unassigned guest.
    pub fn create_guest(&mut self, name: &str) -> Result<GuestId, SeatingError> {
        self.commit("create_guest", |store| store.create_guest(name))
    }

    /// Add a guest and seat them at `table`'s first free seat.
    ///
    /// If the table is missing or full the guest is still created, just
    /// unassigned. Returns the new id and the seat taken, if any.
    pub fn create_guest_at_table(
        &mut self,
        name: &str,
        table: TableId,
    ) -> Result<(GuestId, Option<u32>), SeatingError> {
        self.commit("create_guest", |store| {
            let guest = store.create_guest(name)?;
            let seat = match assign::assign_to_first_available_seat(store, guest, table) {
                Ok(seat) => Some(seat),
                Err(err) => {
                    debug!(%guest, %table, error = %err, "New guest left unassigned");
                    None
                }
            };
            Ok((guest, seat))
        })
    }

    /// Remove a guest, freeing their seat.
    pub fn delete_guest(&mut self, guest: GuestId) -> Result<Guest, SeatingError> {
        self.commit("delete_guest", |store| store.delete_guest(guest))
    }

    /// Move a guest back to the unassigned pool.
    pub fn unassign_from_table(
        &mut self,
        guest: GuestId,
    ) -> Result<Option<(TableId, u32)>, SeatingError> {
        self.commit("unassign_from_table", |store| {
            assign::unassign_from_table(store, guest)
        })
    }

    /// Seat a guest at the lowest free seat of `table`.
    pub fn assign_to_first_available_seat(
        &mut self,
        guest: GuestId,
        table: TableId,
    ) -> Result<u32, SeatingError> {
        self.commit("assign_to_first_available_seat", |store| {
            assign::assign_to_first_available_seat(store, guest, table)
        })
    }

    /// Seat a guest at `seat`, swapping or evicting any occupant.
    pub fn assign_to_specific_seat(
        &mut self,
        guest: GuestId,
        table: TableId,
        seat: u32,
    ) -> Result<Placement, SeatingError> {
        self.commit("assign_to_specific_seat", |store| {
            assign::assign_to_specific_seat(store, guest, table, seat)
        })
    }

    /// Add an empty table, at the staggered default position unless one is
    /// given.
    pub fn create_table(
        &mut self,
        capacity: u32,
        position: Option<Position>,
    ) -> Result<TableId, SeatingError> {
        let position = position.unwrap_or_else(|| self.next_table_position());
        self.commit("create_table", |store| store.create_table(capacity, position))
    }

    /// Remove a table, unassigning everyone who sat there.
    pub fn delete_table(&mut self, table: TableId) -> Result<Vec<GuestId>, SeatingError> {
        self.commit("delete_table", |store| {
            store.delete_table(table).map(|(_, released)| released)
        })
    }

    /// Rename a table.
    pub fn rename_table(&mut self, table: TableId, name: &str) -> Result<(), SeatingError> {
        self.commit("rename_table", |store| store.rename_table(table, name))
    }

    /// Shift a table on the canvas.
    pub fn move_table(&mut self, table: TableId, delta: Position) -> Result<Position, SeatingError> {
        self.commit("move_table", |store| store.move_table(table, delta))
    }

    /// Unassign everyone at a table.
    pub fn clear_table(&mut self, table: TableId) -> Result<Vec<GuestId>, SeatingError> {
        self.commit("clear_table", |store| store.clear_table(table))
    }

    /// Create an unassigned guest for every name in a delimited guest list.
    ///
    /// The whole import is one history step.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::NothingImported`] when no names were found;
    /// the state and history are unchanged in that case.
    pub fn import_guests_from_text(&mut self, text: &str) -> Result<ImportReport, SeatingError> {
        let batch = import::parse_guest_list(text);
        let report = self.commit("import_guests", |store| {
            if batch.names.is_empty() {
                return Err(SeatingError::NothingImported);
            }
            let imported = batch
                .names
                .iter()
                .map(|name| store.create_guest(name))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ImportReport {
                format: batch.format,
                imported,
            })
        })?;
        info!(
            format = ?report.format,
            imported = report.imported.len(),
            "Guest list imported"
        );
        Ok(report)
    }

    /// Restore the previous snapshot.
    pub fn undo(&mut self) -> Result<(), SeatingError> {
        let state = self
            .history
            .undo()
            .ok_or(SeatingError::NothingToUndo)?
            .clone();
        self.store.restore(state);
        debug!(cursor = self.history.cursor(), "Undo");
        Ok(())
    }

    /// Re-apply the next snapshot.
    pub fn redo(&mut self) -> Result<(), SeatingError> {
        let state = self
            .history
            .redo()
            .ok_or(SeatingError::NothingToRedo)?
            .clone();
        self.store.restore(state);
        debug!(cursor = self.history.cursor(), "Redo");
        Ok(())
    }

    /// Run `op` against the store and commit a snapshot if it succeeds.
    fn commit<T>(
        &mut self,
        label: &'static str,
        op: impl FnOnce(&mut EntityStore) -> Result<T, SeatingError>,
    ) -> Result<T, SeatingError> {
        match op(&mut self.store) {
            Ok(value) => {
                self.history.record(self.store.state().clone(), label);
                debug!(command = label, snapshots = self.history.len(), "Command applied");
                self.check_invariants(label);
                Ok(value)
            }
            Err(err) => {
                debug!(command = label, kind = ?err.kind(), error = %err, "Command rejected");
                Err(err)
            }
        }
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self, label: &'static str) {
        let violations = invariants::verify(self.store.state());
        if !violations.is_empty() {
            tracing::error!(command = label, ?violations, "Seating invariants broken");
        }
    }

    #[cfg(not(debug_assertions))]
    #[allow(clippy::unused_self)]
    const fn check_invariants(&self, _label: &'static str) {}
}
