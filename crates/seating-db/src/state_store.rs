//! Guest and table persistence on top of a [`KeyValueStore`].
//!
//! Guests and tables are stored as two JSON arrays under separate keys, in
//! the same shape the web front end writes to browser storage.
//!
//! | Key (default) | Value |
//! |---------------|-------|
//! | `wedding-seating-guests` | `Guest[]` |
//! | `wedding-seating-tables` | `Table[]` |
//!
//! Loading never fails. A missing key reads as an empty collection; an
//! unreadable or malformed value is logged and also reads as empty, for each
//! key independently.

use serde::de::DeserializeOwned;

use seating_types::SeatingState;

use crate::error::DbError;
use crate::kv::KeyValueStore;

/// Default key for the guest collection.
pub const GUESTS_KEY: &str = "wedding-seating-guests";

/// Default key for the table collection.
pub const TABLES_KEY: &str = "wedding-seating-tables";

/// Loads and saves a [`SeatingState`] through a key-value backend.
#[derive(Debug, Clone)]
pub struct StateStore<S> {
    backend: S,
    guests_key: String,
    tables_key: String,
}

impl<S: KeyValueStore> StateStore<S> {
    /// Use `backend` with the given keys.
    pub fn new(backend: S, guests_key: impl Into<String>, tables_key: impl Into<String>) -> Self {
        Self {
            backend,
            guests_key: guests_key.into(),
            tables_key: tables_key.into(),
        }
    }

    /// Use `backend` with [`GUESTS_KEY`] and [`TABLES_KEY`].
    pub fn with_default_keys(backend: S) -> Self {
        Self::new(backend, GUESTS_KEY, TABLES_KEY)
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Read both collections, falling back to empty ones.
    pub fn load(&self) -> SeatingState {
        let guests = self.load_collection(&self.guests_key);
        let tables = self.load_collection(&self.tables_key);
        tracing::info!(
            guests = guests.len(),
            tables = tables.len(),
            "Loaded seating state"
        );
        SeatingState::new(guests, tables)
    }

    /// Write both collections.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if either write fails. The guest key is written
    /// first.
    pub fn save(&mut self, state: &SeatingState) -> Result<(), DbError> {
        let guests = serde_json::to_string(&state.guests)?;
        let tables = serde_json::to_string(&state.tables)?;
        self.backend.set(&self.guests_key, &guests)?;
        self.backend.set(&self.tables_key, &tables)?;
        tracing::debug!(
            guests = state.guests.len(),
            tables = state.tables.len(),
            "Saved seating state"
        );
        Ok(())
    }

    /// Read the value at `key` and deserialize it from JSON.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the value is not valid JSON for
    /// `T`, or the backend's error if the read fails.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        self.backend
            .get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(DbError::from)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.get_json::<Vec<T>>(key) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(key, %error, "Discarding unreadable stored value");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seating_types::{Guest, Position, Table};

    use super::*;
    use crate::kv::MemoryKvStore;

    #[test]
    fn empty_backend_loads_empty_state() {
        let store = StateStore::with_default_keys(MemoryKvStore::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_key_does_not_affect_the_other() {
        let mut backend = MemoryKvStore::new();
        let table = Table::new("Head", 4, Position::new(1.0, 2.0));
        backend
            .set(TABLES_KEY, &serde_json::to_string(&[table.clone()]).unwrap())
            .unwrap();
        backend.set(GUESTS_KEY, "{not json").unwrap();

        let state = StateStore::with_default_keys(backend).load();
        assert!(state.guests.is_empty());
        assert_eq!(state.tables, vec![table]);
    }

    #[test]
    fn save_writes_json_arrays_under_both_keys() {
        let mut store = StateStore::new(MemoryKvStore::new(), "g", "t");
        let state = SeatingState::new(vec![Guest::new("Ann")], Vec::new());
        store.save(&state).unwrap();

        let raw = store.backend().get("g").unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"name\":\"Ann\""));
        assert_eq!(store.backend().get("t").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.load(), state);
    }
}
