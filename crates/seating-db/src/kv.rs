//! Key-value backends.
//!
//! Values are opaque strings; [`crate::StateStore`] puts JSON in them.
//!
//! | Backend | Storage |
//! |---------|---------|
//! | [`FileKvStore`] | one file per key, `<dir>/<key>.json` |
//! | [`MemoryKvStore`] | in-process map, lost on exit |

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DbError;

/// String storage addressed by key.
pub trait KeyValueStore {
    /// Read the value at `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, DbError>;

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), DbError>;
}

/// Directory-backed store writing each key to its own JSON file.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open (creating if needed) the store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DbError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidKey`] unless the key is non-empty and made
    /// of ASCII letters, digits, `-` and `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, DbError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DbError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        let path = self.path_for(key)?;
        // Stage beside the target, then rename into place.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        tracing::trace!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, for tests and `--memory` sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    values: BTreeMap<String, String>,
}

impl MemoryKvStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.values.remove(key);
        Ok(())
    }
}
