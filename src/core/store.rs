//! Durable storage for the shortcut collection.
//!
//! A small key-value abstraction with a file-backed implementation for real
//! use and an in-memory one for tests. `ShortcutStore` keeps the whole
//! collection as one JSON array under a fixed key.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::StoreError;
use super::Shortcut;

/// Key the shortcut collection is stored under.
pub const STORAGE_KEY: &str = "devdeck-shortcuts";

/// A local, durable string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<key>.json` inside a directory.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a partial value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    read_only: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail.
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.lock() = read_only;
    }

    /// Raw stored text for `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if *self.read_only.lock() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Serializes the shortcut collection into a `KeyValueStore`.
pub struct ShortcutStore {
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for ShortcutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutStore").field("key", &STORAGE_KEY).finish()
    }
}

impl ShortcutStore {
    /// Wrap a key-value backend.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self { backend: Box::new(backend) }
    }

    /// File-backed store in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStore::new(dir))
    }

    /// Store backed by a fresh in-memory map.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Load the saved collection.
    ///
    /// Returns `None` when nothing was ever saved, and also when the stored
    /// value cannot be read or parsed; those cases are logged, never raised.
    pub fn load(&self) -> Option<Vec<Shortcut>> {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved shortcuts");
                return None;
            }
        };

        if raw.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<Vec<Shortcut>>(&raw) {
            Ok(shortcuts) => {
                tracing::debug!(count = shortcuts.len(), "Loaded shortcuts");
                Some(shortcuts)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved shortcuts are corrupt, ignoring them");
                None
            }
        }
    }

    /// Replace the saved collection.
    pub fn save(&self, shortcuts: &[Shortcut]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(shortcuts)?;
        self.backend.set(STORAGE_KEY, &content)
    }

    /// Forget the saved collection.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(STORAGE_KEY)
    }
}
