//! Shortcut repository.
//!
//! Holds the ordered shortcut collection in memory and writes it through to
//! the `ShortcutStore` after every successful mutation.

use std::collections::HashSet;

use super::error::RepositoryError;
use super::store::ShortcutStore;
use super::{Shortcut, ShortcutDraft, ShortcutPatch};

/// First port handed out by [`ShortcutRepository::suggest_port`].
pub const FIRST_SUGGESTED_PORT: u32 = 3000;

/// In-memory shortcut collection with write-through persistence.
///
/// Insertion order is preserved and is the default display order.
#[derive(Debug)]
pub struct ShortcutRepository {
    shortcuts: Vec<Shortcut>,
    store: ShortcutStore,
}

impl ShortcutRepository {
    /// Create an empty repository without reading from the store.
    pub fn new(store: ShortcutStore) -> Self {
        Self { shortcuts: Vec::new(), store }
    }

    /// Load the saved collection; missing or corrupt data yields an empty one.
    pub fn load(store: ShortcutStore) -> Self {
        let shortcuts = store.load().unwrap_or_default();
        Self { shortcuts, store }
    }

    /// Load the saved collection, seeding the demo shortcut when nothing usable was saved.
    pub fn load_or_seed(store: ShortcutStore, seed_demo: bool) -> Self {
        match store.load() {
            Some(shortcuts) => Self { shortcuts, store },
            None => {
                let mut repo = Self::new(store);
                if seed_demo {
                    let demo = Shortcut::demo(now_millis());
                    repo.shortcuts.push(demo.clone());
                    if let Err(e) = repo.persist(demo) {
                        tracing::warn!(error = %e, "Failed to save demo shortcut");
                    }
                    tracing::info!("Seeded demo shortcut");
                }
                repo
            }
        }
    }

    /// Repository over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(ShortcutStore::in_memory())
    }

    /// All shortcuts in insertion order.
    pub fn list(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Get a shortcut by id.
    pub fn get(&self, id: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.id == id)
    }

    /// Resolve a user-supplied reference.
    ///
    /// Tries the exact id, then a case-insensitive name, then a name prefix
    /// that matches exactly one shortcut.
    pub fn find(&self, query: &str) -> Option<&Shortcut> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(found) = self.get(query) {
            return Some(found);
        }

        let lowered = query.to_lowercase();
        if let Some(found) = self.shortcuts.iter().find(|s| s.name.to_lowercase() == lowered) {
            return Some(found);
        }

        let mut prefixed = self.shortcuts.iter().filter(|s| s.name.to_lowercase().starts_with(&lowered));
        match (prefixed.next(), prefixed.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Add a new shortcut built from `draft`.
    ///
    /// Assigns a fresh id and a creation time no earlier than any existing one.
    ///
    /// Mutations are write-through. When the write fails the change still
    /// stands in memory and the error is [`RepositoryError::Storage`], which
    /// carries the applied record. Only validation and lookup errors leave
    /// the collection untouched.
    pub fn create(&mut self, draft: ShortcutDraft) -> Result<Shortcut, RepositoryError> {
        draft.validate()?;

        let shortcut = draft.into_shortcut(self.generate_id(), self.next_created_at());
        self.shortcuts.push(shortcut.clone());
        tracing::info!(id = %shortcut.id, name = %shortcut.name, "Created shortcut");

        self.persist(shortcut)
    }

    /// Merge `patch` into the shortcut with `id`. Identity and creation time never change.
    pub fn update(&mut self, id: &str, patch: ShortcutPatch) -> Result<Shortcut, RepositoryError> {
        let index = self.index_of(id)?;
        let merged = patch.merged(&self.shortcuts[index])?;

        self.shortcuts[index] = merged.clone();
        tracing::info!(id, "Updated shortcut");

        self.persist(merged)
    }

    /// Remove the shortcut with `id`, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Shortcut, RepositoryError> {
        let index = self.index_of(id)?;
        let removed = self.shortcuts.remove(index);
        tracing::info!(id, name = %removed.name, "Deleted shortcut");

        self.persist(removed)
    }

    /// Smallest port >= 3000 that no shortcut uses, ignoring `excluding`.
    ///
    /// Only a hint: nothing is reserved.
    pub fn suggest_port(&self, excluding: Option<&str>) -> String {
        let used: HashSet<u32> = self
            .others(excluding)
            .filter_map(|s| s.port_number())
            .map(u32::from)
            .collect();

        let mut candidate = FIRST_SUGGESTED_PORT;
        while used.contains(&candidate) {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Whether another shortcut already uses `port` (plain string comparison).
    ///
    /// Advisory only; the repository accepts duplicate ports.
    pub fn has_port_conflict(&self, port: &str, excluding: Option<&str>) -> bool {
        let port = port.trim();
        if port.is_empty() {
            return false;
        }
        self.others(excluding).any(|s| s.active_port() == Some(port))
    }

    /// Shortcuts other than `excluding`.
    fn others<'a>(&'a self, excluding: Option<&'a str>) -> impl Iterator<Item = &'a Shortcut> + 'a {
        self.shortcuts.iter().filter(move |s| Some(s.id.as_str()) != excluding)
    }

    fn index_of(&self, id: &str) -> Result<usize, RepositoryError> {
        self.shortcuts
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn generate_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn next_created_at(&self) -> i64 {
        let latest = self.shortcuts.iter().map(|s| s.created_at).max().unwrap_or(i64::MIN);
        now_millis().max(latest)
    }

    /// Write the collection out after a mutation that produced `applied`.
    fn persist(&self, applied: Shortcut) -> Result<Shortcut, RepositoryError> {
        match self.store.save(&self.shortcuts) {
            Ok(()) => Ok(applied),
            Err(source) => {
                tracing::error!(error = %source, id = %applied.id, "Failed to save shortcuts");
                Err(RepositoryError::Storage { shortcut: Box::new(applied), source })
            }
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
