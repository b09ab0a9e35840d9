//! Dedup store: the memory of every item id already processed.
//!
//! Owned by one orchestrator. Loaded once, extended as cycles see new
//! items, and flushed atomically at the end of each cycle. An id in the
//! store is never treated as new again until the file is reset by hand.

use std::{collections::HashSet, path::PathBuf};

use tracing::{debug, error, warn};

use crate::{model::Item, storage};

#[derive(Debug, Default)]
pub struct DedupStore {
    ids: HashSet<String>,

    /// Backing file; `None` keeps the store purely in memory.
    path: Option<PathBuf>,

    /// Set when an unreadable file is still in place and must not be
    /// overwritten.
    frozen: bool,
}

impl DedupStore {
    /// A store with no backing file. `persist` is a no-op.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the store from `path`.
    ///
    /// Never fails: a missing file is the first run. An unreadable or
    /// corrupt one is set aside next to the original and the store starts
    /// empty; if it cannot be moved, the store refuses to persist over it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (ids, frozen) = match storage::read_ids(&path) {
            Ok(ids) => (ids, false),
            Err(e) => match storage::set_aside(&path) {
                Ok(moved) => {
                    warn!(
                        path = %path.display(),
                        moved_to = %moved.display(),
                        error = %e,
                        "dedup store unreadable, set aside and starting empty"
                    );
                    (HashSet::new(), false)
                }
                Err(move_err) => {
                    error!(
                        path = %path.display(),
                        error = %e,
                        move_error = %move_err,
                        "dedup store unreadable and could not be set aside, persisting disabled"
                    );
                    (HashSet::new(), true)
                }
            },
        };
        debug!(path = %path.display(), seen = ids.len(), "dedup store loaded");
        Self {
            ids,
            path: Some(path),
            frozen,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records an id as seen. Returns `true` if it was new.
    pub fn mark_seen(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keeps only items not yet in the store, dropping repeats within the
    /// batch too. Discovery order is preserved. Does not mark anything.
    pub fn filter_new(&self, items: Vec<Item>) -> Vec<Item> {
        let mut batch = HashSet::new();
        items
            .into_iter()
            .filter(|item| !self.contains(&item.id) && batch.insert(item.id.clone()))
            .collect()
    }

    /// Flushes the set to its backing file, replacing it atomically.
    pub fn persist(&self) -> storage::Result<()> {
        match &self.path {
            Some(path) if self.frozen => Err(storage::StorageError::Unreadable(path.clone())),
            Some(path) => storage::write_ids(path, &self.ids),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    fn repo(name: &str) -> Item {
        Item::repo(name, "", None, 0, None)
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = DedupStore::load(dir.path().join("seen.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "garbage").unwrap();

        let store = DedupStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn truncated_history_survives_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.json");
        let truncated = r#"["id-1","id-2","id-3","#;
        fs::write(&path, truncated).unwrap();

        let mut store = DedupStore::load(&path);
        store.mark_seen("new");
        store.persist().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"["new"]"#);
        let set_aside: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains("seen.json.corrupt-"))
            .collect();
        assert_eq!(set_aside.len(), 1);
        assert_eq!(fs::read_to_string(&set_aside[0]).unwrap(), truncated);
    }

    #[test]
    fn unmovable_unreadable_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "garbage").unwrap();

        let store = DedupStore {
            ids: HashSet::from(["new".to_string()]),
            path: Some(path.clone()),
            frozen: true,
        };

        assert!(matches!(
            store.persist(),
            Err(storage::StorageError::Unreadable(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "garbage");
    }

    #[test]
    fn mark_seen_reports_novelty() {
        let mut store = DedupStore::in_memory();
        assert!(store.mark_seen("abc"));
        assert!(!store.mark_seen("abc"));
        assert!(store.contains("abc"));
    }

    #[test]
    fn filter_new_drops_seen_and_batch_repeats() {
        let mut store = DedupStore::in_memory();
        let old = repo("octo/old");
        store.mark_seen(old.id.clone());

        let fresh = store.filter_new(vec![
            repo("octo/a"),
            old,
            repo("octo/b"),
            repo("octo/a"),
        ]);

        let titles: Vec<&str> = fresh.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["octo/a", "octo/b"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn persisted_ids_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.json");

        let mut store = DedupStore::load(&path);
        store.mark_seen("one");
        store.mark_seen("two");
        store.persist().unwrap();

        let reloaded = DedupStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("one"));
        assert!(!dir.path().join("seen.json.tmp").exists());
    }

    #[test]
    fn in_memory_persist_is_noop() {
        let mut store = DedupStore::in_memory();
        store.mark_seen("x");
        store.persist().unwrap();
        assert_eq!(store.len(), 1);
    }
}
