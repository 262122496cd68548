//! Ordered store implementations
//!
//! `MemoryStore` keeps entries in a `BTreeMap`; `FileStore` adds a JSON
//! snapshot on disk that is rewritten atomically after every mutation.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::infrastructure::traits::{FileSystem, OrderedStore};

/// Volatile store, empty on construction.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: RwLock<BTreeMap<String, V>>,
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: Clone + Send + Sync> OrderedStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> io::Result<Option<V>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn insert(&self, key: &str, value: V) -> io::Result<Option<V>> {
        Ok(self.entries.write().insert(key.to_string(), value))
    }

    fn remove(&self, key: &str) -> io::Result<Option<V>> {
        Ok(self.entries.write().remove(key))
    }

    fn modify(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> io::Result<Option<V>> {
        let mut entries = self.entries.write();
        Ok(entries.get_mut(key).map(|value| {
            f(value);
            value.clone()
        }))
    }

    fn values(&self) -> io::Result<Vec<V>> {
        Ok(self.entries.read().values().cloned().collect())
    }

    fn len(&self) -> io::Result<usize> {
        Ok(self.entries.read().len())
    }
}

/// Durable store backed by a single JSON document.
///
/// The whole map is held in memory and written out on each mutation. A
/// failed write rolls the in-memory map back, so callers never observe a
/// change that did not reach disk.
pub struct FileStore<V> {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    entries: RwLock<BTreeMap<String, V>>,
}

impl<V> std::fmt::Debug for FileStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("len", &self.entries.read().len())
            .finish()
    }
}

impl<V> FileStore<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the store at `path`. A missing or blank file yields an empty store.
    pub fn open(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let entries = if fs.exists(&path) {
            let content = fs.read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("parse {}: {}", path.display(), e),
                    )
                })?
            }
        } else {
            BTreeMap::new()
        };
        debug!("open: path={}, entries={}", path.display(), entries.len());

        Ok(Self {
            path,
            fs,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, V>) -> io::Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        self.fs.ensure_parent(&self.path)?;
        self.fs.write_atomic(&self.path, &content)?;
        trace!("persist: path={}, entries={}", self.path.display(), entries.len());
        Ok(())
    }

    /// Undo a single-key change after a failed persist.
    fn restore(entries: &mut BTreeMap<String, V>, key: &str, previous: Option<V>) {
        match previous {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
    }
}

impl<V> OrderedStore<V> for FileStore<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn get(&self, key: &str) -> io::Result<Option<V>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn insert(&self, key: &str, value: V) -> io::Result<Option<V>> {
        let mut entries = self.entries.write();
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries) {
            Self::restore(&mut entries, key, previous);
            return Err(e);
        }
        Ok(previous)
    }

    fn remove(&self, key: &str) -> io::Result<Option<V>> {
        let mut entries = self.entries.write();
        let Some(removed) = entries.remove(key) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&entries) {
            entries.insert(key.to_string(), removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    fn modify(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> io::Result<Option<V>> {
        let mut entries = self.entries.write();
        let Some(value) = entries.get_mut(key) else {
            return Ok(None);
        };
        let previous = value.clone();
        f(value);
        let updated = value.clone();
        if let Err(e) = self.persist(&entries) {
            Self::restore(&mut entries, key, Some(previous));
            return Err(e);
        }
        Ok(Some(updated))
    }

    fn values(&self) -> io::Result<Vec<V>> {
        Ok(self.entries.read().values().cloned().collect())
    }

    fn len(&self) -> io::Result<usize> {
        Ok(self.entries.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    #[test]
    fn given_memory_store_when_inserting_out_of_order_then_values_are_key_ordered() {
        let store = MemoryStore::new();
        store.insert("b", 2).unwrap();
        store.insert("c", 3).unwrap();
        store.insert("a", 1).unwrap();

        assert_eq!(store.values().unwrap(), vec![1, 2, 3]);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn given_memory_store_when_overwriting_then_returns_previous() {
        let store = MemoryStore::new();
        assert_eq!(store.insert("k", 1).unwrap(), None);
        assert_eq!(store.insert("k", 2).unwrap(), Some(1));
        assert_eq!(store.get("k").unwrap(), Some(2));
    }

    #[test]
    fn given_missing_key_when_modify_then_closure_not_called() {
        let store: MemoryStore<i32> = MemoryStore::new();
        let mut called = false;
        let result = store.modify("nope", &mut |_| called = true).unwrap();
        assert_eq!(result, None);
        assert!(!called);
    }

    #[test]
    fn given_file_store_when_reopened_then_entries_survive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/trees.json");
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

        {
            let store = FileStore::open(fs.clone(), &path).unwrap();
            store.insert("a", "alpha".to_string()).unwrap();
            store.insert("b", "beta".to_string()).unwrap();
            store.modify("a", &mut |v| v.push('!')).unwrap();
            store.remove("b").unwrap();
        }

        let store: FileStore<String> = FileStore::open(fs, &path).unwrap();
        assert_eq!(store.values().unwrap(), vec!["alpha!".to_string()]);
    }

    #[test]
    fn given_blank_file_when_open_then_store_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("trees.json");
        std::fs::write(&path, "  \n").unwrap();

        let store: FileStore<String> = FileStore::open(Arc::new(RealFileSystem), &path).unwrap();

        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn given_corrupt_file_when_open_then_returns_invalid_data() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("trees.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::<String>::open(Arc::new(RealFileSystem), &path).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
