//! I/O boundary traits for testability
//!
//! These traits abstract id generation, time, storage and the filesystem,
//! allowing services to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace file contents atomically: readers see either the old or the new content.
    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Source of record identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier that is unique with overwhelming probability.
    fn generate(&self) -> String;
}

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    /// Current time as nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> u64;
}

/// Durable string-keyed map with key-ordered iteration.
///
/// Every method is atomic with respect to other calls on the same store.
pub trait OrderedStore<V>: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<V>>;

    /// Insert or overwrite, returning the previous value.
    fn insert(&self, key: &str, value: V) -> io::Result<Option<V>>;

    /// Remove, returning the removed value.
    fn remove(&self, key: &str) -> io::Result<Option<V>>;

    /// Read-modify-write a single entry under the store's own exclusion.
    ///
    /// Returns the new value, or `None` (without calling `f`) if the key is absent.
    fn modify(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> io::Result<Option<V>>;

    /// All values in key order.
    fn values(&self) -> io::Result<Vec<V>>;

    fn len(&self) -> io::Result<usize>;

    fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        use std::io::Write;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        // Temp file must live on the same filesystem for rename to be atomic
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Random v4 UUIDs in hyphenated form.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Wall clock that never runs backwards within one process.
///
/// If the system time steps back, the last reading is repeated until the
/// wall clock catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        let wall = chrono::Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        let prev = self.last.fetch_max(wall, Ordering::AcqRel);
        prev.max(wall)
    }
}
