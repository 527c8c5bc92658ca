//! Durable key/value storage for the cart and wishlist collections.
//!
//! Each collection is stored under its own key as a JSON array of
//! [`StoredRecord`]s. Reads and writes never fail past this module: a missing,
//! unreadable or corrupt collection loads as empty, and a failed write is
//! logged while the in-memory state stays as it is.
//!
//! Writes go through [`WriteBehind`], which moves the backend call onto
//! tokio's blocking pool when a runtime is available so that async handlers
//! holding the session lock never wait on the filesystem.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shopfront_core::StoredRecord;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Key of the durable cart collection.
pub const CART_KEY: &str = "cart";

/// Key of the durable wishlist collection.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A named-value store that survives process restarts.
pub trait DurableStorage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load a collection, treating every failure as an empty collection.
///
/// Individual records that fail to decode are skipped.
pub fn load_records(storage: &dyn DurableStorage, key: &str) -> Vec<StoredRecord> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read durable collection, starting empty");
            return Vec::new();
        }
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(key, error = %e, "Corrupt durable collection, starting empty");
            return Vec::new();
        }
    };

    let total = values.len();
    let records: Vec<StoredRecord> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if records.len() < total {
        warn!(key, skipped = total - records.len(), "Skipped malformed stored records");
    }
    records
}

// =============================================================================
// Write Behind
// =============================================================================

/// Fire-and-forget collection writer.
///
/// Each save records the newest serialized value for its key and schedules a
/// flush. A flush takes whatever value is newest for the key at the time it
/// holds the write lock, so an older value never lands after a newer one and
/// superseded values are skipped.
#[derive(Clone)]
pub struct WriteBehind {
    inner: Arc<WriteBehindInner>,
}

struct WriteBehindInner {
    storage: Arc<dyn DurableStorage>,
    pending: Mutex<HashMap<String, String>>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for WriteBehind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteBehind").finish_non_exhaustive()
    }
}

impl WriteBehind {
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            inner: Arc::new(WriteBehindInner {
                storage,
                pending: Mutex::new(HashMap::new()),
                write_lock: Mutex::new(()),
            }),
        }
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.inner.storage
    }

    /// Queue a collection for writing.
    ///
    /// Inside a tokio runtime the write runs on the blocking pool and the
    /// returned handle completes once it has been attempted. Outside a
    /// runtime the write happens before this returns and `None` is returned.
    /// Failures are logged and otherwise ignored.
    pub fn save(&self, key: &str, records: &[StoredRecord]) -> Option<JoinHandle<()>> {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize durable collection");
                return None;
            }
        };
        lock(&self.inner.pending).insert(key.to_string(), raw);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let inner = Arc::clone(&self.inner);
            let key = key.to_string();
            Some(handle.spawn_blocking(move || inner.flush(&key)))
        } else {
            self.inner.flush(key);
            None
        }
    }
}

impl WriteBehindInner {
    fn flush(&self, key: &str) {
        let _guard = lock(&self.write_lock);
        let Some(raw) = lock(&self.pending).remove(key) else {
            // A later flush already wrote the newest value.
            return;
        };

        match self.storage.write(key, &raw) {
            Ok(()) => debug!(key, bytes = raw.len(), "Persisted durable collection"),
            Err(e) => warn!(key, error = %e, "Failed to persist durable collection"),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// File Storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for storage, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let target = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage, used in tests and when no directory is usable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key.
    #[must_use]
    pub fn with(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
