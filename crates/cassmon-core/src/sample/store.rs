//! Previous observations for RATE and DELTA values.
//!
//! Single-shot runs are separate processes, so the store can be backed by a
//! JSON file that is loaded at start and saved after every publish. Entries
//! older than the TTL are dropped on load.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entries older than this many seconds are discarded on load.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

/// Store shared between the metric sets of one integration.
pub type SharedStore = Arc<Mutex<MetricStore>>;

/// Locks a shared store, recovering from a poisoned lock.
pub fn lock(store: &SharedStore) -> MutexGuard<'_, MetricStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Error type for store persistence.
#[derive(Debug)]
pub enum StoreError {
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(path, e) => write!(f, "metric store {}: {}", path.display(), e),
            StoreError::Json(path, e) => {
                write!(f, "metric store {} is not valid: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Json(_, e) => Some(e),
        }
    }
}

/// One stored observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: f64,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Key/value store of previous observations.
#[derive(Debug, Default)]
pub struct MetricStore {
    path: Option<PathBuf>,
    entries: HashMap<String, StoredValue>,
}

impl MetricStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store, loading entries newer than `ttl_secs`.
    ///
    /// A missing file yields an empty store; the file is created on save.
    pub fn open(path: &Path, ttl_secs: i64, now: i64) -> Result<Self, StoreError> {
        let mut store = Self {
            path: Some(path.to_path_buf()),
            entries: HashMap::new(),
        };

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(store),
            Err(e) => return Err(StoreError::Io(path.to_path_buf(), e)),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(store);
        }

        let entries: HashMap<String, StoredValue> = serde_json::from_slice(&data)
            .map_err(|e| StoreError::Json(path.to_path_buf(), e))?;
        let total = entries.len();
        store.entries = entries
            .into_iter()
            .filter(|(_, v)| now - v.timestamp <= ttl_secs)
            .collect();
        debug!(
            path = %path.display(),
            loaded = store.entries.len(),
            expired = total - store.entries.len(),
            "metric store loaded"
        );
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: &str, value: f64, timestamp: i64) {
        self.entries
            .insert(key.to_string(), StoredValue { value, timestamp });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the store to its file. In-memory stores do nothing.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
        }

        let data =
            serde_json::to_vec(&self.entries).map_err(|e| StoreError::Json(path.clone(), e))?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, data).map_err(|e| StoreError::Io(tmp.clone(), e))?;
        std::fs::rename(&tmp, path).map_err(|e| StoreError::Io(path.clone(), e))?;
        Ok(())
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }
}
