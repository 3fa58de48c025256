//! Client-side license state
//!
//! The activated license and the processed-file counter live in a small
//! key-value store scoped to the user's device. The store is injected so
//! tests can swap in memory and the CLI can persist to a JSON file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STORAGE_KEY_LICENSE_DATA: &str = "localpdf_license_data";
pub const STORAGE_KEY_STATS: &str = "localpdf_stats_count";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// String key-value storage with device lifetime
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Key-value store persisted as one JSON object on disk.
///
/// The file is read lazily on first access; every write rewrites the whole
/// file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: OnceLock<Mutex<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> Result<&Mutex<BTreeMap<String, String>>, StorageError> {
        if let Some(entries) = self.entries.get() {
            return Ok(entries);
        }
        let loaded = match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(self.entries.get_or_init(|| Mutex::new(loaded)))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries()?.lock().unwrap_or_else(|e| e.into_inner());
        change(&mut *entries);
        self.persist(&entries)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries()?.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// The locally persisted license
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseData {
    pub key: String,
    pub activated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LicenseData {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// License and usage counters on top of a key-value store
pub struct LicenseStorage<S> {
    store: S,
}

impl<S: KeyValueStore> LicenseStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored license, if one exists and parses
    pub fn license(&self) -> Option<LicenseData> {
        let raw = match self.store.get(STORAGE_KEY_LICENSE_DATA) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("failed to read license: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("ignoring unreadable license entry: {}", e);
                None
            }
        }
    }

    /// True while a stored license has not yet expired
    pub fn is_pro(&self, now: DateTime<Utc>) -> bool {
        self.license()
            .map(|data| data.is_valid_at(now))
            .unwrap_or(false)
    }

    /// Persist a freshly redeemed license
    pub fn activate(
        &self,
        key: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<LicenseData, StorageError> {
        let data = LicenseData {
            key: key.to_string(),
            activated_at: now,
            expires_at,
        };
        self.store
            .set(STORAGE_KEY_LICENSE_DATA, &serde_json::to_string(&data)?)?;
        Ok(data)
    }

    pub fn remove_license(&self) -> Result<(), StorageError> {
        self.store.remove(STORAGE_KEY_LICENSE_DATA)
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.license().map(|data| data.expires_at)
    }

    /// Number of files processed on this device; unreadable values count as 0
    pub fn processed_count(&self) -> u64 {
        self.store
            .get(STORAGE_KEY_STATS)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn increment_processed_count(&self, count: u64) -> Result<u64, StorageError> {
        let total = self.processed_count().saturating_add(count);
        self.store.set(STORAGE_KEY_STATS, &total.to_string())?;
        Ok(total)
    }
}
