//! License record stores
//!
//! The redemption transaction only needs two primitives: an exact-match
//! lookup and a conditional write that flips a record to `USED` only if it
//! is still `UNUSED` at write time. Any backend with a compare-and-swap on a
//! single field can implement it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::record::{LicenseRecord, LicenseStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub trait LicenseStore: Send + Sync {
    /// Look up a record by its exact code
    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<LicenseRecord>, StoreError>> + Send;

    /// Transition record `id` from `UNUSED` to `USED`, stamping both
    /// timestamps. Returns `false` without writing if the record is not
    /// `UNUSED` at write time.
    fn mark_used_if_unused(
        &self,
        id: i64,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// In-process store, keyed by record id
#[derive(Debug, Default)]
pub struct MemoryLicenseStore {
    records: Mutex<HashMap<i64, LicenseRecord>>,
}

impl MemoryLicenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with unused records, ids assigned from 1
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for (i, code) in codes.into_iter().enumerate() {
            store.insert(LicenseRecord::unused(i as i64 + 1, code));
        }
        store
    }

    pub fn insert(&self, record: LicenseRecord) {
        self.lock().insert(record.id, record);
    }

    pub fn get(&self, id: i64) -> Option<LicenseRecord> {
        self.lock().get(&id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, LicenseRecord>> {
        // A poisoned map is still consistent: every write is a single insert.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LicenseStore for MemoryLicenseStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<LicenseRecord>, StoreError> {
        Ok(self.lock().values().find(|r| r.code == code).cloned())
    }

    async fn mark_used_if_unused(
        &self,
        id: i64,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut records = self.lock();
        match records.get_mut(&id) {
            Some(record) if record.status == LicenseStatus::Unused => {
                record.status = LicenseStatus::Used;
                record.activated_at = Some(activated_at);
                record.expires_at = Some(expires_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
