//! In-process key-value store.
//!
//! Clones share the same map, so a test can keep a handle to the store it
//! passed into [`crate::Storage`] and inspect raw records afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::StorageError;
use crate::traits::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    /// Maximum total bytes of keys plus values; `None` is unbounded
    quota: Option<usize>,
}

impl Inner {
    fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

fn lock_inner(mutex: &Mutex<Inner>) -> Result<MutexGuard<'_, Inner>, StorageError> {
    mutex.lock().map_err(|e: PoisonError<_>| StorageError::Lock(e.to_string()))
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes once keys plus values exceed `bytes`,
    /// the way a browser rejects writes past its storage quota.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.quota = Some(bytes);
        }
        store
    }

    /// Changes the quota for subsequent writes. Existing entries are kept.
    pub fn set_quota(&self, bytes: Option<usize>) {
        match self.inner.lock() {
            Ok(mut inner) => inner.quota = bytes,
            Err(e) => tracing::warn!(error = %e, "memory store lock poisoned, quota unchanged"),
        }
    }

    /// Writes a raw value bypassing the quota, e.g. to plant a corrupt record.
    pub fn insert_raw(&self, key: &str, value: &str) {
        match self.inner.lock() {
            Ok(mut inner) => {
                inner.entries.insert(key.to_owned(), value.to_owned());
            },
            Err(e) => tracing::warn!(error = %e, key, "memory store lock poisoned, raw insert dropped"),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map_or(0, |inner| inner.entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = lock_inner(&self.inner)?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = lock_inner(&self.inner)?;
        if let Some(quota) = inner.quota {
            let replaced = inner.entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = inner.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { key: key.to_owned(), needed, quota });
            }
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = lock_inner(&self.inner)?;
        inner.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let inner = lock_inner(&self.inner)?;
        Ok(inner.entries.keys().cloned().collect())
    }
}
