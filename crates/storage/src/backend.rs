//! Unified store backend with enum dispatch.

#[cfg(feature = "sqlite")]
use std::path::Path;

use crate::error::StorageError;
use crate::memory::MemoryStore;
use crate::traits::KeyValueStore;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StoreBackend::Memory(s) => <MemoryStore as KeyValueStore>::$method(s, $($arg),*),
            #[cfg(feature = "sqlite")]
            StoreBackend::Sqlite(s) => <crate::SqliteStore as KeyValueStore>::$method(s, $($arg),*),
        }
    };
}

#[derive(Clone, Debug)]
pub enum StoreBackend {
    Memory(MemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(crate::SqliteStore),
}

impl StoreBackend {
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// # Errors
    /// Returns error if the database cannot be opened or migrated.
    #[cfg(feature = "sqlite")]
    pub fn open_sqlite(db_path: &Path) -> Result<Self, StorageError> {
        Ok(Self::Sqlite(crate::SqliteStore::open(db_path)?))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl KeyValueStore for StoreBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        dispatch!(self, get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        dispatch!(self, set(key, value))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        dispatch!(self, remove(key))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        dispatch!(self, keys())
    }
}
