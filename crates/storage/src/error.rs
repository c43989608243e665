//! Typed error enum for the key-value backends.
//!
//! These errors never leave [`crate::Storage`]: it logs them and turns them
//! into `false` or a default value. Backends and their tests see them in full.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Write would push the store past its byte quota.
    #[error("quota exceeded writing {key}: needs {needed} bytes, quota is {quota}")]
    QuotaExceeded { key: String, needed: usize, quota: usize },

    /// SQL / connection failure.
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No pooled connection could be obtained.
    #[cfg(feature = "sqlite")]
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// In-memory store mutex was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Lock(String),

    /// Stored text could not be turned into (or produced from) a record.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StorageError {
    /// Whether the write failed only because the store is full.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}
