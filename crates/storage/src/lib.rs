//! Storage layer for pocket-classroom
//!
//! A never-failing record layer ([`Storage`]) over a synchronous key-value
//! backend: an in-memory map or a `SQLite` table.

mod backend;
mod error;
mod keys;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod storage;
#[cfg(test)]
mod tests;
mod traits;

pub use backend::StoreBackend;
pub use error::StorageError;
pub use keys::{INDEX_KEY, capsule_key, progress_key};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use storage::{ConsistencyReport, Storage};
pub use traits::KeyValueStore;
