//! `SQLite` key-value store.
//!
//! Records live in a single `kv_records` table. The store plays the role
//! browser local storage plays for the web build: durable, synchronous,
//! one text value per key.

mod migrations;

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use pocket_classroom_core::env_parse_with_default;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::error::StorageError;
use crate::traits::KeyValueStore;

pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Main store struct wrapping a `SQLite` connection pool
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.busy_timeout(Duration::from_millis(5000))?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::trace!(journal_mode = %mode, "connection initialized");
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

fn db_pool_size() -> u32 {
    env_parse_with_default("POCKET_CLASSROOM_DB_POOL_SIZE", 4u32).max(1)
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `db_path`.
    ///
    /// # Errors
    /// Returns error if the pool cannot be built or migrations fail.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);
        let pool_size = db_pool_size();
        let store = Self::from_manager(manager, pool_size)?;
        tracing::debug!(path = %db_path.display(), pool_size, "SQLite store opened");
        Ok(store)
    }

    /// Private in-memory database, mostly for tests.
    ///
    /// Every `SQLite` memory connection is its own database, so the pool is
    /// capped at a single connection.
    ///
    /// # Errors
    /// Returns error if the pool cannot be built or migrations fail.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_manager(SqliteConnectionManager::memory(), 1)
    }

    fn from_manager(manager: SqliteConnectionManager, pool_size: u32) -> Result<Self, StorageError> {
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let conn = pool.get()?;
        migrations::run_migrations(&conn)?;
        drop(conn);

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConn, StorageError> {
        Ok(self.pool.get()?)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv_records WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv_records (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv_records WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_records ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
