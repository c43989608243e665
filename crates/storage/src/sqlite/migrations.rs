//! Database migrations

use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 1;

/// Migration v1: one row per stored record.
const V1_SQL: &str = "
CREATE TABLE IF NOT EXISTS kv_records (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::debug!("Database schema version: {} (target: {})", current_version, SCHEMA_VERSION);

    if current_version < 1i32 {
        tracing::info!("Running migration v1: kv_records table");
        conn.execute_batch(V1_SQL)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
