//! duet-store: durable key-value storage and command history for duet.
//!
//! - [`settings`] / [`schema`]: the SQLite `settings` table and its migrations.
//! - [`KvStore`]: the get/set contract history persistence is written against,
//!   backed by [`SqliteStore`] in the app and [`MemoryStore`] in tests.
//! - [`History`]: ordered submitted commands plus the Up/Down browsing cursor.

pub mod history;
pub mod kv;
pub mod schema;
pub mod settings;

use rusqlite::Connection;
use std::path::Path;

pub use history::{History, Newer, HISTORY_KEY};
pub use kv::{KvStore, MemoryStore, SqliteStore};

/// Errors from the durable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("malformed value under `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    schema::initialize(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, for tests and throwaway sessions.
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    schema::initialize(&conn)?;
    Ok(conn)
}
