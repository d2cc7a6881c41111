//! Local SQLite document store.
//!
//! Mirrors the hosted database's document model (collections of JSON documents
//! keyed by auto-ids) in a single table, so seed runs and inspections work
//! offline and in tests.

mod documents;
mod schema;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// SQLite connection holding the `documents` table.
///
/// Only reachable through [`DocumentStore`](crate::store::DocumentStore) and
/// the typed helpers in this module; raw SQL stays private.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::with_schema(Connection::open(path)?)
    }

    /// Fresh store that lives as long as the value; used by tests.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    /// Apply the idempotent schema to a new connection.
    fn with_schema(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}
