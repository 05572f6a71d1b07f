use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::debug;

use dedup_core::errors::DedupResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// The single connection every read and write goes through.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u32) -> DedupResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        let mode = apply_pragmas(&conn, busy_timeout_ms)?;
        debug!(path = %path.display(), journal_mode = %mode, "opened database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> DedupResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> DedupResult<T>
    where
        F: FnOnce(&Connection) -> DedupResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("connection lock poisoned: {e}")))?;
        f(&guard)
    }
}
