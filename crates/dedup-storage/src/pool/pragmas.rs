//! Connection pragmas. File databases run in WAL mode; in-memory ones keep
//! SQLite's `memory` journal.

use std::time::Duration;

use rusqlite::Connection;
use tracing::warn;

use dedup_core::errors::DedupResult;

use crate::to_storage_err;

/// Configure a file-backed connection and return the journal mode SQLite
/// actually settled on.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> DedupResult<String> {
    conn.busy_timeout(Duration::from_millis(u64::from(busy_timeout_ms)))
        .map_err(|e| to_storage_err(format!("busy_timeout: {e}")))?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(|e| to_storage_err(format!("synchronous: {e}")))?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| to_storage_err(format!("foreign_keys: {e}")))?;

    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| to_storage_err(format!("journal_mode: {e}")))?;
    if !mode.eq_ignore_ascii_case("wal") {
        warn!(mode = %mode, "WAL unavailable; concurrent readers will block on writes");
    }
    Ok(mode)
}

/// Current journal mode, lowercased.
pub fn journal_mode(conn: &Connection) -> DedupResult<String> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.to_ascii_lowercase())
}
