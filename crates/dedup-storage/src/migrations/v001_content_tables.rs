//! v001: primary content table.

use rusqlite::Connection;

use dedup_core::errors::DedupResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> DedupResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS content (
            id           TEXT PRIMARY KEY,
            status       TEXT NOT NULL,
            is_duplicate INTEGER NOT NULL DEFAULT 0,
            views        INTEGER NOT NULL DEFAULT 0,
            likes        INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            payload      TEXT NOT NULL DEFAULT '{}'
        );

        CREATE INDEX IF NOT EXISTS idx_content_duplicate ON content(is_duplicate, status);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
