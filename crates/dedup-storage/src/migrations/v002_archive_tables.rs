//! v002: archive of demoted content. One row per original record at most.

use rusqlite::Connection;

use dedup_core::errors::DedupResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> DedupResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS archived_content (
            archive_id          TEXT PRIMARY KEY,
            original_content_id TEXT NOT NULL,
            deleted_at          TEXT NOT NULL,
            superseded_by       TEXT,
            document            TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_archived_original
            ON archived_content(original_content_id);
        CREATE INDEX IF NOT EXISTS idx_archived_deleted_at ON archived_content(deleted_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
