//! Idempotent inserts and lookups on the `archived_content` table.

use rusqlite::{params, Connection, OptionalExtension};

use dedup_core::errors::DedupResult;
use dedup_core::models::ArchivedRecord;

use crate::to_storage_err;

/// Insert unless an entry for the same original record already exists.
/// The unique index on `original_content_id` makes this safe under racing runs.
pub fn insert(conn: &Connection, record: &ArchivedRecord) -> DedupResult<bool> {
    let document = serde_json::to_string(record)?;
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO archived_content (
                archive_id, original_content_id, deleted_at, superseded_by, document
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.archive_id,
                record.original_content_id,
                record.deleted_at.to_rfc3339(),
                record.superseded_by,
                document,
            ],
        )
        .map_err(|e| {
            to_storage_err(format!(
                "archive insert {}: {e}",
                record.original_content_id
            ))
        })?;
    Ok(changed > 0)
}

pub fn exists_by_original_id(conn: &Connection, original_id: &str) -> DedupResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM archived_content WHERE original_content_id = ?1",
            params![original_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(found.is_some())
}

pub fn get_by_original_id(
    conn: &Connection,
    original_id: &str,
) -> DedupResult<Option<ArchivedRecord>> {
    let document: Option<String> = conn
        .query_row(
            "SELECT document FROM archived_content WHERE original_content_id = ?1",
            params![original_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match document {
        Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
        None => Ok(None),
    }
}

pub fn count(conn: &Connection) -> DedupResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM archived_content", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

/// Number of archive rows for one original record. Always 0 or 1.
pub fn count_for_original(conn: &Connection, original_id: &str) -> DedupResult<usize> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM archived_content WHERE original_content_id = ?1",
            params![original_id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}
