//! Reads, writes, and conditional deletes on the `content` table.

use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};

use dedup_core::constants::MAX_BULK_BATCH_SIZE;
use dedup_core::errors::DedupResult;
use dedup_core::models::{ContentFilter, ContentRecord, ContentStats, ContentStatus};

use crate::to_storage_err;

const SELECT_COLUMNS: &str =
    "SELECT id, status, is_duplicate, views, likes, created_at, payload FROM content";

pub fn insert(conn: &Connection, record: &ContentRecord) -> DedupResult<()> {
    let payload = serde_json::to_string(&record.payload)?;
    conn.execute(
        "INSERT INTO content (id, status, is_duplicate, views, likes, created_at, payload)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id,
            record.status.as_str(),
            record.is_duplicate as i32,
            record.stats.views,
            record.stats.likes,
            record.created_at.to_rfc3339(),
            payload,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert content {}: {e}", record.id)))?;
    Ok(())
}

pub fn upsert(conn: &Connection, record: &ContentRecord) -> DedupResult<()> {
    let payload = serde_json::to_string(&record.payload)?;
    conn.execute(
        "INSERT INTO content (id, status, is_duplicate, views, likes, created_at, payload)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            status = excluded.status,
            is_duplicate = excluded.is_duplicate,
            views = excluded.views,
            likes = excluded.likes,
            created_at = excluded.created_at,
            payload = excluded.payload",
        params![
            record.id,
            record.status.as_str(),
            record.is_duplicate as i32,
            record.stats.views,
            record.stats.likes,
            record.created_at.to_rfc3339(),
            payload,
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert content {}: {e}", record.id)))?;
    Ok(())
}

/// Records matching `filter`, ordered by id.
pub fn find(conn: &Connection, filter: &ContentFilter) -> DedupResult<Vec<ContentRecord>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    if let Some(flag) = filter.is_duplicate {
        clauses.push("is_duplicate = ?");
        values.push(SqlValue::Integer(flag as i64));
    }
    if let Some(status) = filter.exclude_status {
        clauses.push("status != ?");
        values.push(SqlValue::Text(status.as_str().to_string()));
    }

    let mut sql = SELECT_COLUMNS.to_string();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id");

    query_records(conn, &sql, params_from_iter(values.iter()))
}

pub fn find_by_id(conn: &Connection, id: &str) -> DedupResult<Option<ContentRecord>> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], |row| Ok(row_to_record(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

/// Bulk read in batches. Ids that are not present are skipped.
pub fn find_by_ids(conn: &Connection, ids: &[String]) -> DedupResult<Vec<ContentRecord>> {
    let mut out = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(MAX_BULK_BATCH_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("{SELECT_COLUMNS} WHERE id IN ({placeholders}) ORDER BY id");
        out.extend(query_records(conn, &sql, params_from_iter(chunk.iter()))?);
    }
    Ok(out)
}

/// Delete only while the record is still live. Returns whether a row went away.
pub fn delete_live(conn: &Connection, id: &str) -> DedupResult<bool> {
    let changed = conn
        .execute(
            "DELETE FROM content WHERE id = ?1 AND status != 'deleted'",
            params![id],
        )
        .map_err(|e| to_storage_err(format!("delete content {id}: {e}")))?;
    Ok(changed > 0)
}

pub fn clear_duplicate_flag(conn: &Connection, id: &str) -> DedupResult<bool> {
    let changed = conn
        .execute(
            "UPDATE content SET is_duplicate = 0 WHERE id = ?1",
            params![id],
        )
        .map_err(|e| to_storage_err(format!("clear duplicate flag {id}: {e}")))?;
    Ok(changed > 0)
}

pub fn count(conn: &Connection) -> DedupResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM content", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

fn query_records<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> DedupResult<Vec<ContentRecord>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn row_to_record(row: &Row<'_>) -> DedupResult<ContentRecord> {
    let read = |e: rusqlite::Error| to_storage_err(e.to_string());

    let id: String = row.get(0).map_err(read)?;
    let status: String = row.get(1).map_err(read)?;
    let is_duplicate: i32 = row.get(2).map_err(read)?;
    let views: u64 = row.get(3).map_err(read)?;
    let likes: u64 = row.get(4).map_err(read)?;
    let created_at: String = row.get(5).map_err(read)?;
    let payload: String = row.get(6).map_err(read)?;

    Ok(ContentRecord {
        created_at: parse_timestamp(&created_at)?,
        payload: serde_json::from_str::<Map<String, Value>>(&payload)?,
        status: ContentStatus::parse(&status),
        is_duplicate: is_duplicate != 0,
        stats: ContentStats { views, likes },
        id,
    })
}

pub(crate) fn parse_timestamp(s: &str) -> DedupResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {s:?}: {e}")))
}
