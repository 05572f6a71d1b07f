//! StorageEngine: owns the connection, runs migrations on open, and
//! implements both `IContentStore` and `IArchiveStore`.

use std::path::Path;

use dedup_core::config::StorageConfig;
use dedup_core::config::defaults::DEFAULT_BUSY_TIMEOUT_MS;
use dedup_core::errors::DedupResult;
use dedup_core::models::{ArchivedRecord, ContentFilter, ContentRecord};
use dedup_core::traits::{IArchiveStore, IContentStore};

use crate::migrations;
use crate::pool::{pragmas, WriteConnection};
use crate::queries::{archive_ops, content_ops};

/// SQLite-backed content and archive store.
pub struct StorageEngine {
    writer: WriteConnection,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> DedupResult<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open using the `[storage]` config section.
    pub fn open_with_config(config: &StorageConfig) -> DedupResult<Self> {
        Self::open_with_timeout(Path::new(&config.db_path), config.busy_timeout_ms)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> DedupResult<Self> {
        let engine = Self {
            writer: WriteConnection::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn open_with_timeout(path: &Path, busy_timeout_ms: u32) -> DedupResult<Self> {
        let engine = Self {
            writer: WriteConnection::open(path, busy_timeout_ms)?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> DedupResult<()> {
        self.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Schema version of the open database.
    pub fn schema_version(&self) -> DedupResult<u32> {
        self.writer.with_conn_sync(migrations::current_version)
    }

    /// Journal mode of the open database: `wal` for files, `memory` in memory.
    pub fn journal_mode(&self) -> DedupResult<String> {
        self.writer.with_conn_sync(pragmas::journal_mode)
    }

    /// Total rows in the content table, deleted-status rows included.
    pub fn content_count(&self) -> DedupResult<usize> {
        self.writer.with_conn_sync(content_ops::count)
    }

    /// Archive rows recorded for one original record.
    pub fn archive_count_for(&self, original_id: &str) -> DedupResult<usize> {
        self.writer
            .with_conn_sync(|conn| archive_ops::count_for_original(conn, original_id))
    }
}

impl IContentStore for StorageEngine {
    fn find(&self, filter: &ContentFilter) -> DedupResult<Vec<ContentRecord>> {
        self.writer
            .with_conn_sync(|conn| content_ops::find(conn, filter))
    }

    fn find_by_id(&self, id: &str) -> DedupResult<Option<ContentRecord>> {
        self.writer
            .with_conn_sync(|conn| content_ops::find_by_id(conn, id))
    }

    fn find_by_ids(&self, ids: &[String]) -> DedupResult<Vec<ContentRecord>> {
        self.writer
            .with_conn_sync(|conn| content_ops::find_by_ids(conn, ids))
    }

    fn insert(&self, record: &ContentRecord) -> DedupResult<()> {
        self.writer
            .with_conn_sync(|conn| content_ops::insert(conn, record))
    }

    fn upsert(&self, record: &ContentRecord) -> DedupResult<()> {
        self.writer
            .with_conn_sync(|conn| content_ops::upsert(conn, record))
    }

    fn delete_live(&self, id: &str) -> DedupResult<bool> {
        self.writer
            .with_conn_sync(|conn| content_ops::delete_live(conn, id))
    }

    fn clear_duplicate_flag(&self, id: &str) -> DedupResult<bool> {
        self.writer
            .with_conn_sync(|conn| content_ops::clear_duplicate_flag(conn, id))
    }
}

impl IArchiveStore for StorageEngine {
    fn insert(&self, record: &ArchivedRecord) -> DedupResult<bool> {
        self.writer
            .with_conn_sync(|conn| archive_ops::insert(conn, record))
    }

    fn exists_by_original_id(&self, original_id: &str) -> DedupResult<bool> {
        self.writer
            .with_conn_sync(|conn| archive_ops::exists_by_original_id(conn, original_id))
    }

    fn get_by_original_id(&self, original_id: &str) -> DedupResult<Option<ArchivedRecord>> {
        self.writer
            .with_conn_sync(|conn| archive_ops::get_by_original_id(conn, original_id))
    }

    fn count(&self) -> DedupResult<usize> {
        self.writer.with_conn_sync(archive_ops::count)
    }
}
