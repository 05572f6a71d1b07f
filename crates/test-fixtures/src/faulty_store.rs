use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use dedup_core::errors::{DedupResult, StorageError};
use dedup_core::models::{ArchivedRecord, ContentFilter, ContentRecord};
use dedup_core::traits::{IArchiveStore, IContentStore};
use dedup_storage::StorageEngine;

/// Wraps a real `StorageEngine` and fails selected operations on demand.
pub struct FaultyStore {
    inner: Arc<StorageEngine>,
    fail_archive_for: Mutex<HashSet<String>>,
    fail_delete_for: Mutex<HashSet<String>>,
    fail_flag_clear: AtomicBool,
    fail_find: AtomicBool,
    fail_bulk_read: AtomicBool,
    writes: Mutex<usize>,
}

fn injected(what: &str) -> dedup_core::errors::DedupError {
    StorageError::SqliteError {
        message: format!("injected failure: {what}"),
    }
    .into()
}

impl FaultyStore {
    pub fn new(inner: Arc<StorageEngine>) -> Self {
        Self {
            inner,
            fail_archive_for: Mutex::new(HashSet::new()),
            fail_delete_for: Mutex::new(HashSet::new()),
            fail_flag_clear: AtomicBool::new(false),
            fail_find: AtomicBool::new(false),
            fail_bulk_read: AtomicBool::new(false),
            writes: Mutex::new(0),
        }
    }

    pub fn inner(&self) -> &Arc<StorageEngine> {
        &self.inner
    }

    pub fn fail_archive_for(&self, id: &str) {
        self.fail_archive_for.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_delete_for(&self, id: &str) {
        self.fail_delete_for.lock().unwrap().insert(id.to_string());
    }

    pub fn set_fail_flag_clear(&self, fail: bool) {
        self.fail_flag_clear.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_find(&self, fail: bool) {
        self.fail_find.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_bulk_read(&self, fail: bool) {
        self.fail_bulk_read.store(fail, Ordering::SeqCst);
    }

    /// Clear every injected fault.
    pub fn heal(&self) {
        self.fail_archive_for.lock().unwrap().clear();
        self.fail_delete_for.lock().unwrap().clear();
        self.set_fail_flag_clear(false);
        self.set_fail_find(false);
        self.set_fail_bulk_read(false);
    }

    /// Successful delete, flag-clear, and archive writes routed through this wrapper.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn count_write(&self) {
        *self.writes.lock().unwrap() += 1;
    }
}

impl IContentStore for FaultyStore {
    fn find(&self, filter: &ContentFilter) -> DedupResult<Vec<ContentRecord>> {
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(injected("find"));
        }
        IContentStore::find(self.inner.as_ref(), filter)
    }

    fn find_by_id(&self, id: &str) -> DedupResult<Option<ContentRecord>> {
        self.inner.find_by_id(id)
    }

    fn find_by_ids(&self, ids: &[String]) -> DedupResult<Vec<ContentRecord>> {
        if self.fail_bulk_read.load(Ordering::SeqCst) {
            return Err(injected("find_by_ids"));
        }
        self.inner.find_by_ids(ids)
    }

    fn insert(&self, record: &ContentRecord) -> DedupResult<()> {
        IContentStore::insert(self.inner.as_ref(), record)
    }

    fn upsert(&self, record: &ContentRecord) -> DedupResult<()> {
        self.inner.upsert(record)
    }

    fn delete_live(&self, id: &str) -> DedupResult<bool> {
        if self.fail_delete_for.lock().unwrap().contains(id) {
            return Err(injected("delete"));
        }
        let deleted = self.inner.delete_live(id)?;
        if deleted {
            self.count_write();
        }
        Ok(deleted)
    }

    fn clear_duplicate_flag(&self, id: &str) -> DedupResult<bool> {
        if self.fail_flag_clear.load(Ordering::SeqCst) {
            return Err(injected("clear_duplicate_flag"));
        }
        let cleared = self.inner.clear_duplicate_flag(id)?;
        if cleared {
            self.count_write();
        }
        Ok(cleared)
    }
}

impl IArchiveStore for FaultyStore {
    fn insert(&self, record: &ArchivedRecord) -> DedupResult<bool> {
        if self
            .fail_archive_for
            .lock()
            .unwrap()
            .contains(&record.original_content_id)
        {
            return Err(injected("archive insert"));
        }
        let inserted = IArchiveStore::insert(self.inner.as_ref(), record)?;
        if inserted {
            self.count_write();
        }
        Ok(inserted)
    }

    fn exists_by_original_id(&self, original_id: &str) -> DedupResult<bool> {
        self.inner.exists_by_original_id(original_id)
    }

    fn get_by_original_id(&self, original_id: &str) -> DedupResult<Option<ArchivedRecord>> {
        self.inner.get_by_original_id(original_id)
    }

    fn count(&self) -> DedupResult<usize> {
        IArchiveStore::count(self.inner.as_ref())
    }
}
