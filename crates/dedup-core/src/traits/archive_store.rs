use crate::errors::DedupResult;
use crate::models::ArchivedRecord;

/// Archive of demoted records.
pub trait IArchiveStore: Send + Sync {
    /// Insert an archived copy. Returns false, without writing, when an
    /// entry with the same `original_content_id` already exists.
    fn insert(&self, record: &ArchivedRecord) -> DedupResult<bool>;
    fn exists_by_original_id(&self, original_id: &str) -> DedupResult<bool>;
    fn get_by_original_id(&self, original_id: &str) -> DedupResult<Option<ArchivedRecord>>;
    fn count(&self) -> DedupResult<usize>;
}
