use crate::errors::DedupResult;
use crate::models::{ContentFilter, ContentRecord};

/// Primary content store: the live records end users see.
pub trait IContentStore: Send + Sync {
    // --- Reads ---
    fn find(&self, filter: &ContentFilter) -> DedupResult<Vec<ContentRecord>>;
    fn find_by_id(&self, id: &str) -> DedupResult<Option<ContentRecord>>;
    /// Bulk read. Missing ids are silently absent from the result.
    fn find_by_ids(&self, ids: &[String]) -> DedupResult<Vec<ContentRecord>>;

    // --- Writes ---
    fn insert(&self, record: &ContentRecord) -> DedupResult<()>;
    fn upsert(&self, record: &ContentRecord) -> DedupResult<()>;

    /// Delete `id` only if it is still present and not `deleted`.
    /// Returns false when nothing matched, e.g. a concurrent run got there first.
    fn delete_live(&self, id: &str) -> DedupResult<bool>;

    /// Clear the duplicate flag on `id`. Returns false when the record is gone.
    fn clear_duplicate_flag(&self, id: &str) -> DedupResult<bool>;
}
