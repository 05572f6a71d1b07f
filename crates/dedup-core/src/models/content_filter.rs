use serde::{Deserialize, Serialize};

use super::ContentStatus;

/// Minimal query filter understood by every content store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFilter {
    /// Match on the duplicate flag when set.
    pub is_duplicate: Option<bool>,
    /// Exclude records in this status when set.
    pub exclude_status: Option<ContentStatus>,
}

impl ContentFilter {
    /// Records flagged as duplicates that have not been deleted.
    pub fn flagged_duplicates() -> Self {
        Self {
            is_duplicate: Some(true),
            exclude_status: Some(ContentStatus::Deleted),
        }
    }
}
