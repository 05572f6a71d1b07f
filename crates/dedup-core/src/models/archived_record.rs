use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentRecord;

/// A demoted record's full document plus audit fields.
///
/// Written once by the consolidation executor and never mutated.
/// `original_content_id` is an audit back-reference only.
///
/// The original document is nested under `record`, so payload keys that
/// shadow the audit fields (e.g. a restored record still carrying
/// `deletedAt`) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedRecord {
    pub archive_id: String,
    pub original_content_id: String,
    pub deleted_at: DateTime<Utc>,
    /// Canonical record that survived in this record's cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
    pub record: ContentRecord,
}

impl ArchivedRecord {
    pub fn from_demoted(
        record: &ContentRecord,
        superseded_by: Option<&str>,
        deleted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            archive_id: uuid::Uuid::new_v4().to_string(),
            original_content_id: record.id.clone(),
            deleted_at,
            superseded_by: superseded_by.map(str::to_string),
            record: record.clone(),
        }
    }
}
