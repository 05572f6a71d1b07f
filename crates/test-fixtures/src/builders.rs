use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use dedup_core::models::{ContentRecord, ContentStatus};

/// Fixed reference time so ranking by age is deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid base time"))
}

/// Start building a draft, unflagged record created at `base_time()`.
pub fn record(id: &str) -> RecordBuilder {
    RecordBuilder {
        record: ContentRecord::new(id, ContentStatus::Draft, base_time()),
    }
}

/// Fluent builder for `ContentRecord`.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ContentRecord,
}

impl RecordBuilder {
    pub fn status(mut self, status: ContentStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn published(self) -> Self {
        self.status(ContentStatus::Published)
    }

    pub fn pending(self) -> Self {
        self.status(ContentStatus::Pending)
    }

    pub fn draft(self) -> Self {
        self.status(ContentStatus::Draft)
    }

    pub fn deleted(self) -> Self {
        self.status(ContentStatus::Deleted)
    }

    pub fn views(mut self, views: u64) -> Self {
        self.record.stats.views = views;
        self
    }

    pub fn likes(mut self, likes: u64) -> Self {
        self.record.stats.likes = likes;
        self
    }

    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.record.created_at = base_time() - Duration::days(days);
        self
    }

    pub fn flagged(mut self) -> Self {
        self.record.is_duplicate = true;
        self
    }

    /// Set an arbitrary payload field, e.g. `title`.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.record.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> ContentRecord {
        self.record
    }
}
