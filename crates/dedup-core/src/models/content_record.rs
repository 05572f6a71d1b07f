use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{TIER_DRAFT, TIER_OTHER, TIER_PENDING, TIER_PUBLISHED};

/// Lifecycle status of a content record.
///
/// Statuses written by other services that this pipeline does not know about
/// deserialize to `Unknown` and rank below every known live status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Pending,
    Published,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl ContentStatus {
    /// Ranking tier: published > pending > draft > anything else.
    pub fn tier(self) -> u8 {
        match self {
            Self::Published => TIER_PUBLISHED,
            Self::Pending => TIER_PENDING,
            Self::Draft => TIER_DRAFT,
            Self::Deleted | Self::Unknown => TIER_OTHER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Deleted => "deleted",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "published" => Self::Published,
            "deleted" => Self::Deleted,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engagement counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStats {
    pub views: u64,
    pub likes: u64,
}

/// A content record as held by the primary content store.
///
/// Only the fields the pipeline reads are typed. Everything else the
/// generation service writes is kept verbatim in `payload` and flattened back
/// out on serialization, so archived copies carry the full document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub status: ContentStatus,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub stats: ContentStats,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ContentRecord {
    pub fn new(id: impl Into<String>, status: ContentStatus, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            status,
            is_duplicate: false,
            stats: ContentStats::default(),
            created_at,
            payload: Map::new(),
        }
    }

    /// Views plus likes.
    pub fn engagement(&self) -> u64 {
        self.stats.views.saturating_add(self.stats.likes)
    }

    /// A record is live until its status flips to `deleted`.
    pub fn is_live(&self) -> bool {
        self.status != ContentStatus::Deleted
    }
}
