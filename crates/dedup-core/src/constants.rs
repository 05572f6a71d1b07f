/// Crate version, surfaced in run summaries and logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Links must score strictly above this to join a cluster.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Status tiers used by the quality ranker. Higher wins.
pub const TIER_PUBLISHED: u8 = 3;
pub const TIER_PENDING: u8 = 2;
pub const TIER_DRAFT: u8 = 1;
pub const TIER_OTHER: u8 = 0;

/// Maximum number of ids bound into a single `IN (...)` bulk read.
pub const MAX_BULK_BATCH_SIZE: usize = 500;

/// Number of run summaries retained by the run history.
pub const DEFAULT_RUN_HISTORY_LEN: usize = 30;
