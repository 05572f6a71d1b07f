use crate::constants;

// Consolidation
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = constants::DEFAULT_SIMILARITY_THRESHOLD;
pub const DEFAULT_MAX_ORACLE_CALLS: usize = 0;
pub const DEFAULT_MAX_RUN_DURATION_SECS: u64 = 0;
pub const DEFAULT_WORKER_THREADS: usize = 1;
pub const DEFAULT_CLEAR_CANONICAL_FLAG: bool = true;
pub const DEFAULT_RECONCILE_BEFORE_RUN: bool = true;
pub const DEFAULT_MIN_RUN_INTERVAL_SECS: u64 = 0;

// Storage
pub const DEFAULT_DB_PATH: &str = "dedup.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
