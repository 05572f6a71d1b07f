//! Span definitions per pipeline stage: run, clustering, cluster, oracle.

/// Create a span covering one full pipeline run.
#[macro_export]
macro_rules! dedup_run_span {
    ($run_id:expr) => {
        tracing::info_span!("dedup.run", run_id = %$run_id)
    };
}

/// Create a span for the clustering phase.
#[macro_export]
macro_rules! dedup_clustering_span {
    ($flagged:expr, $mode:expr) => {
        tracing::info_span!("dedup.clustering", flagged = $flagged, mode = ?$mode)
    };
}

/// Create a span for consolidating one cluster.
#[macro_export]
macro_rules! dedup_cluster_span {
    ($seed_id:expr, $size:expr) => {
        tracing::info_span!("dedup.cluster", seed = %$seed_id, size = $size)
    };
}

/// Create a span for a single oracle lookup.
#[macro_export]
macro_rules! dedup_oracle_span {
    ($oracle:expr, $record_id:expr) => {
        tracing::debug_span!("dedup.oracle", oracle = %$oracle, record = %$record_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RUN: &str = "dedup.run";
    pub const CLUSTERING: &str = "dedup.clustering";
    pub const CLUSTER: &str = "dedup.cluster";
    pub const ORACLE: &str = "dedup.oracle";
}
