use serde::{Deserialize, Serialize};

use super::defaults;

/// How the cluster builder groups flagged records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringMode {
    /// Seed plus its direct qualifying matches. Not transitive.
    #[default]
    OneHop,
    /// Connected components over every qualifying link seen in the run.
    Transitive,
}

/// Consolidation pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Links must score strictly above this to join a cluster.
    pub similarity_threshold: f64,
    pub clustering_mode: ClusteringMode,
    /// Oracle calls allowed per run. 0 means unlimited.
    pub max_oracle_calls: usize,
    /// Wall-clock budget for the clustering phase. 0 means unlimited.
    pub max_run_duration_secs: u64,
    /// Clusters processed concurrently. 1 runs them sequentially.
    pub worker_threads: usize,
    /// Clear `isDuplicate` on the surviving record of each cluster.
    pub clear_canonical_flag: bool,
    /// Remove archived-but-live records before clustering.
    pub reconcile_before_run: bool,
    /// Minimum spacing between runs. 0 disables the gate.
    pub min_run_interval_secs: u64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            clustering_mode: ClusteringMode::default(),
            max_oracle_calls: defaults::DEFAULT_MAX_ORACLE_CALLS,
            max_run_duration_secs: defaults::DEFAULT_MAX_RUN_DURATION_SECS,
            worker_threads: defaults::DEFAULT_WORKER_THREADS,
            clear_canonical_flag: defaults::DEFAULT_CLEAR_CANONICAL_FLAG,
            reconcile_before_run: defaults::DEFAULT_RECONCILE_BEFORE_RUN,
            min_run_interval_secs: defaults::DEFAULT_MIN_RUN_INTERVAL_SECS,
        }
    }
}
