mod consolidation_config;
pub mod defaults;
mod observability_config;
mod storage_config;

pub use consolidation_config::{ClusteringMode, ConsolidationConfig};
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{DedupError, DedupResult};

/// Top-level configuration. Every section falls back to its defaults, so an
/// empty TOML document is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub consolidation: ConsolidationConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl DedupConfig {
    /// Parse a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> DedupResult<()> {
        let threshold = self.consolidation.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(DedupError::ConfigError(format!(
                "consolidation.similarity_threshold must be in [0, 1], got {threshold}"
            )));
        }
        if self.consolidation.worker_threads == 0 {
            return Err(DedupError::ConfigError(
                "consolidation.worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
