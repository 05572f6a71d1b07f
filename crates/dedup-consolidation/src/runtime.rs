//! DedupRuntime: config loading, store wiring, and the engine a scheduler
//! embeds.

use std::path::PathBuf;
use std::sync::Arc;

use dedup_core::config::{DedupConfig, StorageConfig};
use dedup_core::errors::{DedupError, DedupResult};
use dedup_core::models::RunSummary;
use dedup_core::traits::ISimilarityOracle;
use dedup_observability::init_tracing;
use dedup_storage::StorageEngine;
use tracing::info;

use crate::engine::{DedupEngine, RunContext};

/// Options for building the runtime.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// SQLite file. Overrides `[storage].db_path`.
    pub db_path: Option<PathBuf>,
    /// TOML configuration. If None, uses defaults.
    pub config_toml: Option<String>,
    /// Install the global tracing subscriber from `[observability]`.
    pub init_tracing: bool,
}

/// Owns the store and the engine for the lifetime of the host process.
pub struct DedupRuntime {
    pub storage: Arc<StorageEngine>,
    pub engine: DedupEngine,
    pub config: DedupConfig,
}

impl DedupRuntime {
    /// Build the runtime.
    ///
    /// Store selection: `db_path` if given, else `[storage].db_path` when a
    /// config document was given, else an in-memory store.
    pub fn new(opts: RuntimeOptions, oracle: Arc<dyn ISimilarityOracle>) -> DedupResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => DedupConfig::from_toml(toml_str)
                .map_err(|e| DedupError::ConfigError(e.to_string()))?,
            None => DedupConfig::default(),
        };
        config.validate()?;

        if opts.init_tracing {
            init_tracing(&config.observability);
        }

        let storage = match (&opts.db_path, &opts.config_toml) {
            (Some(path), _) => StorageEngine::open_with_config(&StorageConfig {
                db_path: path.to_string_lossy().into_owned(),
                ..config.storage.clone()
            })?,
            (None, Some(_)) => StorageEngine::open_with_config(&config.storage)?,
            (None, None) => StorageEngine::open_in_memory()?,
        };
        let storage = Arc::new(storage);

        let engine =
            DedupEngine::from_storage(storage.clone(), oracle, config.consolidation.clone())?;
        info!(
            mode = ?config.consolidation.clustering_mode,
            threshold = config.consolidation.similarity_threshold,
            workers = config.consolidation.worker_threads,
            "dedup runtime ready"
        );

        Ok(Self {
            storage,
            engine,
            config,
        })
    }

    pub fn run(&self) -> DedupResult<RunSummary> {
        self.engine.run()
    }

    pub fn run_with(&self, ctx: &RunContext) -> DedupResult<RunSummary> {
        self.engine.run_with(ctx)
    }
}
