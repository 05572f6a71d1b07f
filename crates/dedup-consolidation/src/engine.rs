//! DedupEngine: the scheduler-facing entry point, with an `Arc<AtomicBool>`
//! single-execution guard, cooperative cancellation, and a run history.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use dedup_core::config::ConsolidationConfig;
use dedup_core::errors::{ConsolidationError, DedupError, DedupResult};
use dedup_core::models::RunSummary;
use dedup_core::traits::{IArchiveStore, IContentStore, ISimilarityOracle};
use dedup_observability::{dedup_run_span, log_summary, RunHistory, RunTotals};
use dedup_storage::StorageEngine;

use crate::cancel::CancelHandle;
use crate::pipeline::{self, PipelineContext};

/// Caller-owned state for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// When the previous run finished, for the minimum-interval gate.
    pub last_completed_at: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
    /// Ignore the minimum-interval gate.
    pub force: bool,
}

impl RunContext {
    pub fn now() -> Self {
        Self {
            last_completed_at: None,
            now: Utc::now(),
            force: false,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::now()
    }
}

/// The duplicate consolidation engine.
///
/// Runs the 3-phase pipeline against a content store, an archive store, and a
/// similarity oracle. Only one run may be in flight per engine.
pub struct DedupEngine {
    content: Arc<dyn IContentStore>,
    archive: Arc<dyn IArchiveStore>,
    oracle: Arc<dyn ISimilarityOracle>,
    config: ConsolidationConfig,
    /// Guard: only one run at a time.
    is_running: Arc<AtomicBool>,
    cancel: CancelHandle,
    /// Cluster pool, present when `worker_threads > 1`.
    pool: Option<rayon::ThreadPool>,
    history: Mutex<RunHistory>,
}

impl DedupEngine {
    pub fn new(
        content: Arc<dyn IContentStore>,
        archive: Arc<dyn IArchiveStore>,
        oracle: Arc<dyn ISimilarityOracle>,
        config: ConsolidationConfig,
    ) -> DedupResult<Self> {
        let pool = if config.worker_threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("dedup-worker-{i}"))
                .build()
                .map_err(|e| DedupError::ConfigError(format!("worker pool: {e}")))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            content,
            archive,
            oracle,
            config,
            is_running: Arc::new(AtomicBool::new(false)),
            cancel: CancelHandle::new(),
            pool,
            history: Mutex::new(RunHistory::default()),
        })
    }

    /// Engine over a single SQLite store serving both content and archive.
    pub fn from_storage(
        storage: Arc<StorageEngine>,
        oracle: Arc<dyn ISimilarityOracle>,
        config: ConsolidationConfig,
    ) -> DedupResult<Self> {
        let content: Arc<dyn IContentStore> = storage.clone();
        let archive: Arc<dyn IArchiveStore> = storage;
        Self::new(content, archive, oracle, config)
    }

    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Handle for cancelling runs from another thread. Stays set until reset.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn last_summary(&self) -> Option<RunSummary> {
        self.lock_history().latest().cloned()
    }

    pub fn totals(&self) -> RunTotals {
        self.lock_history().totals().clone()
    }

    /// Run now. The interval gate uses the last run this engine recorded
    /// that covered the whole flagged set. Gated, cancelled, and
    /// budget-truncated runs do not count.
    pub fn run(&self) -> DedupResult<RunSummary> {
        let ctx = RunContext {
            last_completed_at: self.last_completed_at(),
            ..RunContext::now()
        };
        self.run_with(&ctx)
    }

    /// Run with explicit caller-owned state.
    pub fn run_with(&self, ctx: &RunContext) -> DedupResult<RunSummary> {
        // Acquire the single-execution guard.
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConsolidationError::AlreadyRunning.into());
        }
        let _guard = RunningGuard(&self.is_running);

        let mut summary = RunSummary::begin(ctx.now);

        if let Some(reason) = self.gate_reason(ctx) {
            info!(reason = %reason, "run skipped");
            summary.skipped_reason = Some(reason);
            summary.finish(ctx.now);
            return Ok(summary);
        }

        let span = dedup_run_span!(summary.run_id);
        let _entered = span.enter();

        let pctx = PipelineContext {
            content: self.content.as_ref(),
            archive: self.archive.as_ref(),
            oracle: self.oracle.as_ref(),
            config: &self.config,
            cancel: &self.cancel,
            pool: self.pool.as_ref(),
            now: ctx.now,
        };
        if let Err(e) = pipeline::run_pipeline(&pctx, &mut summary) {
            warn!(error = %e, "run aborted before any consolidation");
            return Err(e);
        }

        summary.finish(Utc::now().max(ctx.now));
        log_summary(&summary);
        self.lock_history().record(summary.clone());
        Ok(summary)
    }

    fn gate_reason(&self, ctx: &RunContext) -> Option<String> {
        let interval = self.config.min_run_interval_secs;
        if interval == 0 || ctx.force {
            return None;
        }
        let last = ctx.last_completed_at?;
        let elapsed = ctx.now.signed_duration_since(last).num_seconds();
        let min = i64::try_from(interval).unwrap_or(i64::MAX);
        (elapsed < min).then(|| {
            format!("last run completed {elapsed}s ago, minimum interval is {interval}s")
        })
    }

    fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.lock_history()
            .runs()
            .filter(|s| s.covered_flagged_set())
            .filter_map(|s| s.finished_at)
            .max()
    }

    fn lock_history(&self) -> MutexGuard<'_, RunHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the single-execution guard on every exit path.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
