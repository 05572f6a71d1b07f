//! 3-phase consolidation pipeline.
//!
//! Phase 1: Selection (+ reconciliation sweep) → Phase 2: Clustering →
//! Phase 3: Consolidation, one cluster at a time or on a bounded pool.

pub mod phase1_selection;
pub mod phase2_clustering;
pub mod phase3_consolidation;

use std::time::Duration;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{info, warn};

use dedup_core::config::ConsolidationConfig;
use dedup_core::errors::DedupResult;
use dedup_core::models::{Cluster, RunSummary};
use dedup_core::traits::{IArchiveStore, IContentStore, ISimilarityOracle};
use dedup_observability::dedup_clustering_span;

use crate::cancel::CancelHandle;
use crate::oracle::{OracleBudget, OracleClient};
use phase3_consolidation::{ClusterOutcome, ConsolidationContext};

/// Everything one pipeline run reads from.
pub struct PipelineContext<'a> {
    pub content: &'a dyn IContentStore,
    pub archive: &'a dyn IArchiveStore,
    pub oracle: &'a dyn ISimilarityOracle,
    pub config: &'a ConsolidationConfig,
    pub cancel: &'a CancelHandle,
    /// Dedicated pool for cluster execution. `None` runs sequentially.
    pub pool: Option<&'a rayon::ThreadPool>,
    pub now: DateTime<Utc>,
}

/// Run the full pipeline, accumulating into `summary`.
///
/// Only a failure to read the flagged set is returned as an error. Every
/// per-seed and per-cluster problem lands in `summary.issues`.
pub fn run_pipeline(ctx: &PipelineContext<'_>, summary: &mut RunSummary) -> DedupResult<()> {
    if ctx.cancel.is_cancelled() {
        info!("cancelled before start");
        summary.cancelled = true;
        return Ok(());
    }

    // Phase 1: Selection.
    let flagged = phase1_selection::select_flagged(ctx.content)?;
    summary.flagged_count = flagged.len();
    info!(count = flagged.len(), "Phase 1: selected flagged records");

    let mut flagged_ids: Vec<String> = flagged.into_iter().map(|r| r.id).collect();
    if ctx.config.reconcile_before_run {
        let sweep =
            phase1_selection::reconcile_archived_live(flagged_ids, ctx.content, ctx.archive);
        summary.reconciled = sweep.reconciled.len();
        for issue in sweep.issues {
            summary.record_issue(issue);
        }
        if summary.reconciled > 0 {
            info!(reconciled = summary.reconciled, "Phase 1: reconciled archived records");
        }
        flagged_ids = sweep.remaining_ids;
    }

    if flagged_ids.len() < 2 {
        info!(remaining = flagged_ids.len(), "nothing to cluster");
        return Ok(());
    }

    // Phase 2: Clustering.
    let clustering = {
        let span = dedup_clustering_span!(flagged_ids.len(), ctx.config.clustering_mode);
        let _entered = span.enter();
        let mut client = OracleClient::new(
            ctx.oracle,
            ctx.config.similarity_threshold,
            budget_for(ctx.config),
        );
        phase2_clustering::build_clusters(
            &flagged_ids,
            &mut client,
            ctx.config.clustering_mode,
            ctx.cancel,
        )
    };

    let clusters: Vec<&Cluster> = clustering.actionable().collect();
    summary.clusters_found = clusters.len();
    summary.orphans = clustering.orphans.len();
    summary.budget_exhausted = clustering.budget_exhausted;
    summary.clusters_skipped += clustering.skipped.len();
    for issue in clustering.skipped.iter().cloned() {
        summary.record_issue(issue);
    }
    if clustering.cancelled {
        summary.cancelled = true;
        return Ok(());
    }

    // Phase 3: Consolidation.
    let cctx = ConsolidationContext {
        content: ctx.content,
        archive: ctx.archive,
        clear_canonical_flag: ctx.config.clear_canonical_flag,
        now: ctx.now,
    };
    let outcomes = execute_clusters(&clusters, &cctx, ctx.cancel, ctx.pool);

    for outcome in outcomes {
        let Some(outcome) = outcome else {
            summary.cancelled = true;
            continue;
        };
        match outcome {
            ClusterOutcome::Noop | ClusterOutcome::AlreadyResolved { .. } => {}
            ClusterOutcome::FetchFailed(issue) => {
                summary.clusters_skipped += 1;
                summary.record_issue(issue);
            }
            ClusterOutcome::Consolidated {
                demoted, issues, ..
            } => {
                summary.records_demoted += demoted.len();
                for issue in issues {
                    summary.record_issue(issue);
                }
            }
        }
    }

    if summary.cancelled {
        warn!("cancelled between clusters");
    }
    info!(
        clusters = summary.clusters_found,
        demoted = summary.records_demoted,
        skipped = summary.clusters_skipped,
        errors = summary.errors,
        "Phase 3: consolidation complete"
    );
    Ok(())
}

/// One entry per cluster, `None` where cancellation stopped it from starting.
fn execute_clusters(
    clusters: &[&Cluster],
    ctx: &ConsolidationContext<'_>,
    cancel: &CancelHandle,
    pool: Option<&rayon::ThreadPool>,
) -> Vec<Option<ClusterOutcome>> {
    let run_one = |cluster: &&Cluster| {
        if cancel.is_cancelled() {
            return None;
        }
        Some(phase3_consolidation::consolidate_cluster(cluster, ctx))
    };

    match pool {
        Some(pool) => pool.install(|| clusters.par_iter().map(run_one).collect()),
        None => clusters.iter().map(run_one).collect(),
    }
}

fn budget_for(config: &ConsolidationConfig) -> OracleBudget {
    let duration =
        (config.max_run_duration_secs > 0).then(|| Duration::from_secs(config.max_run_duration_secs));
    OracleBudget::new(config.max_oracle_calls, duration)
}
