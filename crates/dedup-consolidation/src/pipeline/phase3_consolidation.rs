//! Phase 3: Consolidation. Keep the best record of a cluster, archive and
//! remove the rest.
//!
//! Per demoted record the order is archive, then conditional delete. A record
//! whose archival fails stays live. A record archived but not deleted is left
//! for the next run's reconciliation sweep and is never archived twice.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use dedup_core::errors::ConsolidationError;
use dedup_core::models::{ArchivedRecord, Cluster, ContentRecord, IssueKind, RunIssue};
use dedup_core::traits::{IArchiveStore, IContentStore};
use dedup_observability::dedup_cluster_span;

use crate::algorithms::quality_rank;

/// Stores and settings shared by every cluster in a run.
#[derive(Clone, Copy)]
pub struct ConsolidationContext<'a> {
    pub content: &'a dyn IContentStore,
    pub archive: &'a dyn IArchiveStore,
    pub clear_canonical_flag: bool,
    pub now: DateTime<Utc>,
}

/// What happened to one cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterOutcome {
    /// Fewer than two members; nothing to do.
    Noop,
    /// Fewer than two members were still live at execution time.
    AlreadyResolved { live: usize },
    /// Members could not be re-read; the cluster was skipped.
    FetchFailed(RunIssue),
    Consolidated {
        kept: String,
        /// Records archived and removed from the primary store by this call.
        demoted: Vec<String>,
        issues: Vec<RunIssue>,
    },
}

impl ClusterOutcome {
    pub fn demoted_count(&self) -> usize {
        match self {
            Self::Consolidated { demoted, .. } => demoted.len(),
            _ => 0,
        }
    }
}

enum Demotion {
    Removed,
    /// Archived (now or earlier) but already gone from the primary store.
    Vanished,
    Failed(RunIssue),
}

/// Consolidate one cluster.
pub fn consolidate_cluster(cluster: &Cluster, ctx: &ConsolidationContext<'_>) -> ClusterOutcome {
    if cluster.is_singleton() {
        return ClusterOutcome::Noop;
    }

    let span = dedup_cluster_span!(cluster.seed_id, cluster.len());
    let _entered = span.enter();

    let members = match ctx.content.find_by_ids(&cluster.member_ids) {
        Ok(members) => members,
        Err(e) => {
            warn!(seed = %cluster.seed_id, error = %e, "could not re-read cluster members; skipping");
            return ClusterOutcome::FetchFailed(RunIssue::new(
                IssueKind::FetchFailed,
                &cluster.seed_id,
                e.to_string(),
            ));
        }
    };

    let live: Vec<ContentRecord> = members
        .into_iter()
        .filter(|r| r.is_live() && cluster.contains(&r.id))
        .collect();
    if live.len() < 2 {
        debug!(seed = %cluster.seed_id, live = live.len(), "cluster already resolved");
        return ClusterOutcome::AlreadyResolved { live: live.len() };
    }

    let Some((keep, to_demote)) = quality_rank::split_canonical(live) else {
        return ClusterOutcome::AlreadyResolved { live: 0 };
    };

    let mut demoted = Vec::new();
    let mut issues = Vec::new();
    for record in &to_demote {
        match demote(record, &keep.id, ctx) {
            Demotion::Removed => demoted.push(record.id.clone()),
            Demotion::Vanished => {}
            Demotion::Failed(issue) => issues.push(issue),
        }
    }

    // A failed demotion leaves its record flagged. Clearing the canonical flag
    // would drop the canonical from the next run's flagged set, and the failed
    // record would never find its partner again.
    if ctx.clear_canonical_flag && issues.is_empty() {
        match ctx.content.clear_duplicate_flag(&keep.id) {
            Ok(true) => {}
            Ok(false) => debug!(record = %keep.id, "canonical record gone before flag clear"),
            Err(e) => {
                warn!(record = %keep.id, error = %e, "failed to clear duplicate flag on canonical record");
                issues.push(RunIssue::new(IssueKind::FlagClearFailed, &keep.id, e.to_string()));
            }
        }
    }

    info!(
        kept = %keep.id,
        demoted = demoted.len(),
        failures = issues.len(),
        "cluster consolidated"
    );

    ClusterOutcome::Consolidated {
        kept: keep.id,
        demoted,
        issues,
    }
}

fn demote(record: &ContentRecord, keep_id: &str, ctx: &ConsolidationContext<'_>) -> Demotion {
    if let Err(reason) = archive_once(record, keep_id, ctx) {
        let err = ConsolidationError::ArchivalWriteFailed {
            record_id: record.id.clone(),
            reason,
        };
        warn!(record = %record.id, error = %err, "archival failed; record stays live");
        return Demotion::Failed(RunIssue::new(
            IssueKind::ArchivalWriteFailed,
            &record.id,
            err.to_string(),
        ));
    }

    match ctx.content.delete_live(&record.id) {
        Ok(true) => Demotion::Removed,
        Ok(false) => {
            debug!(record = %record.id, "record already removed by another run");
            Demotion::Vanished
        }
        Err(e) => {
            let err = ConsolidationError::PrimaryDeleteFailed {
                record_id: record.id.clone(),
                reason: e.to_string(),
            };
            error!(record = %record.id, error = %err, "record is archived and still live");
            Demotion::Failed(RunIssue::new(
                IssueKind::PrimaryDeleteFailed,
                &record.id,
                err.to_string(),
            ))
        }
    }
}

/// Write the archive entry unless one already exists for this record.
fn archive_once(
    record: &ContentRecord,
    keep_id: &str,
    ctx: &ConsolidationContext<'_>,
) -> Result<(), String> {
    if ctx
        .archive
        .exists_by_original_id(&record.id)
        .map_err(|e| e.to_string())?
    {
        debug!(record = %record.id, "archive entry already present");
        return Ok(());
    }
    let entry = ArchivedRecord::from_demoted(record, Some(keep_id), ctx.now);
    // `false` means a concurrent writer archived it first, which is fine.
    ctx.archive.insert(&entry).map(|_| ()).map_err(|e| e.to_string())
}
