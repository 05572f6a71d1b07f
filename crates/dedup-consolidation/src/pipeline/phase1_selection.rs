//! Phase 1: Selection. Read the flagged set, then sweep records that were
//! archived by an earlier run but never left the primary store.

use tracing::{debug, error, info};

use dedup_core::errors::DedupResult;
use dedup_core::models::{ContentFilter, ContentRecord, IssueKind, RunIssue};
use dedup_core::traits::{IArchiveStore, IContentStore};

/// Flagged, non-deleted records in ascending id order.
///
/// A failure here is a hard infrastructure fault: the caller propagates it
/// and the run does no work.
pub fn select_flagged(content: &dyn IContentStore) -> DedupResult<Vec<ContentRecord>> {
    let mut flagged = content.find(&ContentFilter::flagged_duplicates())?;
    flagged.retain(|r| r.is_duplicate && r.is_live());
    flagged.sort_by(|a, b| a.id.cmp(&b.id));
    flagged.dedup_by(|a, b| a.id == b.id);
    Ok(flagged)
}

/// Result of the reconciliation sweep.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Ids still eligible for clustering, ascending.
    pub remaining_ids: Vec<String>,
    /// Archived-but-live records removed from the primary store.
    pub reconciled: Vec<String>,
    pub issues: Vec<RunIssue>,
}

/// Remove flagged records that already have an archive entry.
///
/// Such a record is left over from a run whose primary delete failed after
/// archival succeeded. It is excluded from clustering whatever the outcome,
/// so it can never be archived twice.
pub fn reconcile_archived_live(
    flagged_ids: Vec<String>,
    content: &dyn IContentStore,
    archive: &dyn IArchiveStore,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for id in flagged_ids {
        let archived = match archive.exists_by_original_id(&id) {
            Ok(archived) => archived,
            Err(e) => {
                outcome.issues.push(RunIssue::new(
                    IssueKind::ReconcileFailed,
                    &id,
                    format!("archive lookup failed: {e}"),
                ));
                continue;
            }
        };

        if !archived {
            outcome.remaining_ids.push(id);
            continue;
        }

        match content.delete_live(&id) {
            Ok(true) => {
                info!(record = %id, "reconciled archived-but-live record");
                outcome.reconciled.push(id);
            }
            Ok(false) => debug!(record = %id, "archived record already gone"),
            Err(e) => {
                error!(record = %id, error = %e, "reconciliation delete failed; record remains archived and live");
                outcome.issues.push(RunIssue::new(
                    IssueKind::ReconcileFailed,
                    &id,
                    e.to_string(),
                ));
            }
        }
    }

    outcome
}
