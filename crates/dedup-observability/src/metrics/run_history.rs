use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dedup_core::constants::DEFAULT_RUN_HISTORY_LEN;
use dedup_core::models::RunSummary;

/// Cumulative counters across every recorded run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub runs: u64,
    pub clusters_found: u64,
    pub records_demoted: u64,
    pub clusters_skipped: u64,
    pub errors: u64,
    pub cancelled_runs: u64,
}

/// Bounded history of run summaries plus lifetime totals.
#[derive(Debug, Clone)]
pub struct RunHistory {
    capacity: usize,
    runs: VecDeque<RunSummary>,
    totals: RunTotals,
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_HISTORY_LEN)
    }
}

impl RunHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            runs: VecDeque::new(),
            totals: RunTotals::default(),
        }
    }

    /// Record a finished run, evicting the oldest when full.
    pub fn record(&mut self, summary: RunSummary) {
        self.totals.runs += 1;
        self.totals.clusters_found += summary.clusters_found as u64;
        self.totals.records_demoted += summary.records_demoted as u64;
        self.totals.clusters_skipped += summary.clusters_skipped as u64;
        self.totals.errors += summary.errors as u64;
        if summary.cancelled {
            self.totals.cancelled_runs += 1;
        }

        if self.runs.len() == self.capacity {
            self.runs.pop_front();
        }
        self.runs.push_back(summary);
    }

    pub fn latest(&self) -> Option<&RunSummary> {
        self.runs.back()
    }

    pub fn runs(&self) -> impl Iterator<Item = &RunSummary> {
        self.runs.iter()
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Emit one structured event describing a finished run.
pub fn log_summary(summary: &RunSummary) {
    if let Some(reason) = &summary.skipped_reason {
        info!(run_id = %summary.run_id, reason = %reason, "dedup run skipped");
        return;
    }

    let duration_ms = summary
        .finished_at
        .map(|end| (end - summary.started_at).num_milliseconds())
        .unwrap_or_default();

    if summary.errors > 0 {
        warn!(
            run_id = %summary.run_id,
            flagged = summary.flagged_count,
            clusters = summary.clusters_found,
            demoted = summary.records_demoted,
            skipped = summary.clusters_skipped,
            orphans = summary.orphans,
            reconciled = summary.reconciled,
            errors = summary.errors,
            cancelled = summary.cancelled,
            duration_ms,
            "dedup run finished with errors"
        );
    } else {
        info!(
            run_id = %summary.run_id,
            flagged = summary.flagged_count,
            clusters = summary.clusters_found,
            demoted = summary.records_demoted,
            skipped = summary.clusters_skipped,
            orphans = summary.orphans,
            reconciled = summary.reconciled,
            cancelled = summary.cancelled,
            duration_ms,
            "dedup run finished"
        );
    }
}
