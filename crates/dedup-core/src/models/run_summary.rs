use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a non-fatal problem hit during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Oracle failed for a seed; the seed was skipped.
    OracleUnavailable,
    /// Archive insert failed; the record stays live.
    ArchivalWriteFailed,
    /// Archive insert succeeded but the primary delete did not.
    PrimaryDeleteFailed,
    /// The canonical record's duplicate flag could not be cleared.
    FlagClearFailed,
    /// A cluster's members could not be re-read.
    FetchFailed,
    /// The pre-run sweep could not resolve an archived-but-live record.
    ReconcileFailed,
}

impl IssueKind {
    /// Whether this issue counts toward `RunSummary::errors`.
    pub fn counts_as_error(self) -> bool {
        matches!(
            self,
            Self::ArchivalWriteFailed
                | Self::PrimaryDeleteFailed
                | Self::FetchFailed
                | Self::ReconcileFailed
        )
    }
}

/// A single non-fatal problem, attributed to the record or seed it hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunIssue {
    pub kind: IssueKind,
    pub record_id: String,
    pub message: String,
}

impl RunIssue {
    pub fn new(kind: IssueKind, record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            record_id: record_id.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one pipeline run, handed back to the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Flagged, non-deleted records seen at the start of the run.
    pub flagged_count: usize,
    /// Clusters with at least two members.
    pub clusters_found: usize,
    pub records_demoted: usize,
    /// Seeds skipped because the oracle failed, plus clusters that could not be re-read.
    pub clusters_skipped: usize,
    /// Flagged seeds with no qualifying match this run.
    pub orphans: usize,
    /// Archived-but-live records removed by the pre-run sweep.
    pub reconciled: usize,
    pub errors: usize,
    pub issues: Vec<RunIssue>,
    pub cancelled: bool,
    pub budget_exhausted: bool,
    /// Set when the run was gated off and did no work.
    pub skipped_reason: Option<String>,
}

impl RunSummary {
    pub fn begin(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at,
            finished_at: None,
            flagged_count: 0,
            clusters_found: 0,
            records_demoted: 0,
            clusters_skipped: 0,
            orphans: 0,
            reconciled: 0,
            errors: 0,
            issues: Vec::new(),
            cancelled: false,
            budget_exhausted: false,
            skipped_reason: None,
        }
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = Some(finished_at);
    }

    pub fn record_issue(&mut self, issue: RunIssue) {
        if issue.kind.counts_as_error() {
            self.errors += 1;
        }
        self.issues.push(issue);
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &RunIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// True when the run examined every flagged record it was given: not
    /// gated off, not cancelled, not cut short by the oracle budget.
    pub fn covered_flagged_set(&self) -> bool {
        self.skipped_reason.is_none() && !self.cancelled && !self.budget_exhausted
    }

    /// True when the run completed without cancellation, budget cut-off, or errors.
    pub fn is_clean(&self) -> bool {
        !self.cancelled && !self.budget_exhausted && self.errors == 0
    }
}
