//! Property tests for cluster construction and summary bookkeeping.

use std::collections::HashSet;

use chrono::Utc;
use proptest::prelude::*;

use dedup_core::models::{Cluster, IssueKind, RunIssue, RunSummary};

fn issue_kind() -> impl Strategy<Value = IssueKind> {
    prop_oneof![
        Just(IssueKind::OracleUnavailable),
        Just(IssueKind::ArchivalWriteFailed),
        Just(IssueKind::PrimaryDeleteFailed),
        Just(IssueKind::FlagClearFailed),
        Just(IssueKind::FetchFailed),
        Just(IssueKind::ReconcileFailed),
    ]
}

proptest! {
    #[test]
    fn cluster_members_are_unique_and_seed_first(
        seed in "[a-e]",
        candidates in prop::collection::vec("[a-e]", 0..12),
    ) {
        let cluster = Cluster::new(seed.clone(), candidates.clone());
        prop_assert_eq!(&cluster.member_ids[0], &seed);

        let unique: HashSet<&String> = cluster.member_ids.iter().collect();
        prop_assert_eq!(unique.len(), cluster.len());

        for c in &candidates {
            prop_assert!(cluster.contains(c));
        }
    }

    #[test]
    fn errors_count_only_error_kinds(kinds in prop::collection::vec(issue_kind(), 0..30)) {
        let mut summary = RunSummary::begin(Utc::now());
        for (i, kind) in kinds.iter().enumerate() {
            summary.record_issue(RunIssue::new(*kind, format!("r{i}"), "boom"));
        }
        let expected = kinds.iter().filter(|k| k.counts_as_error()).count();
        prop_assert_eq!(summary.errors, expected);
        prop_assert_eq!(summary.issues.len(), kinds.len());
    }
}
