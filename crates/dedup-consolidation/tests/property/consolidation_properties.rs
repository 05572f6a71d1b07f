//! Property tests: cluster disjointness and ranking determinism.

use std::collections::HashSet;

use proptest::prelude::*;

use dedup_consolidation::pipeline::phase2_clustering::build_clusters;
use dedup_consolidation::{quality_rank, CancelHandle, OracleBudget, OracleClient};
use dedup_core::config::ClusteringMode;
use dedup_core::models::{ContentRecord, ContentStatus};
use test_fixtures::{record, ScriptedOracle};

fn id(i: usize) -> String {
    format!("r{i:03}")
}

/// Random flagged set plus random links, some pointing outside the set.
fn graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (2usize..30).prop_flat_map(|n| {
        let links = prop::collection::vec((0..n + 5, 0..n + 5, 0.0f64..1.0), 0..80);
        (Just(n), links)
    })
}

fn check_partition(n: usize, links: &[(usize, usize, f64)], mode: ClusteringMode) {
    let oracle = links
        .iter()
        .fold(ScriptedOracle::new(), |o, &(a, b, s)| o.link(&id(a), &id(b), s));
    let flagged: Vec<String> = (0..n).map(id).collect();
    let input: HashSet<&String> = flagged.iter().collect();

    let mut client = OracleClient::new(&oracle, 0.5, OracleBudget::unlimited());
    let outcome = build_clusters(&flagged, &mut client, mode, &CancelHandle::new());

    let mut seen = HashSet::new();
    for cluster in &outcome.clusters {
        assert!(cluster.len() >= 2);
        assert_eq!(cluster.member_ids[0], cluster.seed_id);
        for member in &cluster.member_ids {
            assert!(input.contains(member), "{member} is not flagged");
            assert!(seen.insert(member.clone()), "{member} in two clusters");
        }
    }
    for orphan in &outcome.orphans {
        assert!(!seen.contains(orphan), "{orphan} is both orphan and member");
    }
}

fn status_strategy() -> impl Strategy<Value = ContentStatus> {
    prop_oneof![
        Just(ContentStatus::Draft),
        Just(ContentStatus::Pending),
        Just(ContentStatus::Published),
        Just(ContentStatus::Unknown),
    ]
}

fn records() -> impl Strategy<Value = Vec<ContentRecord>> {
    prop::collection::vec((status_strategy(), 0u64..5, 0u64..5, 0i64..4), 1..12).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (status, views, likes, age))| {
                    record(&id(i))
                        .status(status)
                        .views(views)
                        .likes(likes)
                        .created_days_ago(age)
                        .build()
                })
                .collect()
        },
    )
}

/// A record set plus an arbitrary permutation of it.
fn records_and_permutation() -> impl Strategy<Value = (Vec<ContentRecord>, Vec<ContentRecord>)> {
    records().prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
}

proptest! {
    #[test]
    fn one_hop_clusters_are_disjoint((n, links) in graph()) {
        check_partition(n, &links, ClusteringMode::OneHop);
    }

    #[test]
    fn transitive_clusters_are_disjoint((n, links) in graph()) {
        check_partition(n, &links, ClusteringMode::Transitive);
    }

    #[test]
    fn rank_ignores_input_order((records, shuffled) in records_and_permutation()) {
        let ranked: Vec<String> = quality_rank::rank(records).into_iter().map(|r| r.id).collect();
        let reranked: Vec<String> = quality_rank::rank(shuffled).into_iter().map(|r| r.id).collect();
        prop_assert_eq!(ranked, reranked);
    }

    #[test]
    fn canonical_is_never_outranked(records in records()) {
        let (keep, rest) = quality_rank::split_canonical(records).unwrap();
        for other in &rest {
            prop_assert!(quality_rank::compare(&keep, other).is_lt());
        }
    }
}
