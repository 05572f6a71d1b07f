//! Cluster execution and end-to-end scenarios over the SQLite store.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use dedup_consolidation::pipeline::phase3_consolidation::{
    consolidate_cluster, ClusterOutcome, ConsolidationContext,
};
use dedup_consolidation::DedupEngine;
use dedup_core::config::ConsolidationConfig;
use dedup_core::models::{Cluster, ContentRecord};
use dedup_core::traits::{IArchiveStore, IContentStore, ISimilarityOracle};
use dedup_storage::StorageEngine;
use test_fixtures::{load_scenario, record, seed_store, ScriptedOracle};

fn store_with(records: &[ContentRecord]) -> Arc<StorageEngine> {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    seed_store(storage.as_ref(), records);
    storage
}

fn ctx(storage: &StorageEngine) -> ConsolidationContext<'_> {
    ConsolidationContext {
        content: storage,
        archive: storage,
        clear_canonical_flag: true,
        now: Utc::now(),
    }
}

fn is_live(storage: &StorageEngine, id: &str) -> bool {
    storage.find_by_id(id).unwrap().is_some()
}

#[test]
fn published_record_beats_draft() {
    let storage = store_with(&[
        record("x").draft().flagged().build(),
        record("y").published().views(5).flagged().build(),
    ]);

    let outcome = consolidate_cluster(&Cluster::new("x", ["y"]), &ctx(&storage));

    assert_eq!(
        outcome,
        ClusterOutcome::Consolidated {
            kept: "y".into(),
            demoted: vec!["x".into()],
            issues: vec![],
        }
    );
    assert!(!is_live(&storage, "x"));
    assert!(is_live(&storage, "y"));

    let archived = storage.get_by_original_id("x").unwrap().unwrap();
    assert_eq!(archived.superseded_by.as_deref(), Some("y"));
    assert!(archived.record.is_duplicate);
}

#[test]
fn canonical_flag_is_cleared() {
    let storage = store_with(&[
        record("x").flagged().build(),
        record("y").published().flagged().build(),
    ]);
    consolidate_cluster(&Cluster::new("x", ["y"]), &ctx(&storage));
    assert!(!storage.find_by_id("y").unwrap().unwrap().is_duplicate);
}

#[test]
fn canonical_flag_kept_when_disabled() {
    let storage = store_with(&[
        record("x").flagged().build(),
        record("y").published().flagged().build(),
    ]);
    let ctx = ConsolidationContext {
        clear_canonical_flag: false,
        ..ctx(&storage)
    };
    consolidate_cluster(&Cluster::new("x", ["y"]), &ctx);
    assert!(storage.find_by_id("y").unwrap().unwrap().is_duplicate);
}

#[test]
fn singleton_cluster_is_a_noop() {
    let storage = store_with(&[record("solo").flagged().build()]);
    let outcome = consolidate_cluster(&Cluster::new("solo", Vec::<String>::new()), &ctx(&storage));
    assert_eq!(outcome, ClusterOutcome::Noop);
    assert_eq!(IArchiveStore::count(storage.as_ref()).unwrap(), 0);
    assert!(is_live(&storage, "solo"));
}

#[test]
fn executing_a_cluster_twice_archives_once() {
    let x = record("x").flagged().build();
    let storage = store_with(&[x.clone(), record("y").published().flagged().build()]);
    let cluster = Cluster::new("x", ["y"]);

    assert_eq!(consolidate_cluster(&cluster, &ctx(&storage)).demoted_count(), 1);
    assert_eq!(
        consolidate_cluster(&cluster, &ctx(&storage)),
        ClusterOutcome::AlreadyResolved { live: 1 }
    );

    // Another service restores x; the existing archive entry is reused.
    IContentStore::insert(storage.as_ref(), &x).unwrap();
    assert_eq!(consolidate_cluster(&cluster, &ctx(&storage)).demoted_count(), 1);
    assert_eq!(storage.archive_count_for("x").unwrap(), 1);
    assert!(!is_live(&storage, "x"));
}

#[test]
fn only_the_top_ranked_member_survives() {
    let storage = store_with(&[
        record("m1").pending().views(100).flagged().build(),
        record("m2").published().views(2).created_days_ago(9).flagged().build(),
        record("m3").published().views(2).created_days_ago(1).flagged().build(),
        record("m4").draft().views(1_000).flagged().build(),
    ]);
    let cluster = Cluster::new("m1", ["m2", "m3", "m4"]);

    let outcome = consolidate_cluster(&cluster, &ctx(&storage));

    assert_eq!(outcome.demoted_count(), 3);
    let live: Vec<String> = storage
        .find_by_ids(&cluster.member_ids)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(live, vec!["m3".to_string()]);
}

#[test]
fn vanished_members_are_ignored() {
    let storage = store_with(&[
        record("a").published().flagged().build(),
        record("b").flagged().build(),
        record("c").deleted().flagged().build(),
    ]);

    let outcome = consolidate_cluster(&Cluster::new("a", ["b", "c", "gone"]), &ctx(&storage));

    assert_eq!(
        outcome,
        ClusterOutcome::Consolidated {
            kept: "a".into(),
            demoted: vec!["b".into()],
            issues: vec![],
        }
    );
    assert!(!storage.exists_by_original_id("c").unwrap());
}

#[test]
fn archive_carries_the_full_document() {
    let storage = store_with(&[
        record("x")
            .flagged()
            .field("title", "Five cheap weekend trips")
            .field("tags", json!(["travel", "budget"]))
            .build(),
        record("y").published().flagged().build(),
    ]);
    consolidate_cluster(&Cluster::new("x", ["y"]), &ctx(&storage));

    let archived = storage.get_by_original_id("x").unwrap().unwrap();
    assert_eq!(archived.record.payload["title"], json!("Five cheap weekend trips"));
    assert_eq!(archived.record.payload["tags"], json!(["travel", "budget"]));
}

fn run_scenario(name: &str) {
    let scenario = load_scenario(name);
    let storage = store_with(&scenario.records);
    let oracle: Arc<dyn ISimilarityOracle> = Arc::new(scenario.oracle());
    let engine =
        DedupEngine::from_storage(storage.clone(), oracle, ConsolidationConfig::default()).unwrap();

    let summary = engine.run().unwrap();

    let expected = &scenario.expected;
    assert_eq!(summary.clusters_found, expected.clusters_found, "{}", scenario.name);
    assert_eq!(summary.records_demoted, expected.records_demoted, "{}", scenario.name);
    assert_eq!(summary.orphans, expected.orphans, "{}", scenario.name);
    assert_eq!(summary.errors, 0, "{}", scenario.name);
    for id in &expected.live {
        assert!(is_live(&storage, id), "{}: {id} should be live", scenario.name);
    }
    for id in &expected.archived {
        assert!(!is_live(&storage, id), "{}: {id} should be gone", scenario.name);
        assert!(storage.exists_by_original_id(id).unwrap(), "{}: {id} not archived", scenario.name);
    }
}

#[test]
fn scenario_one_hop_orphan() {
    run_scenario("one_hop_orphan");
}

#[test]
fn scenario_mixed_status_cluster() {
    run_scenario("mixed_status_cluster");
}

#[test]
fn visited_seed_is_never_queried() {
    let storage = store_with(&[
        record("a").published().flagged().build(),
        record("b").flagged().build(),
        record("c").flagged().build(),
    ]);
    let oracle = Arc::new(
        ScriptedOracle::new()
            .link("a", "b", 0.9)
            .link("a", "c", 0.5)
            .link("b", "c", 0.99),
    );
    let engine =
        DedupEngine::from_storage(storage.clone(), oracle.clone(), ConsolidationConfig::default())
            .unwrap();

    let summary = engine.run().unwrap();

    assert_eq!(oracle.calls(), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(summary.clusters_found, 1);
    assert_eq!(summary.records_demoted, 1);
    assert_eq!(summary.orphans, 1);
    assert!(is_live(&storage, "c"));
    assert!(storage.find_by_id("c").unwrap().unwrap().is_duplicate);
}
