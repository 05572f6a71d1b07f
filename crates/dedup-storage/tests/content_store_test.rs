//! Content store behavior: flagged-set queries, bulk reads, conditional deletes.

use chrono::{Duration, Utc};
use dedup_core::models::{ContentFilter, ContentRecord, ContentStatus};
use dedup_core::traits::IContentStore;
use dedup_storage::StorageEngine;
use serde_json::json;

fn make_record(id: &str, status: ContentStatus, is_duplicate: bool) -> ContentRecord {
    let mut record = ContentRecord::new(id, status, Utc::now() - Duration::hours(2));
    record.is_duplicate = is_duplicate;
    record.stats.views = 10;
    record.stats.likes = 2;
    record
        .payload
        .insert("title".into(), json!(format!("Title for {id}")));
    record
}

fn seeded() -> StorageEngine {
    let engine = StorageEngine::open_in_memory().unwrap();
    for record in [
        make_record("c", ContentStatus::Published, true),
        make_record("a", ContentStatus::Draft, true),
        make_record("b", ContentStatus::Pending, false),
        make_record("d", ContentStatus::Deleted, true),
    ] {
        IContentStore::insert(&engine, &record).unwrap();
    }
    engine
}

#[test]
fn flagged_filter_returns_live_duplicates_in_id_order() {
    let engine = seeded();
    let flagged = engine.find(&ContentFilter::flagged_duplicates()).unwrap();
    let ids: Vec<&str> = flagged.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn empty_filter_returns_everything() {
    let engine = seeded();
    assert_eq!(engine.find(&ContentFilter::default()).unwrap().len(), 4);
}

#[test]
fn record_round_trips_with_payload() {
    let engine = seeded();
    let record = engine.find_by_id("a").unwrap().unwrap();
    assert_eq!(record.status, ContentStatus::Draft);
    assert!(record.is_duplicate);
    assert_eq!(record.engagement(), 12);
    assert_eq!(record.payload.get("title"), Some(&json!("Title for a")));
}

#[test]
fn bulk_read_skips_missing_ids() {
    let engine = seeded();
    let ids = vec!["a".to_string(), "zzz".to_string(), "c".to_string()];
    let found = engine.find_by_ids(&ids).unwrap();
    let found_ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(found_ids, vec!["a", "c"]);
}

#[test]
fn bulk_read_of_empty_list_is_empty() {
    let engine = seeded();
    assert!(engine.find_by_ids(&[]).unwrap().is_empty());
}

#[test]
fn delete_live_is_conditional() {
    let engine = seeded();
    assert!(engine.delete_live("a").unwrap());
    // Second attempt matches nothing: the row is gone.
    assert!(!engine.delete_live("a").unwrap());
    // Deleted-status rows are never removed by the pipeline's delete.
    assert!(!engine.delete_live("d").unwrap());
    assert!(engine.find_by_id("d").unwrap().is_some());
}

#[test]
fn clear_duplicate_flag_reports_missing_records() {
    let engine = seeded();
    assert!(engine.clear_duplicate_flag("c").unwrap());
    assert!(!engine.find_by_id("c").unwrap().unwrap().is_duplicate);
    assert!(!engine.clear_duplicate_flag("missing").unwrap());
}

#[test]
fn upsert_overwrites_existing_row() {
    let engine = seeded();
    let mut record = engine.find_by_id("b").unwrap().unwrap();
    record.status = ContentStatus::Published;
    record.stats.views = 99;
    engine.upsert(&record).unwrap();
    let stored = engine.find_by_id("b").unwrap().unwrap();
    assert_eq!(stored.status, ContentStatus::Published);
    assert_eq!(stored.stats.views, 99);
    assert_eq!(engine.content_count().unwrap(), 4);
}

#[test]
fn duplicate_insert_is_an_error() {
    let engine = seeded();
    let record = make_record("a", ContentStatus::Draft, true);
    assert!(IContentStore::insert(&engine, &record).is_err());
}
