//! Property tests for bulk reads and conditional deletes.

use std::collections::BTreeSet;

use chrono::Utc;
use proptest::prelude::*;

use dedup_core::models::{ContentRecord, ContentStatus};
use dedup_core::traits::IContentStore;
use dedup_storage::StorageEngine;

fn id(i: u16) -> String {
    format!("rec-{i:04}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn bulk_read_returns_exactly_the_stored_subset(
        stored in prop::collection::btree_set(0u16..1200, 0..700),
        requested in prop::collection::vec(0u16..1200, 0..900),
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        for &i in &stored {
            let record = ContentRecord::new(id(i), ContentStatus::Published, Utc::now());
            IContentStore::insert(&engine, &record).unwrap();
        }

        let wanted: BTreeSet<u16> = requested.iter().copied().collect();
        let ids: Vec<String> = wanted.iter().map(|&i| id(i)).collect();
        let got: BTreeSet<String> = engine.find_by_ids(&ids).unwrap().into_iter().map(|r| r.id).collect();
        let expected: BTreeSet<String> = wanted.intersection(&stored).map(|&i| id(i)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn delete_live_succeeds_at_most_once(statuses in prop::collection::vec(any::<bool>(), 1..20)) {
        let engine = StorageEngine::open_in_memory().unwrap();
        for (i, &live) in statuses.iter().enumerate() {
            let status = if live { ContentStatus::Draft } else { ContentStatus::Deleted };
            IContentStore::insert(&engine, &ContentRecord::new(id(i as u16), status, Utc::now())).unwrap();
        }
        for (i, &live) in statuses.iter().enumerate() {
            prop_assert_eq!(engine.delete_live(&id(i as u16)).unwrap(), live);
            prop_assert!(!engine.delete_live(&id(i as u16)).unwrap());
        }
    }
}
