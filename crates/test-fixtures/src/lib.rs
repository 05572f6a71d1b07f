//! Test support shared across the dedup crates.
//!
//! Builders for content records, a scripted similarity oracle, a store
//! wrapper that injects failures, and loaders for the JSON scenarios under
//! `data/`.

mod builders;
mod faulty_store;
mod scenario;
mod scripted_oracle;

pub use builders::{base_time, record, RecordBuilder};
pub use faulty_store::FaultyStore;
pub use scenario::{
    fixture_path, load_fixture, load_scenario, Scenario, ScenarioExpectation, ScenarioLink,
};
pub use scripted_oracle::ScriptedOracle;

use dedup_core::models::ContentRecord;
use dedup_core::traits::IContentStore;

/// Insert every record into `store`.
///
/// # Panics
/// Panics on the first insert failure.
pub fn seed_store(store: &dyn IContentStore, records: &[ContentRecord]) {
    for r in records {
        store
            .insert(r)
            .unwrap_or_else(|e| panic!("failed to seed {}: {e}", r.id));
    }
}
