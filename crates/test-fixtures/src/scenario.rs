use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use dedup_core::models::ContentRecord;

use crate::ScriptedOracle;

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Absolute path of a file under `data/`.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load `data/scenarios/<name>.json`.
pub fn load_scenario(name: &str) -> Scenario {
    load_fixture(&format!("scenarios/{name}.json"))
}

/// One oracle answer in a scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioLink {
    pub source: String,
    pub candidate: String,
    pub score: f64,
}

/// Expected end state after one run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioExpectation {
    /// Ids that must still be live.
    pub live: Vec<String>,
    /// Ids that must be archived and gone from the primary store.
    pub archived: Vec<String>,
    pub clusters_found: usize,
    pub records_demoted: usize,
    pub orphans: usize,
}

/// A store snapshot plus scripted oracle answers and the expected outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub records: Vec<ContentRecord>,
    #[serde(default)]
    pub links: Vec<ScenarioLink>,
    #[serde(default)]
    pub expected: ScenarioExpectation,
}

impl Scenario {
    pub fn oracle(&self) -> ScriptedOracle {
        self.links.iter().fold(ScriptedOracle::new(), |oracle, l| {
            oracle.link(&l.source, &l.candidate, l.score)
        })
    }
}
