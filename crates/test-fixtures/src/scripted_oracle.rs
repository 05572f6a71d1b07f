use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use dedup_core::errors::{DedupResult, OracleError};
use dedup_core::models::SimilarityLink;
use dedup_core::traits::ISimilarityOracle;

type Hook = Box<dyn Fn(&str) + Send + Sync>;

/// Oracle answering from a fixed script and logging every call.
#[derive(Default)]
pub struct ScriptedOracle {
    links: HashMap<String, Vec<(String, f64)>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
    on_call: Option<Hook>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// `source` reports `candidate` with `score`.
    pub fn link(mut self, source: &str, candidate: &str, score: f64) -> Self {
        self.links
            .entry(source.to_string())
            .or_default()
            .push((candidate.to_string(), score));
        self
    }

    /// Both ids report each other.
    pub fn symmetric(self, a: &str, b: &str, score: f64) -> Self {
        self.link(a, b, score).link(b, a, score)
    }

    /// Calls for `id` fail with `OracleError::Unavailable`.
    pub fn fail_for(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    /// Run `hook` at the start of every call, e.g. to cancel mid-run.
    pub fn on_call(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    /// Ids queried so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn was_called_for(&self, id: &str) -> bool {
        self.calls().iter().any(|c| c == id)
    }
}

impl ISimilarityOracle for ScriptedOracle {
    fn find_potential_duplicates(&self, id: &str) -> DedupResult<Vec<SimilarityLink>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(id.to_string());
        if let Some(hook) = &self.on_call {
            hook(id);
        }
        if self.failing.contains(id) {
            return Err(OracleError::Unavailable {
                record_id: id.to_string(),
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        Ok(self
            .links
            .get(id)
            .map(|links| {
                links
                    .iter()
                    .map(|(candidate, score)| SimilarityLink::new(id, candidate.as_str(), *score))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
