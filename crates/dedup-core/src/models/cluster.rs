use serde::{Deserialize, Serialize};

/// A set of record ids believed to express one underlying idea.
///
/// `member_ids` always starts with the seed and never repeats an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub seed_id: String,
    pub member_ids: Vec<String>,
}

impl Cluster {
    /// Build a cluster from a seed and its candidates. Repeats and the seed
    /// itself are dropped from `candidates`, first occurrence wins.
    pub fn new<I, S>(seed_id: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seed_id = seed_id.into();
        let mut member_ids = vec![seed_id.clone()];
        for candidate in candidates {
            let candidate = candidate.into();
            if !member_ids.contains(&candidate) {
                member_ids.push(candidate);
            }
        }
        Self {
            seed_id,
            member_ids,
        }
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    /// Singletons are valid but carry no consolidation work.
    pub fn is_singleton(&self) -> bool {
        self.member_ids.len() < 2
    }

    pub fn contains(&self, id: &str) -> bool {
        self.member_ids.iter().any(|m| m == id)
    }
}
