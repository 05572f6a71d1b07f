use serde::{Deserialize, Serialize};

/// One candidate returned by the similarity oracle for a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityLink {
    pub source_id: String,
    pub candidate_id: String,
    /// Overall similarity in [0, 1].
    pub overall_similarity: f64,
}

impl SimilarityLink {
    pub fn new(
        source_id: impl Into<String>,
        candidate_id: impl Into<String>,
        overall_similarity: f64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            candidate_id: candidate_id.into(),
            overall_similarity,
        }
    }

    pub fn is_self_link(&self) -> bool {
        self.source_id == self.candidate_id
    }

    pub fn has_valid_score(&self) -> bool {
        self.overall_similarity.is_finite() && (0.0..=1.0).contains(&self.overall_similarity)
    }
}
