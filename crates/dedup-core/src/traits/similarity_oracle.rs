use crate::errors::DedupResult;
use crate::models::SimilarityLink;

/// External collaborator that suggests likely duplicates of a record.
///
/// Scores must be deterministic for a fixed data snapshot. Implementations
/// may block on IO and are never retried by the pipeline within a run.
pub trait ISimilarityOracle: Send + Sync {
    fn find_potential_duplicates(&self, id: &str) -> DedupResult<Vec<SimilarityLink>>;

    /// Human-readable oracle name.
    fn name(&self) -> &str;
}
