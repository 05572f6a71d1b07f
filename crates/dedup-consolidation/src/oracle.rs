//! Similarity oracle client: threshold filtering, input hygiene, and a
//! per-run call budget over an external `ISimilarityOracle`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::warn;

use dedup_core::errors::{DedupError, OracleError};
use dedup_core::models::SimilarityLink;
use dedup_core::traits::ISimilarityOracle;
use dedup_observability::dedup_oracle_span;

/// Limits on oracle usage for a single run.
#[derive(Debug, Clone)]
pub struct OracleBudget {
    max_calls: Option<usize>,
    deadline: Option<Instant>,
    calls: usize,
}

impl OracleBudget {
    pub fn unlimited() -> Self {
        Self {
            max_calls: None,
            deadline: None,
            calls: 0,
        }
    }

    /// `max_calls == 0` and `max_duration == None` mean unlimited.
    pub fn new(max_calls: usize, max_duration: Option<Duration>) -> Self {
        Self {
            max_calls: (max_calls > 0).then_some(max_calls),
            deadline: max_duration.map(|d| Instant::now() + d),
            calls: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    fn check(&self) -> Result<(), OracleError> {
        let over_calls = self.max_calls.is_some_and(|max| self.calls >= max);
        let over_time = self.deadline.is_some_and(|d| Instant::now() >= d);
        if over_calls || over_time {
            return Err(OracleError::BudgetExhausted { calls: self.calls });
        }
        Ok(())
    }
}

/// Thin adapter that turns raw oracle output into qualifying links.
pub struct OracleClient<'a> {
    oracle: &'a dyn ISimilarityOracle,
    threshold: f64,
    budget: OracleBudget,
}

impl<'a> OracleClient<'a> {
    pub fn new(oracle: &'a dyn ISimilarityOracle, threshold: f64, budget: OracleBudget) -> Self {
        Self {
            oracle,
            threshold,
            budget,
        }
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    pub fn calls_made(&self) -> usize {
        self.budget.calls()
    }

    /// Links for `id` scoring strictly above the threshold.
    ///
    /// Self-links and out-of-range scores are dropped. A candidate reported
    /// more than once keeps its best score. Output is sorted by score
    /// descending, then candidate id. Failures are not retried.
    pub fn qualifying_links(&mut self, id: &str) -> Result<Vec<SimilarityLink>, OracleError> {
        self.budget.check()?;
        self.budget.calls += 1;

        let raw = {
            let span = dedup_oracle_span!(self.oracle.name(), id);
            let _entered = span.enter();
            self.oracle
                .find_potential_duplicates(id)
                .map_err(|e| into_oracle_error(id, e))?
        };

        let mut best: HashMap<String, f64> = HashMap::new();
        for link in raw {
            if link.candidate_id == id {
                continue;
            }
            if !link.has_valid_score() {
                let err = OracleError::InvalidScore {
                    candidate_id: link.candidate_id.clone(),
                    score: link.overall_similarity,
                };
                warn!(record = %id, error = %err, "dropping oracle link");
                continue;
            }
            if link.overall_similarity <= self.threshold {
                continue;
            }
            let entry = best.entry(link.candidate_id).or_insert(link.overall_similarity);
            if link.overall_similarity > *entry {
                *entry = link.overall_similarity;
            }
        }

        let mut links: Vec<SimilarityLink> = best
            .into_iter()
            .map(|(candidate, score)| SimilarityLink::new(id, candidate, score))
            .collect();
        links.sort_by(|a, b| {
            b.overall_similarity
                .total_cmp(&a.overall_similarity)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
        Ok(links)
    }
}

fn into_oracle_error(id: &str, err: DedupError) -> OracleError {
    match err {
        DedupError::OracleError(e) => e,
        other => OracleError::Unavailable {
            record_id: id.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedup_core::errors::DedupResult;

    struct FixedOracle(Vec<SimilarityLink>);

    impl ISimilarityOracle for FixedOracle {
        fn find_potential_duplicates(&self, _id: &str) -> DedupResult<Vec<SimilarityLink>> {
            Ok(self.0.clone())
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct DownOracle;

    impl ISimilarityOracle for DownOracle {
        fn find_potential_duplicates(&self, id: &str) -> DedupResult<Vec<SimilarityLink>> {
            Err(OracleError::Unavailable {
                record_id: id.to_string(),
                reason: "connection reset".to_string(),
            }
            .into())
        }
        fn name(&self) -> &str {
            "down"
        }
    }

    #[test]
    fn threshold_is_strict() {
        let oracle = FixedOracle(vec![
            SimilarityLink::new("a", "b", 0.8),
            SimilarityLink::new("a", "c", 0.81),
        ]);
        let mut client = OracleClient::new(&oracle, 0.8, OracleBudget::unlimited());
        assert_eq!(client.oracle_name(), "fixed");
        let links = client.qualifying_links("a").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].candidate_id, "c");
    }

    #[test]
    fn drops_self_links_bad_scores_and_repeats() {
        let oracle = FixedOracle(vec![
            SimilarityLink::new("a", "a", 1.0),
            SimilarityLink::new("a", "b", f64::NAN),
            SimilarityLink::new("a", "c", 1.7),
            SimilarityLink::new("a", "d", 0.85),
            SimilarityLink::new("a", "d", 0.95),
            SimilarityLink::new("a", "e", 0.95),
        ]);
        let mut client = OracleClient::new(&oracle, 0.8, OracleBudget::unlimited());
        let links = client.qualifying_links("a").unwrap();
        let got: Vec<(&str, f64)> = links
            .iter()
            .map(|l| (l.candidate_id.as_str(), l.overall_similarity))
            .collect();
        assert_eq!(got, vec![("d", 0.95), ("e", 0.95)]);
    }

    #[test]
    fn budget_stops_calls() {
        let oracle = FixedOracle(vec![]);
        let mut client = OracleClient::new(&oracle, 0.8, OracleBudget::new(2, None));
        assert!(client.qualifying_links("a").is_ok());
        assert!(client.qualifying_links("b").is_ok());
        assert!(matches!(
            client.qualifying_links("c"),
            Err(OracleError::BudgetExhausted { calls: 2 })
        ));
        assert_eq!(client.calls_made(), 2);
    }

    #[test]
    fn zero_duration_budget_is_already_spent() {
        let oracle = FixedOracle(vec![]);
        let mut client = OracleClient::new(
            &oracle,
            0.8,
            OracleBudget::new(0, Some(Duration::from_secs(0))),
        );
        assert!(matches!(
            client.qualifying_links("a"),
            Err(OracleError::BudgetExhausted { .. })
        ));
    }

    #[test]
    fn oracle_failures_surface_as_unavailable() {
        let oracle = DownOracle;
        let mut client = OracleClient::new(&oracle, 0.8, OracleBudget::unlimited());
        match client.qualifying_links("a") {
            Err(OracleError::Unavailable { record_id, reason }) => {
                assert_eq!(record_id, "a");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
