//! Phase 2: Clustering, an oracle-driven partition of the flagged set.
//!
//! `OneHop`: each unvisited seed (ascending id) forms a cluster with its
//! direct qualifying matches. Members are marked visited and never reused,
//! so a later seed cannot pull them into a second cluster.
//!
//! `Transitive`: every flagged id is queried and qualifying links are merged
//! with a union-find, so A~B and B~C land in one cluster even when A and C
//! are not directly similar.
//!
//! In both modes only flagged input ids can become members.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::unionfind::UnionFind;
use tracing::{debug, info, warn};

use dedup_core::config::ClusteringMode;
use dedup_core::errors::OracleError;
use dedup_core::models::{Cluster, IssueKind, RunIssue};

use crate::cancel::CancelHandle;
use crate::oracle::OracleClient;

/// Output of the clustering phase.
#[derive(Debug, Clone, Default)]
pub struct ClusteringOutcome {
    /// Disjoint clusters ordered by seed id.
    pub clusters: Vec<Cluster>,
    /// Seeds that were queried, found no qualifying match, and joined no cluster.
    pub orphans: Vec<String>,
    /// Seeds whose oracle call failed.
    pub skipped: Vec<RunIssue>,
    pub budget_exhausted: bool,
    pub cancelled: bool,
}

impl ClusteringOutcome {
    /// Clusters with at least two members.
    pub fn actionable(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| !c.is_singleton())
    }
}

/// Partition `flagged_ids` into clusters.
pub fn build_clusters(
    flagged_ids: &[String],
    client: &mut OracleClient<'_>,
    mode: ClusteringMode,
    cancel: &CancelHandle,
) -> ClusteringOutcome {
    let input: BTreeSet<&str> = flagged_ids.iter().map(String::as_str).collect();
    let outcome = match mode {
        ClusteringMode::OneHop => one_hop(&input, client, cancel),
        ClusteringMode::Transitive => transitive(&input, client, cancel),
    };
    info!(
        oracle = client.oracle_name(),
        mode = ?mode,
        clusters = outcome.clusters.len(),
        orphans = outcome.orphans.len(),
        skipped = outcome.skipped.len(),
        oracle_calls = client.calls_made(),
        "Phase 2: clustering complete"
    );
    outcome
}

fn one_hop(
    input: &BTreeSet<&str>,
    client: &mut OracleClient<'_>,
    cancel: &CancelHandle,
) -> ClusteringOutcome {
    let mut outcome = ClusteringOutcome::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut examined: Vec<&str> = Vec::new();

    for &seed in input {
        if visited.contains(seed) {
            continue;
        }
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let links = match client.qualifying_links(seed) {
            Ok(links) => links,
            Err(OracleError::BudgetExhausted { calls }) => {
                warn!(calls, "oracle budget exhausted; remaining seeds deferred");
                outcome.budget_exhausted = true;
                break;
            }
            Err(e) => {
                warn!(seed = %seed, error = %e, "oracle unavailable; skipping seed");
                outcome
                    .skipped
                    .push(RunIssue::new(IssueKind::OracleUnavailable, seed, e.to_string()));
                continue;
            }
        };
        examined.push(seed);

        let candidates: Vec<String> = links
            .into_iter()
            .map(|l| l.candidate_id)
            .filter(|c| input.contains(c.as_str()) && !visited.contains(c))
            .collect();

        if candidates.is_empty() {
            debug!(seed = %seed, "no qualifying match");
            continue;
        }

        let cluster = Cluster::new(seed, candidates);
        visited.extend(cluster.member_ids.iter().cloned());
        debug!(seed = %seed, size = cluster.len(), "cluster formed");
        outcome.clusters.push(cluster);
    }

    outcome.orphans = examined
        .into_iter()
        .filter(|id| !visited.contains(*id))
        .map(str::to_string)
        .collect();
    outcome
}

fn transitive(
    input: &BTreeSet<&str>,
    client: &mut OracleClient<'_>,
    cancel: &CancelHandle,
) -> ClusteringOutcome {
    let mut outcome = ClusteringOutcome::default();
    let ids: Vec<&str> = input.iter().copied().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut sets: UnionFind<usize> = UnionFind::new(ids.len());
    let mut linked = vec![false; ids.len()];
    let mut examined = vec![false; ids.len()];

    for (i, &seed) in ids.iter().enumerate() {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let links = match client.qualifying_links(seed) {
            Ok(links) => links,
            Err(OracleError::BudgetExhausted { calls }) => {
                warn!(calls, "oracle budget exhausted; remaining seeds deferred");
                outcome.budget_exhausted = true;
                break;
            }
            Err(e) => {
                warn!(seed = %seed, error = %e, "oracle unavailable; skipping seed");
                outcome
                    .skipped
                    .push(RunIssue::new(IssueKind::OracleUnavailable, seed, e.to_string()));
                continue;
            }
        };
        examined[i] = true;

        for link in links {
            if let Some(&j) = index.get(link.candidate_id.as_str()) {
                sets.union(i, j);
                linked[i] = true;
                linked[j] = true;
            }
        }
    }

    // Ids are sorted, so each component's members come out ascending and the
    // first member is the smallest id.
    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in (0..ids.len()).filter(|&i| linked[i]) {
        components.entry(sets.find(i)).or_default().push(i);
    }

    let mut clusters: Vec<Cluster> = components
        .into_values()
        .map(|members| {
            let seed = ids[members[0]];
            Cluster::new(seed, members[1..].iter().map(|&m| ids[m]))
        })
        .collect();
    clusters.sort_by(|a, b| a.seed_id.cmp(&b.seed_id));

    outcome.clusters = clusters;
    outcome.orphans = (0..ids.len())
        .filter(|&i| examined[i] && !linked[i])
        .map(|i| ids[i].to_string())
        .collect();
    outcome
}
