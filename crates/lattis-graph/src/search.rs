//! Best-first approximate search over the graph.
//!
//! The traversal keeps two bounded queues: a min-heap **frontier** of
//! candidates still to visit, ordered by distance to the query, and a
//! max-heap **result** queue holding the k best confirmed candidates. Both
//! are seeded from the entry points. The closest frontier entry is popped,
//! its unvisited neighbors are scored, and discoveries feed both queues.
//!
//! Termination: the frontier runs dry, or its closest entry is farther than
//! the current k-th best result by more than the `eps` bound. `eps = 0`
//! stops at the first local optimum; larger values keep exploring before
//! committing, trading work for recall. The slack is relative to the
//! magnitude of the k-th best score, so it widens with `eps` for the
//! negative scores the inner-product metric produces as well.
//!
//! All state is local to the call: repeated searches against an unchanged
//! graph return identical results, and read-only concurrent callers need no
//! coordination.

use crate::store::{GraphStore, NodeId};
use crate::visited::VisitedSet;
use crate::{GraphError, Result};
use lattis_vector::Neighbor;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Work counters reported alongside search results.
///
/// Timing is deliberately absent: measurement belongs to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of metric evaluations performed.
    pub distance_evals: usize,
    /// Number of frontier candidates expanded.
    pub nodes_expanded: usize,
}

/// Queue entry: distance to query plus an insertion sequence number.
///
/// The sequence number breaks distance ties by insertion order, keeping
/// traversal deterministic for a fixed graph and entry points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    distance: f32,
    seq: u64,
    id: NodeId,
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Exploration cutoff for a given k-th best score.
///
/// `worst * (1.0 + eps)` would tighten, not widen, for negative scores
/// (inner-product distances are negated dot products), so the slack is
/// taken on the magnitude.
#[inline]
fn explore_bound(worst: f32, eps: f32) -> f32 {
    worst + eps * worst.abs()
}

/// Best-first search for the `k` nearest candidates to `query`.
///
/// Fails with `InvalidEntryPoint` if `entry_points` is empty or names an
/// unknown node; there is no silent fallback.
pub(crate) fn best_first_search(
    store: &GraphStore,
    query: &[f32],
    entry_points: &[NodeId],
    k: usize,
    eps: f32,
) -> Result<(Vec<Neighbor>, SearchStats)> {
    if entry_points.is_empty() {
        return Err(GraphError::InvalidEntryPoint(
            "no entry points supplied".to_string(),
        ));
    }
    for &ep in entry_points {
        if !store.contains(ep) {
            return Err(GraphError::InvalidEntryPoint(format!(
                "unknown node id {}",
                ep
            )));
        }
    }

    let mut stats = SearchStats::default();
    if k == 0 {
        return Ok((Vec::new(), stats));
    }

    let metric = store.distance_function();
    let mut visited = VisitedSet::new(store.len());
    let mut frontier: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    let mut results: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
    let mut seq = 0u64;

    for &ep in entry_points {
        if !visited.insert(ep) {
            continue;
        }
        let distance = metric.distance(query, store.vector_of(ep));
        stats.distance_evals += 1;
        let candidate = Candidate {
            distance,
            seq,
            id: ep,
        };
        seq += 1;
        frontier.push(Reverse(candidate));
        results.push(candidate);
        if results.len() > k {
            results.pop();
        }
    }

    while let Some(Reverse(current)) = frontier.pop() {
        if results.len() >= k {
            // Safe to peek: k >= 1 and results is non-empty here.
            let worst = results
                .peek()
                .map(|c| c.distance)
                .unwrap_or(f32::INFINITY);
            if current.distance > explore_bound(worst, eps) {
                break;
            }
        }
        stats.nodes_expanded += 1;

        for edge in store.neighbors(current.id) {
            if !visited.insert(edge.id) {
                continue;
            }

            let distance = metric.distance(query, store.vector_of(edge.id));
            stats.distance_evals += 1;

            let worst = results.peek().map(|c| c.distance).unwrap_or(f32::INFINITY);
            let admit = results.len() < k || distance <= explore_bound(worst, eps);
            if !admit {
                continue;
            }

            let candidate = Candidate {
                distance,
                seq,
                id: edge.id,
            };
            seq += 1;
            frontier.push(Reverse(candidate));

            if results.len() < k || distance < worst {
                results.push(candidate);
                if results.len() > k {
                    results.pop();
                }
            }
        }
    }

    let mut sorted: Vec<Candidate> = results.into_iter().collect();
    sorted.sort();
    let neighbors = sorted
        .into_iter()
        .map(|c| Neighbor::new(c.id, c.distance))
        .collect();

    Ok((neighbors, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattis_vector::DistanceFunction;

    /// Line graph 0-1-2-...-(n-1) at x = 0, 1, 2, ...
    fn line_store(n: usize) -> GraphStore {
        let mut store = GraphStore::new(2, DistanceFunction::Euclidean, 4, None);
        for i in 0..n {
            store.add_node(&[i as f32, 0.0]).unwrap();
        }
        for i in 1..n {
            let u = (i - 1) as NodeId;
            let v = i as NodeId;
            store.add_edge(u, v, store.distance_between(u, v)).unwrap();
        }
        store
    }

    #[test]
    fn test_empty_entry_points_rejected() {
        let store = line_store(3);
        let err = best_first_search(&store, &[0.0, 0.0], &[], 2, 0.1).unwrap_err();
        assert!(matches!(err, GraphError::InvalidEntryPoint(_)));
    }

    #[test]
    fn test_unknown_entry_point_rejected() {
        let store = line_store(3);
        let err = best_first_search(&store, &[0.0, 0.0], &[99], 2, 0.1).unwrap_err();
        assert!(matches!(err, GraphError::InvalidEntryPoint(_)));
    }

    #[test]
    fn test_finds_nearest_across_graph() {
        let store = line_store(10);
        // Query near node 7, entry at node 0: must walk the line.
        let (results, _) = best_first_search(&store, &[7.2, 0.0], &[0], 3, 0.5).unwrap();
        assert_eq!(results[0].id, 7);
        let ids: Vec<NodeId> = results.iter().map(|n| n.id).collect();
        assert!(ids.contains(&6) || ids.contains(&8));
    }

    #[test]
    fn test_results_sorted_ascending() {
        let store = line_store(10);
        let (results, _) = best_first_search(&store, &[4.5, 0.0], &[0], 5, 1.0).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_k_zero_returns_empty() {
        let store = line_store(5);
        let (results, stats) = best_first_search(&store, &[1.0, 0.0], &[0], 0, 0.1).unwrap();
        assert!(results.is_empty());
        assert_eq!(stats.distance_evals, 0);
    }

    #[test]
    fn test_deterministic_repeat() {
        let store = line_store(20);
        let a = best_first_search(&store, &[13.3, 0.0], &[0], 5, 0.2).unwrap();
        let b = best_first_search(&store, &[13.3, 0.0], &[0], 5, 0.2).unwrap();
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn test_eps_widens_exploration() {
        let store = line_store(50);
        let (_, narrow) = best_first_search(&store, &[25.0, 0.0], &[0], 3, 0.0).unwrap();
        let (_, wide) = best_first_search(&store, &[25.0, 0.0], &[0], 3, 1.0).unwrap();
        assert!(wide.distance_evals >= narrow.distance_evals);
    }

    #[test]
    fn test_eps_widens_exploration_for_negative_scores() {
        // Inner-product distances are negative. Chain 0-1-2 where node 1
        // scores worse than the entry but node 2 is the global best; only a
        // widened bound lets the search climb over the hill at node 1.
        let mut store = GraphStore::new(2, DistanceFunction::InnerProduct, 4, None);
        store.add_node(&[10.0, 0.0]).unwrap(); // score -10
        store.add_node(&[5.0, 0.0]).unwrap(); // score -5
        store.add_node(&[20.0, 0.0]).unwrap(); // score -20
        store.add_edge(0, 1, store.distance_between(0, 1)).unwrap();
        store.add_edge(1, 2, store.distance_between(1, 2)).unwrap();

        let query = [1.0, 0.0];
        let (narrow, narrow_stats) = best_first_search(&store, &query, &[0], 1, 0.0).unwrap();
        let (wide, wide_stats) = best_first_search(&store, &query, &[0], 1, 1.0).unwrap();

        assert_eq!(narrow[0].id, 0);
        assert_eq!(wide[0].id, 2, "wide eps must reach past the hill");
        assert!(wide_stats.distance_evals > narrow_stats.distance_evals);
    }

    #[test]
    fn test_single_node_graph() {
        let mut store = GraphStore::new(2, DistanceFunction::Euclidean, 4, None);
        store.add_node(&[1.0, 1.0]).unwrap();
        let (results, _) = best_first_search(&store, &[0.0, 0.0], &[0], 5, 0.1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 0);
    }

    #[test]
    fn test_duplicate_entry_points_scored_once() {
        let store = line_store(5);
        let (results, stats) = best_first_search(&store, &[0.0, 0.0], &[0, 0, 0], 2, 0.1).unwrap();
        assert_eq!(results[0].id, 0);
        // Entry scored once, not three times.
        assert!(stats.distance_evals <= store.len());
    }
}
