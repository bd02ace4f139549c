//! Incremental construction: insert one node and wire it into the graph.
//!
//! The new vector is first located via approximate search from the graph's
//! seed node, then connected to its candidates in ascending distance order
//! under the degree budget. A full candidate gives up its single worst edge,
//! but only when the new edge is strictly better, and never in a way that
//! splits the graph: the evicted edge may be a bridge, so the far endpoint
//! must either still reach the candidate or be re-attached through the new
//! node, else the whole attempt is rolled back.

use crate::config::GraphParams;
use crate::search::best_first_search;
use crate::store::{GraphStore, NodeId};
use crate::Result;
use tracing::{debug, warn};

/// Seed node for insertion searches: the first node ever inserted.
const SEED: NodeId = 0;

/// Insert `vector` as a new node and return its id.
///
/// The first node of a graph gets zero edges; every later node ends with
/// between 1 and `edges_per_node` edges, and the mutual-edge invariant holds
/// throughout.
pub(crate) fn extend(
    store: &mut GraphStore,
    vector: &[f32],
    params: &GraphParams,
) -> Result<NodeId> {
    if store.is_empty() {
        return store.add_node(vector);
    }

    let (candidates, stats) = best_first_search(
        store,
        vector,
        &[SEED],
        params.extend_k,
        params.extend_eps,
    )?;

    let new = store.add_node(vector)?;
    debug!(
        node = new,
        candidates = candidates.len(),
        distance_evals = stats.distance_evals,
        "extend: wiring new node"
    );

    for candidate in &candidates {
        if store.degree(new) >= params.edges_per_node {
            break;
        }
        try_connect(
            store,
            new,
            candidate.id,
            candidate.distance,
            params.max_path_length,
            false,
        );
    }

    // Policy fallback: every candidate was full with no strictly-worse edge
    // to give up. Force the closest legal connection so the node does not
    // enter the graph isolated.
    if store.degree(new) == 0 {
        for candidate in &candidates {
            if try_connect(
                store,
                new,
                candidate.id,
                candidate.distance,
                params.max_path_length,
                true,
            ) {
                break;
            }
        }
    }

    if store.degree(new) == 0 && store.len() > 1 {
        // Unreachable for edges_per_node >= 2; a degree budget of 1 cannot
        // always be satisfied under mutual pairing.
        warn!(node = new, "extend: node left without edges");
    }

    Ok(new)
}

/// Attempt the mutual edge new<->candidate, evicting the candidate's worst
/// edge when it is at capacity.
///
/// Eviction requires the evicted edge to be strictly worse than the new one
/// (unless `force`). The evicted edge may have been the far endpoint's only
/// route to the candidate's component; if the far endpoint can no longer
/// reach the candidate within `max_hops`, the new node adopts it, and when
/// the budget forbids even that, the whole attempt is rolled back.
fn try_connect(
    store: &mut GraphStore,
    new: NodeId,
    candidate: NodeId,
    dist: f32,
    max_hops: usize,
    force: bool,
) -> bool {
    let epn = store.edges_per_node();

    if store.degree(candidate) < epn {
        return store.add_edge(new, candidate, dist).is_ok();
    }

    let Some(worst) = store.worst_edge(candidate) else {
        return false;
    };

    if !force && worst.distance <= dist {
        // Nothing strictly worse to give up: skip the candidate.
        return false;
    }

    store.remove_edge(candidate, worst.id);
    if store.add_edge(new, candidate, dist).is_err() {
        // Roll the eviction back; the new node itself was at capacity.
        let _ = store.add_edge(candidate, worst.id, worst.distance);
        return false;
    }

    if !store.reachable_within(worst.id, candidate, max_hops) {
        // The evicted edge was a bridge (or the far endpoint's last edge).
        // Re-attach the far endpoint through the new node, or undo
        // everything.
        if store.degree(new) < epn && store.degree(worst.id) < epn {
            let d = store.distance_between(new, worst.id);
            if store.add_edge(new, worst.id, d).is_ok() {
                return true;
            }
        }
        store.remove_edge(new, candidate);
        let _ = store.add_edge(candidate, worst.id, worst.distance);
        return false;
    }

    true
}
