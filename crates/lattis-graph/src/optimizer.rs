//! Iterative improvement: randomized local edge swaps.
//!
//! One round picks a random node `u` and a random existing neighbor `v`,
//! then tries to replace the edge (u, v) with an edge to a strictly closer
//! non-neighbor `w` found by search. Tentative changes are staged in an
//! `EdgePatch` overlay; the patch is committed only after verifying, over
//! the patched adjacency, that every endpoint that lost an edge (`v`, and
//! the far endpoint of a cascade eviction at `w`) can still reach the node
//! that kept one within a bounded number of hops. A swap is therefore
//! monotone-or-neutral: it strictly shortens the replaced edge and never
//! disconnects the graph.
//!
//! Running out of candidates or tries is the normal terminal condition of
//! local search, not an error.

use crate::search::best_first_search;
use crate::store::{GraphStore, NodeId};
use crate::Result;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Staged edge mutations, applied to the live store only after verification.
#[derive(Debug, Default)]
struct EdgePatch {
    removed: Vec<(NodeId, NodeId)>,
    added: Vec<(NodeId, NodeId, f32)>,
}

impl EdgePatch {
    fn remove(&mut self, u: NodeId, v: NodeId) {
        self.removed.push((u, v));
    }

    fn add(&mut self, u: NodeId, v: NodeId, dist: f32) {
        self.added.push((u, v, dist));
    }

    fn is_removed(&self, u: NodeId, v: NodeId) -> bool {
        self.removed
            .iter()
            .any(|&(a, b)| (a, b) == (u, v) || (b, a) == (u, v))
    }

    /// Degree of `n` as it would be after applying the patch.
    fn degree(&self, store: &GraphStore, n: NodeId) -> usize {
        let kept = store
            .neighbors(n)
            .iter()
            .filter(|e| !self.is_removed(n, e.id))
            .count();
        let gained = self
            .added
            .iter()
            .filter(|&&(a, b, _)| a == n || b == n)
            .count();
        kept + gained
    }

    /// Visit the patched adjacency of `n`.
    fn for_each_neighbor(&self, store: &GraphStore, n: NodeId, mut f: impl FnMut(NodeId)) {
        for edge in store.neighbors(n) {
            if !self.is_removed(n, edge.id) {
                f(edge.id);
            }
        }
        for &(a, b, _) in &self.added {
            if a == n {
                f(b);
            } else if b == n {
                f(a);
            }
        }
    }

    /// Apply the patch to the live store. Removals first, so additions can
    /// never trip the degree budget the patch itself made room under.
    fn commit(self, store: &mut GraphStore) -> Result<()> {
        for (a, b) in self.removed {
            store.remove_edge(a, b);
        }
        for (a, b, dist) in self.added {
            store.add_edge(a, b, dist)?;
        }
        Ok(())
    }
}

/// Bounded reachability over the patched adjacency: can `from` reach `to`
/// within `max_hops` edges?
fn reachable_within(
    store: &GraphStore,
    patch: &EdgePatch,
    from: NodeId,
    to: NodeId,
    max_hops: usize,
) -> bool {
    if from == to {
        return true;
    }

    let mut seen = vec![false; store.len()];
    seen[from as usize] = true;
    let mut frontier = vec![from];

    for _ in 0..max_hops {
        let mut next = Vec::new();
        let mut found = false;
        for &n in &frontier {
            patch.for_each_neighbor(store, n, |m| {
                if m == to {
                    found = true;
                }
                if !seen[m as usize] {
                    seen[m as usize] = true;
                    next.push(m);
                }
            });
        }
        if found {
            return true;
        }
        if next.is_empty() {
            return false;
        }
        frontier = next;
    }

    false
}

/// One improvement round with randomized (u, v) selection.
///
/// Returns `Ok(true)` if a swap was committed. `Ok(false)` means no valid
/// improving swap was found within the try budget, the normal outcome for a
/// well-optimized graph.
pub(crate) fn improve_round(
    store: &mut GraphStore,
    rng: &mut StdRng,
    k: usize,
    eps: f32,
    max_path_length: usize,
    tries: usize,
) -> Result<bool> {
    if store.len() < 3 {
        return Ok(false);
    }

    let u = rng.gen_range(0..store.len()) as NodeId;
    let degree = store.degree(u);
    if degree == 0 {
        return Ok(false);
    }
    let edge = store.neighbors(u)[rng.gen_range(0..degree)];

    try_swap(store, u, edge.id, edge.distance, k, eps, max_path_length, tries)
}

/// Try to replace the edge (u, v) with a strictly better edge from `u`.
#[allow(clippy::too_many_arguments)]
fn try_swap(
    store: &mut GraphStore,
    u: NodeId,
    v: NodeId,
    dist_uv: f32,
    k: usize,
    eps: f32,
    max_path_length: usize,
    tries: usize,
) -> Result<bool> {
    // Removing (u, v) always costs v an edge; with no spare, no swap on
    // this pair can preserve the degree floor.
    if store.degree(v) <= 1 {
        return Ok(false);
    }

    // One search serves the whole try budget: rejected attempts leave the
    // graph unchanged, so re-searching would return the same list.
    let (candidates, _) = best_first_search(store, store.vector_of(u), &[u], k, eps)?;
    let epn = store.edges_per_node();

    let mut attempts = 0;
    for w in candidates {
        if attempts >= tries {
            break;
        }
        if w.distance >= dist_uv {
            // Candidates are sorted ascending; nothing further improves.
            break;
        }
        if w.id == u || w.id == v || store.has_edge(u, w.id) {
            continue;
        }
        attempts += 1;

        let mut patch = EdgePatch::default();
        patch.remove(u, v);
        patch.add(u, w.id, w.distance);

        let mut evicted_far = None;
        if store.degree(w.id) >= epn {
            // w is at capacity: cascade the builder's eviction rule.
            let Some(worst) = store.worst_edge(w.id) else {
                continue;
            };
            if worst.distance <= w.distance {
                continue;
            }
            patch.remove(w.id, worst.id);
            evicted_far = Some(worst.id);
        }

        // No endpoint that loses an edge may end up edge-less.
        let endpoints_ok = patch.removed.iter().all(|&(a, b)| {
            [a, b]
                .into_iter()
                .all(|n| n == u || patch.degree(store, n) >= 1)
        });
        if !endpoints_ok {
            continue;
        }

        if !reachable_within(store, &patch, v, u, max_path_length) {
            continue;
        }
        // A cascade eviction at w removes a second edge; its far endpoint
        // may have no other route back (the evicted edge can be a bridge).
        if let Some(far) = evicted_far {
            if !reachable_within(store, &patch, far, w.id, max_path_length) {
                continue;
            }
        }

        debug!(
            u,
            v,
            w = w.id,
            old_dist = dist_uv,
            new_dist = w.distance,
            "improve: committing swap"
        );
        patch.commit(store)?;
        return Ok(true);
    }

    Ok(false)
}
