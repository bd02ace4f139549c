//! Graph storage: an arena-owned adjacency table.
//!
//! Nodes are identified by dense u32 ids assigned at insertion. Each node
//! owns its feature vector and a small edge list kept sorted ascending by
//! cached distance, so the worst edge of a node is always its last entry.
//! Edges are mutual: `add_edge`/`remove_edge` always touch both endpoints.
//!
//! The store enforces the degree budget and the mutual-edge invariant. It
//! offers bounded reachability as a primitive; deciding when an edge may be
//! removed is the builder's and optimizer's discipline.

use crate::{GraphError, Result};
use lattis_vector::{validate_vector, DistanceFunction};

/// Dense node id, assigned sequentially at insertion.
pub type NodeId = u32;

/// A directed half of a mutual edge: target id plus cached distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Target node id.
    pub id: NodeId,
    /// Distance between the two endpoint vectors, cached at insertion time.
    pub distance: f32,
}

/// One node: its vector and its distance-sorted edge list.
#[derive(Debug, Clone)]
struct NodeRecord {
    vector: Vec<f32>,
    edges: Vec<Edge>,
}

/// Arena-owned graph store.
///
/// The store exclusively owns all vectors; callers only ever receive
/// borrowed slices. Mutation requires `&mut self`, so the borrow checker
/// enforces the single-writer regime while arbitrarily many readers may
/// search a shared `&GraphStore` in parallel.
pub struct GraphStore {
    dimensions: usize,
    distance: DistanceFunction,
    edges_per_node: usize,
    max_nodes: Option<usize>,
    nodes: Vec<NodeRecord>,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new(
        dimensions: usize,
        distance: DistanceFunction,
        edges_per_node: usize,
        max_nodes: Option<usize>,
    ) -> Self {
        Self {
            dimensions,
            distance,
            edges_per_node,
            max_nodes,
            nodes: Vec::new(),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Vector dimensionality, fixed at creation.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Configured metric.
    pub fn distance_function(&self) -> DistanceFunction {
        self.distance
    }

    /// The degree budget.
    pub fn edges_per_node(&self) -> usize {
        self.edges_per_node
    }

    /// Whether `id` names an existing node.
    pub fn contains(&self, id: NodeId) -> bool {
        (id as usize) < self.nodes.len()
    }

    /// Append a new node with an empty edge list, returning its id.
    pub fn add_node(&mut self, vector: &[f32]) -> Result<NodeId> {
        validate_vector(vector, self.dimensions)?;

        if let Some(max_nodes) = self.max_nodes {
            if self.nodes.len() >= max_nodes {
                return Err(GraphError::Capacity(max_nodes));
            }
        }

        let id = self.nodes.len() as NodeId;
        self.nodes.push(NodeRecord {
            vector: vector.to_vec(),
            edges: Vec::with_capacity(self.edges_per_node),
        });
        Ok(id)
    }

    /// Borrow the vector of node `u`.
    ///
    /// # Panics
    ///
    /// Panics if `u` is not a valid node id.
    pub fn vector_of(&self, u: NodeId) -> &[f32] {
        &self.nodes[u as usize].vector
    }

    /// The edge list of node `u`, sorted ascending by cached distance.
    ///
    /// # Panics
    ///
    /// Panics if `u` is not a valid node id.
    pub fn neighbors(&self, u: NodeId) -> &[Edge] {
        &self.nodes[u as usize].edges
    }

    /// Current edge count of node `u`.
    pub fn degree(&self, u: NodeId) -> usize {
        self.nodes[u as usize].edges.len()
    }

    /// Whether an edge u-v exists (in either direction; they are mutual).
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.nodes[u as usize].edges.iter().any(|e| e.id == v)
    }

    /// The farthest edge of node `u`, if it has any.
    pub fn worst_edge(&self, u: NodeId) -> Option<Edge> {
        self.nodes[u as usize].edges.last().copied()
    }

    /// Compute the metric distance between two stored nodes.
    pub fn distance_between(&self, u: NodeId, v: NodeId) -> f32 {
        self.distance
            .distance(&self.nodes[u as usize].vector, &self.nodes[v as usize].vector)
    }

    /// Insert the mutual edge u<->v with cached distance `dist`.
    ///
    /// A no-op if the pair is already connected. Fails with
    /// `DegreeExceeded` if either endpoint is at the degree budget; the
    /// caller must evict a weaker edge first.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, dist: f32) -> Result<()> {
        debug_assert!(u != v, "self-edges are not representable");
        debug_assert!(self.contains(u) && self.contains(v));

        if self.has_edge(u, v) {
            return Ok(());
        }

        if self.degree(u) >= self.edges_per_node {
            return Err(GraphError::DegreeExceeded(u));
        }
        if self.degree(v) >= self.edges_per_node {
            return Err(GraphError::DegreeExceeded(v));
        }

        self.insert_sorted(u, Edge { id: v, distance: dist });
        self.insert_sorted(v, Edge { id: u, distance: dist });
        Ok(())
    }

    /// Remove the mutual edge u<->v. Returns false if it did not exist.
    ///
    /// The caller is responsible for connectivity.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed_uv = self.remove_directed(u, v);
        let removed_vu = self.remove_directed(v, u);
        debug_assert_eq!(removed_uv, removed_vu, "mutual-edge invariant violated");
        removed_uv && removed_vu
    }

    /// Bounded reachability: can `from` reach `to` within `max_hops` edges?
    ///
    /// Level-by-level BFS, cut off at the hop budget. A `false` answer only
    /// means no path exists *within the budget*; callers treat that
    /// conservatively.
    pub fn reachable_within(&self, from: NodeId, to: NodeId, max_hops: usize) -> bool {
        if from == to {
            return true;
        }

        let mut seen = vec![false; self.nodes.len()];
        seen[from as usize] = true;
        let mut frontier = vec![from];

        for _ in 0..max_hops {
            let mut next = Vec::new();
            for &n in &frontier {
                for edge in &self.nodes[n as usize].edges {
                    if edge.id == to {
                        return true;
                    }
                    if !seen[edge.id as usize] {
                        seen[edge.id as usize] = true;
                        next.push(edge.id);
                    }
                }
            }
            if next.is_empty() {
                return false;
            }
            frontier = next;
        }

        false
    }

    /// Whether every node can be reached from node 0.
    ///
    /// Vacuously true for empty and single-node graphs. Used by tests and
    /// diagnostics, never on the hot path.
    pub fn is_connected(&self) -> bool {
        if self.nodes.len() <= 1 {
            return true;
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![0 as NodeId];
        seen[0] = true;
        let mut reached = 1;

        while let Some(u) = stack.pop() {
            for edge in &self.nodes[u as usize].edges {
                let idx = edge.id as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    reached += 1;
                    stack.push(edge.id);
                }
            }
        }

        reached == self.nodes.len()
    }

    fn insert_sorted(&mut self, u: NodeId, edge: Edge) {
        let edges = &mut self.nodes[u as usize].edges;
        let pos = edges
            .binary_search_by(|e| {
                e.distance
                    .total_cmp(&edge.distance)
                    .then_with(|| e.id.cmp(&edge.id))
            })
            .unwrap_or_else(|pos| pos);
        edges.insert(pos, edge);
    }

    fn remove_directed(&mut self, u: NodeId, v: NodeId) -> bool {
        let edges = &mut self.nodes[u as usize].edges;
        if let Some(pos) = edges.iter().position(|e| e.id == v) {
            edges.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(edges_per_node: usize) -> GraphStore {
        GraphStore::new(2, DistanceFunction::Euclidean, edges_per_node, None)
    }

    fn store_with_nodes(edges_per_node: usize, n: usize) -> GraphStore {
        let mut s = store(edges_per_node);
        for i in 0..n {
            s.add_node(&[i as f32, 0.0]).unwrap();
        }
        s
    }

    #[test]
    fn test_add_node_assigns_dense_ids() {
        let mut s = store(4);
        assert_eq!(s.add_node(&[0.0, 0.0]).unwrap(), 0);
        assert_eq!(s.add_node(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(s.len(), 2);
        assert_eq!(s.vector_of(1), &[1.0, 0.0]);
    }

    #[test]
    fn test_capacity_ceiling() {
        let mut s = GraphStore::new(2, DistanceFunction::Euclidean, 4, Some(2));
        s.add_node(&[0.0, 0.0]).unwrap();
        s.add_node(&[1.0, 0.0]).unwrap();
        assert!(matches!(
            s.add_node(&[2.0, 0.0]),
            Err(GraphError::Capacity(2))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut s = store(4);
        assert!(matches!(
            s.add_node(&[0.0, 0.0, 0.0]),
            Err(GraphError::Vector(_))
        ));
    }

    #[test]
    fn test_edges_are_mutual_with_same_distance() {
        let mut s = store_with_nodes(4, 3);
        s.add_edge(0, 1, 1.0).unwrap();
        s.add_edge(0, 2, 2.0).unwrap();

        assert!(s.has_edge(1, 0));
        assert_eq!(s.neighbors(0).len(), 2);
        assert_eq!(s.neighbors(1)[0].id, 0);
        assert_eq!(s.neighbors(1)[0].distance, 1.0);
        assert_eq!(s.neighbors(0)[0].distance, 1.0);
    }

    #[test]
    fn test_edge_list_sorted_ascending() {
        let mut s = store_with_nodes(4, 4);
        s.add_edge(0, 2, 3.0).unwrap();
        s.add_edge(0, 1, 1.0).unwrap();
        s.add_edge(0, 3, 2.0).unwrap();

        let dists: Vec<f32> = s.neighbors(0).iter().map(|e| e.distance).collect();
        assert_eq!(dists, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.worst_edge(0).unwrap().id, 2);
    }

    #[test]
    fn test_add_edge_idempotent() {
        let mut s = store_with_nodes(4, 2);
        s.add_edge(0, 1, 1.0).unwrap();
        s.add_edge(0, 1, 1.0).unwrap();
        s.add_edge(1, 0, 1.0).unwrap();
        assert_eq!(s.degree(0), 1);
        assert_eq!(s.degree(1), 1);
    }

    #[test]
    fn test_degree_budget_enforced() {
        let mut s = store_with_nodes(2, 4);
        s.add_edge(0, 1, 1.0).unwrap();
        s.add_edge(0, 2, 2.0).unwrap();
        assert!(matches!(
            s.add_edge(0, 3, 3.0),
            Err(GraphError::DegreeExceeded(0))
        ));
        // Other side full too
        s.add_edge(1, 2, 1.5).unwrap();
        assert!(matches!(
            s.add_edge(3, 1, 0.5),
            Err(GraphError::DegreeExceeded(1))
        ));
    }

    #[test]
    fn test_remove_edge_both_directions() {
        let mut s = store_with_nodes(4, 2);
        s.add_edge(0, 1, 1.0).unwrap();
        assert!(s.remove_edge(1, 0));
        assert_eq!(s.degree(0), 0);
        assert_eq!(s.degree(1), 0);
        assert!(!s.remove_edge(0, 1));
    }

    #[test]
    fn test_is_connected() {
        let mut s = store_with_nodes(4, 4);
        assert!(!s.is_connected());

        s.add_edge(0, 1, 1.0).unwrap();
        s.add_edge(2, 3, 1.0).unwrap();
        assert!(!s.is_connected());

        s.add_edge(1, 2, 1.0).unwrap();
        assert!(s.is_connected());

        s.remove_edge(1, 2);
        assert!(!s.is_connected());
    }

    #[test]
    fn test_single_node_is_connected() {
        let s = store_with_nodes(4, 1);
        assert!(s.is_connected());
        assert!(store(4).is_connected());
    }

    #[test]
    fn test_reachable_within_hop_bound() {
        // Line 0-1-2-3: node 3 is three hops from node 0.
        let mut s = store_with_nodes(4, 4);
        for i in 1..4u32 {
            s.add_edge(i - 1, i, 1.0).unwrap();
        }

        assert!(s.reachable_within(0, 0, 0));
        assert!(s.reachable_within(0, 3, 3));
        assert!(!s.reachable_within(0, 3, 2));

        s.remove_edge(1, 2);
        assert!(!s.reachable_within(0, 3, 10));
    }

    #[test]
    fn test_distance_between() {
        let mut s = store(4);
        s.add_node(&[0.0, 0.0]).unwrap();
        s.add_node(&[3.0, 4.0]).unwrap();
        assert!((s.distance_between(0, 1) - 5.0).abs() < 1e-6);
    }
}
