//! Public index facade.
//!
//! `ExplorationGraph` wraps the store behind a `RwLock` so the two supported
//! regimes fall out of the lock choice: arbitrarily many concurrent readers
//! may search while the graph is quiescent, and construction/improvement
//! serializes as a single writer. The optimizer's random source is owned
//! here and seeded explicitly, making swap sequences reproducible.

use crate::builder;
use crate::config::GraphParams;
use crate::optimizer;
use crate::search::{best_first_search, SearchStats};
use crate::store::{GraphStore, NodeId};
use crate::{GraphError, Result};
use lattis_vector::{DistanceFunction, Neighbor};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Seed node for external searches: the first node ever inserted.
const SEED: NodeId = 0;

/// A dynamically maintained proximity graph over feature vectors.
///
/// Thread-safe: searches take a read lock; insertion and improvement take
/// the write lock.
pub struct ExplorationGraph {
    params: GraphParams,
    store: RwLock<GraphStore>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ExplorationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorationGraph")
            .field("nodes", &self.len())
            .field("dimensions", &self.dimensions())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ExplorationGraph {
    /// Create an empty graph. Parameters are validated once, here.
    pub fn new(
        dimensions: usize,
        distance: DistanceFunction,
        params: GraphParams,
    ) -> Result<Self> {
        Self::with_seed(dimensions, distance, params, rand::random())
    }

    /// Create an empty graph with a fixed random seed for the optimizer,
    /// making improvement sequences reproducible.
    pub fn with_seed(
        dimensions: usize,
        distance: DistanceFunction,
        params: GraphParams,
        seed: u64,
    ) -> Result<Self> {
        params.validate()?;
        let store = GraphStore::new(dimensions, distance, params.edges_per_node, params.max_nodes);
        Ok(Self {
            params,
            store: RwLock::new(store),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    /// Build a graph by inserting `vectors` in input order, then running
    /// `improve_rounds` improvement rounds.
    pub fn build<I>(
        dimensions: usize,
        distance: DistanceFunction,
        params: GraphParams,
        vectors: I,
        improve_rounds: usize,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[f32]>,
    {
        let graph = Self::new(dimensions, distance, params)?;
        for vector in vectors {
            graph.insert(vector.as_ref())?;
        }

        let mut committed = 0usize;
        for _ in 0..improve_rounds {
            if graph.improve_once()? {
                committed += 1;
            }
        }
        if improve_rounds > 0 {
            info!(
                nodes = graph.len(),
                rounds = improve_rounds,
                committed,
                "build: improvement pass finished"
            );
        }

        Ok(graph)
    }

    /// Graph parameters.
    pub fn params(&self) -> &GraphParams {
        &self.params
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Vector dimensionality.
    pub fn dimensions(&self) -> usize {
        self.store.read().dimensions()
    }

    /// Insert one vector, wiring it into the graph, and return its node id.
    pub fn insert(&self, vector: &[f32]) -> Result<NodeId> {
        let mut store = self.store.write();
        builder::extend(&mut store, vector, &self.params)
    }

    /// Approximate top-k search from the graph's seed node.
    ///
    /// Results are ordered by ascending distance. Fails with
    /// `InvalidEntryPoint` on an empty graph.
    pub fn search(&self, query: &[f32], k: usize, eps: f32) -> Result<Vec<Neighbor>> {
        self.search_with_stats(query, k, eps).map(|(r, _)| r)
    }

    /// Like [`search`](Self::search), additionally reporting work counters.
    pub fn search_with_stats(
        &self,
        query: &[f32],
        k: usize,
        eps: f32,
    ) -> Result<(Vec<Neighbor>, SearchStats)> {
        self.search_from(&[SEED], query, k, eps)
    }

    /// Search starting from explicit entry points.
    pub fn search_from(
        &self,
        entry_points: &[NodeId],
        query: &[f32],
        k: usize,
        eps: f32,
    ) -> Result<(Vec<Neighbor>, SearchStats)> {
        if !eps.is_finite() || eps < 0.0 {
            return Err(GraphError::InvalidConfig(format!(
                "eps must be finite and >= 0, got {}",
                eps
            )));
        }
        let store = self.store.read();
        lattis_vector::validate_vector(query, store.dimensions())?;
        best_first_search(&store, query, entry_points, k, eps)
    }

    /// One cheap improvement round. Returns whether a swap was committed.
    pub fn improve_once(&self) -> Result<bool> {
        let mut store = self.store.write();
        let mut rng = self.rng.lock();
        optimizer::improve_round(
            &mut store,
            &mut rng,
            self.params.improve_k,
            self.params.improve_eps,
            self.params.max_path_length,
            self.params.swap_tries,
        )
    }

    /// One extended improvement round: wider candidate search and a larger
    /// retry budget, for escaping optima the cheap pass cannot.
    pub fn improve_extended_once(&self) -> Result<bool> {
        let mut store = self.store.write();
        let mut rng = self.rng.lock();
        optimizer::improve_round(
            &mut store,
            &mut rng,
            self.params.improve_extended_k,
            self.params.improve_extended_eps,
            self.params.max_path_length,
            self.params.additional_swap_tries,
        )
    }

    /// Current degree of a node, if it exists.
    pub fn degree(&self, id: NodeId) -> Option<usize> {
        let store = self.store.read();
        store.contains(id).then(|| store.degree(id))
    }

    /// Snapshot of a node's neighbors as (id, cached distance), ascending.
    pub fn neighbors_of(&self, id: NodeId) -> Option<Vec<Neighbor>> {
        let store = self.store.read();
        store.contains(id).then(|| {
            store
                .neighbors(id)
                .iter()
                .map(|e| Neighbor::new(e.id, e.distance))
                .collect()
        })
    }

    /// Whether every node is reachable from the seed. Diagnostic; walks the
    /// whole graph.
    pub fn is_connected(&self) -> bool {
        self.store.read().is_connected()
    }
}
