//! Dynamic proximity-graph ANN engine.
//!
//! Lattis maintains an editable proximity graph over high-dimensional
//! vectors: nodes are inserted incrementally via approximate search, and the
//! edge set is continuously re-optimized by local swaps so search quality
//! holds up as the graph grows. No full rebuilds, no static snapshots.
//!
//! # Architecture
//!
//! ```text
//! ExplorationGraph (index)     public, thread-safe facade
//!      ├── GraphStore          arena of nodes + mutual, distance-sorted edges
//!      ├── builder::extend     insert one node via candidate search
//!      ├── optimizer           randomized edge swaps under a degree budget
//!      └── search              best-first traversal (frontier + result queue)
//! ```
//!
//! Every edge is mutual: if A lists B, B lists A with the same cached
//! distance. No node exceeds `edges_per_node` edges at rest, and mutations
//! never disconnect the graph (the optimizer verifies reachability before
//! committing a swap).
//!
//! # Example
//!
//! ```
//! use lattis_graph::{ExplorationGraph, GraphParams};
//! use lattis_vector::DistanceFunction;
//!
//! let params = GraphParams { edges_per_node: 4, ..Default::default() };
//! let graph = ExplorationGraph::new(2, DistanceFunction::Euclidean, params).unwrap();
//!
//! graph.insert(&[0.0, 0.0]).unwrap();
//! graph.insert(&[1.0, 0.0]).unwrap();
//! graph.insert(&[0.0, 1.0]).unwrap();
//!
//! let results = graph.search(&[0.1, 0.1], 2, 0.1).unwrap();
//! assert_eq!(results[0].id, 0);
//! ```

mod builder;
mod config;
mod index;
mod optimizer;
mod search;
mod store;
mod visited;

pub use config::GraphParams;
pub use index::ExplorationGraph;
pub use search::SearchStats;
pub use store::{Edge, GraphStore, NodeId};

pub use lattis_vector::Neighbor;

/// Error type for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid entry point: {0}")]
    InvalidEntryPoint(String),

    #[error("Degree budget exceeded for node {0}")]
    DegreeExceeded(NodeId),

    #[error("Graph capacity reached ({0} nodes)")]
    Capacity(usize),

    #[error("Vector error: {0}")]
    Vector(#[from] lattis_vector::VectorError),
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
