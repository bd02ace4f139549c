//! Brute force vector index.
//!
//! Linear scan search - O(n) but exact. Used as the ground-truth baseline
//! when a dataset ships without precomputed ground truth, and as the oracle
//! in recall regression tests.

use crate::distance::DistanceFunction;
use crate::neighbor::Neighbor;
use crate::{validate_vector, Result};
use parking_lot::RwLock;

/// Brute force vector index over densely numbered vectors.
///
/// Vectors receive sequential u32 ids starting at 0, matching the id scheme
/// of the graph index so result sets are directly comparable.
///
/// # Performance
///
/// - Insert: O(1)
/// - Search: O(n * d) where n = vectors, d = dimensions
pub struct BruteForceIndex {
    /// Vector storage, indexed by id.
    vectors: RwLock<Vec<Vec<f32>>>,
    /// Vector dimensions (all vectors must have this dimension)
    dimensions: usize,
    /// Distance function to use
    distance: DistanceFunction,
}

impl BruteForceIndex {
    /// Create a new brute force index.
    pub fn new(dimensions: usize, distance: DistanceFunction) -> Self {
        Self {
            vectors: RwLock::new(Vec::new()),
            dimensions,
            distance,
        }
    }

    /// Get the distance function used by this index.
    pub fn distance_function(&self) -> DistanceFunction {
        self.distance
    }

    /// Append a vector, returning its assigned id.
    pub fn push(&self, vector: &[f32]) -> Result<u32> {
        validate_vector(vector, self.dimensions)?;

        let mut vectors = self.vectors.write();
        let id = vectors.len() as u32;
        vectors.push(vector.to_vec());
        Ok(id)
    }

    /// Search for the k nearest neighbors to the query vector.
    ///
    /// Returns up to `k` neighbors sorted by ascending distance.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        validate_vector(query, self.dimensions)?;

        if k == 0 {
            return Ok(vec![]);
        }

        let vectors = self.vectors.read();

        let mut results: Vec<Neighbor> = vectors
            .iter()
            .enumerate()
            .map(|(id, vec)| Neighbor::new(id as u32, self.distance.distance(query, vec)))
            .collect();

        results.sort();
        results.truncate(k);

        Ok(results)
    }

    /// Get a vector by id.
    pub fn get(&self, id: u32) -> Option<Vec<f32>> {
        let vectors = self.vectors.read();
        vectors.get(id as usize).cloned()
    }

    /// Get the number of vectors in the index.
    pub fn len(&self) -> usize {
        let vectors = self.vectors.read();
        vectors.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the dimension of vectors in this index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
