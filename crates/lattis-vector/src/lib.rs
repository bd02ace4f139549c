//! Vector similarity primitives for Lattis.
//!
//! This crate provides the pieces every index in the workspace is built on:
//!
//! - **Distance functions**: Euclidean (L2), Cosine, Inner Product
//! - **`Neighbor`**: the (id, distance) result element returned by searches
//! - **`BruteForceIndex`**: exact linear-scan search, the baseline used for
//!   ground-truth computation and recall regression tests
//!
//! # Example
//!
//! ```
//! use lattis_vector::{BruteForceIndex, DistanceFunction};
//!
//! let index = BruteForceIndex::new(3, DistanceFunction::Euclidean);
//! index.push(&[0.0, 0.0, 0.0]).unwrap();
//! index.push(&[1.0, 0.0, 0.0]).unwrap();
//!
//! let results = index.search(&[0.1, 0.0, 0.0], 1).unwrap();
//! assert_eq!(results[0].id, 0);
//! ```

mod brute;
mod distance;
mod neighbor;

pub use brute::BruteForceIndex;
pub use distance::{
    cosine_distance, euclidean_distance, euclidean_distance_squared, inner_product,
    DistanceFunction,
};
pub use neighbor::Neighbor;

/// Error type for vector operations.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {0}")]
    InvalidVector(String),
}

/// Result type for vector operations.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Validate a vector against an expected dimension, rejecting NaN/Inf.
pub fn validate_vector(vector: &[f32], dimensions: usize) -> Result<()> {
    if vector.len() != dimensions {
        return Err(VectorError::DimensionMismatch {
            expected: dimensions,
            actual: vector.len(),
        });
    }

    for (i, &v) in vector.iter().enumerate() {
        if v.is_nan() {
            return Err(VectorError::InvalidVector(format!("NaN at index {}", i)));
        }
        if v.is_infinite() {
            return Err(VectorError::InvalidVector(format!("Inf at index {}", i)));
        }
    }

    Ok(())
}
