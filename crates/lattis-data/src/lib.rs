//! Benchmark corpora: fvecs/ivecs file formats, dataset descriptors, and
//! recall scoring.
//!
//! The supported corpora (SIFT1M, DEEP1M, GloVe, Audio, Enron) all ship in
//! the TEXMEX binary layout: each row is a little-endian `i32` dimension
//! header followed by that many 4-byte elements, `f32` for vector files and
//! `u32` for ground-truth id files.

pub mod dataset;
pub mod fvecs;
pub mod recall;

pub use dataset::{Dataset, DatasetInfo, DatasetName, Metric};
pub use fvecs::{read_fvecs, read_ivecs, write_fvecs, write_ivecs};
pub use recall::recall_at_k;

use std::io;
use thiserror::Error;

/// Errors from dataset loading and file parsing.
#[derive(Debug, Error)]
pub enum DataError {
    /// I/O error from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File header carries an unusable dimension.
    #[error("invalid dimension header in {path}: {dims}")]
    InvalidDimension { path: String, dims: i64 },

    /// File size is not a whole number of rows.
    #[error("{path}: size {size} is not a multiple of the {row_bytes}-byte row")]
    MalformedFile {
        path: String,
        size: u64,
        row_bytes: u64,
    },

    /// A row's dimension header disagrees with the first row's.
    #[error("{path}: row {row} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        path: String,
        row: usize,
        found: u32,
        expected: u32,
    },

    /// Unknown dataset name.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// Ground-truth file holds fewer ids per row than requested.
    #[error("ground truth has {available} ids per row, need {requested}")]
    GroundTruthTooShallow { available: usize, requested: usize },
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DataError>;
