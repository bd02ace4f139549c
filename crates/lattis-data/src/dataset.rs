//! Descriptors for the standard benchmark corpora and their on-disk layout.
//!
//! A corpus named `sift1m` rooted at `data/` lives in
//! `data/sift1m/sift1m/`, holding `sift1m_base.fvecs`,
//! `sift1m_query.fvecs`, and precomputed ground-truth ivecs files named by
//! top-k and base size, e.g. `sift1m_groundtruth_top1024_nb1000000.ivecs`.

use crate::fvecs::{read_fvecs, read_ivecs};
use crate::{DataError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Distance metric a corpus is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    L2,
    InnerProduct,
    Cosine,
}

/// The benchmark corpora with published ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetName {
    Sift1m,
    Deep1m,
    Glove,
    Audio,
    Enron,
}

impl DatasetName {
    /// All known corpora, smallest first.
    pub fn all() -> [DatasetName; 5] {
        [
            DatasetName::Audio,
            DatasetName::Enron,
            DatasetName::Sift1m,
            DatasetName::Deep1m,
            DatasetName::Glove,
        ]
    }

    /// Lowercase corpus name, as used in directory and file names.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetName::Sift1m => "sift1m",
            DatasetName::Deep1m => "deep1m",
            DatasetName::Glove => "glove",
            DatasetName::Audio => "audio",
            DatasetName::Enron => "enron",
        }
    }

    /// Published shape and metric of this corpus.
    pub fn info(&self) -> DatasetInfo {
        match self {
            DatasetName::Sift1m => DatasetInfo {
                metric: Metric::L2,
                base_count: 1_000_000,
                query_count: 10_000,
                dims: 128,
            },
            DatasetName::Deep1m => DatasetInfo {
                metric: Metric::L2,
                base_count: 1_000_000,
                query_count: 10_000,
                dims: 96,
            },
            DatasetName::Glove => DatasetInfo {
                metric: Metric::L2,
                base_count: 1_183_514,
                query_count: 10_000,
                dims: 100,
            },
            DatasetName::Audio => DatasetInfo {
                metric: Metric::L2,
                base_count: 53_387,
                query_count: 200,
                dims: 192,
            },
            DatasetName::Enron => DatasetInfo {
                metric: Metric::L2,
                base_count: 94_987,
                query_count: 200,
                dims: 1369,
            },
        }
    }
}

impl FromStr for DatasetName {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        DatasetName::all()
            .into_iter()
            .find(|ds| ds.name() == lower)
            .ok_or_else(|| DataError::UnknownDataset(s.to_string()))
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Published shape of a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetInfo {
    pub metric: Metric,
    pub base_count: usize,
    pub query_count: usize,
    pub dims: usize,
}

/// Number of neighbor ids per row in the precomputed ground-truth files.
pub const GROUNDTRUTH_TOPK: usize = 1024;

/// A corpus rooted at a data directory: resolves file paths and loads rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: DatasetName,
    files_dir: PathBuf,
    info: DatasetInfo,
}

impl Dataset {
    pub fn new(name: DatasetName, data_root: impl AsRef<Path>) -> Self {
        let files_dir = data_root.as_ref().join(name.name()).join(name.name());
        Self {
            name,
            files_dir,
            info: name.info(),
        }
    }

    pub fn name(&self) -> DatasetName {
        self.name
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    pub fn base_file(&self) -> PathBuf {
        self.files_dir.join(format!("{}_base.fvecs", self.name))
    }

    pub fn query_file(&self) -> PathBuf {
        self.files_dir.join(format!("{}_query.fvecs", self.name))
    }

    /// Ground-truth file for queries against a base of `nb` vectors.
    pub fn groundtruth_file(&self, nb: usize) -> PathBuf {
        self.files_dir.join(format!(
            "{}_groundtruth_top{}_nb{}.ivecs",
            self.name, GROUNDTRUTH_TOPK, nb
        ))
    }

    /// Load the base vectors. `half` keeps only the first half, matching the
    /// half-base ground-truth files.
    pub fn load_base(&self, half: bool) -> Result<Vec<Vec<f32>>> {
        let mut rows = read_fvecs(self.base_file())?;
        if half {
            rows.truncate(rows.len() / 2);
        }
        info!(
            dataset = %self.name,
            rows = rows.len(),
            dims = rows.first().map(|r| r.len()).unwrap_or(0),
            half,
            "loaded base vectors"
        );
        Ok(rows)
    }

    pub fn load_queries(&self) -> Result<Vec<Vec<f32>>> {
        let rows = read_fvecs(self.query_file())?;
        info!(dataset = %self.name, rows = rows.len(), "loaded query vectors");
        Ok(rows)
    }

    /// Load the precomputed ground truth, truncated to `k` ids per query and
    /// sorted ascending within each row for set comparison.
    pub fn load_groundtruth(&self, k: usize, half: bool) -> Result<Vec<Vec<u32>>> {
        let nb = if half {
            self.info.base_count / 2
        } else {
            self.info.base_count
        };
        load_groundtruth_rows(self.groundtruth_file(nb), k)
    }
}

/// Load a ground-truth ivecs file, keep the first `k` ids of each row, and
/// sort each row ascending.
pub fn load_groundtruth_rows(path: impl AsRef<Path>, k: usize) -> Result<Vec<Vec<u32>>> {
    let mut rows = read_ivecs(path)?;
    if let Some(first) = rows.first() {
        if first.len() < k {
            return Err(DataError::GroundTruthTooShallow {
                available: first.len(),
                requested: k,
            });
        }
    }
    for row in &mut rows {
        row.truncate(k);
        row.sort_unstable();
    }
    Ok(rows)
}
