//! Benchmark configuration.
//!
//! Loads and validates configuration from a YAML file or environment
//! variables.

use lattis_graph::GraphParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Benchmark run configuration.
///
/// Example YAML:
/// ```yaml
/// dataset: sift1m
/// data_root: /data/ann
/// half_base: false
/// k: 10
/// eps_grid: [0.0, 0.05, 0.1, 0.2]
/// improve_rounds: 100000
/// seed: 7
/// graph:
///   edges_per_node: 30
///   extend_k: 60
///   extend_eps: 0.2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Corpus name: sift1m, deep1m, glove, audio, or enron.
    pub dataset: String,

    /// Directory holding the downloaded corpora.
    pub data_root: PathBuf,

    /// Index only the first half of the base vectors.
    #[serde(default)]
    pub half_base: bool,

    /// Neighbors returned per query.
    #[serde(default = "default_k")]
    pub k: usize,

    /// Search eps values to sweep, ascending.
    #[serde(default = "default_eps_grid")]
    pub eps_grid: Vec<f32>,

    /// Improvement rounds after construction.
    #[serde(default)]
    pub improve_rounds: usize,

    /// Fixed optimizer seed; omit for a random one.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Cap on the number of queries evaluated; omit for all.
    #[serde(default)]
    pub max_queries: Option<usize>,

    /// Graph construction parameters.
    #[serde(default)]
    pub graph: GraphParams,
}

fn default_k() -> usize {
    10
}

fn default_eps_grid() -> Vec<f32> {
    vec![0.0, 0.05, 0.1, 0.2]
}

impl BenchConfig {
    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("failed to read config file: {}", e)))?;

        let config: BenchConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("failed to parse YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Supported variables:
    /// - LATTIS_DATASET
    /// - LATTIS_DATA_ROOT
    /// - LATTIS_HALF_BASE (true/false)
    /// - LATTIS_K
    /// - LATTIS_IMPROVE_ROUNDS
    /// - LATTIS_SEED
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let dataset = std::env::var("LATTIS_DATASET")
            .map_err(|_| ConfigError::MissingField("LATTIS_DATASET".to_string()))?;
        let data_root = std::env::var("LATTIS_DATA_ROOT")
            .map_err(|_| ConfigError::MissingField("LATTIS_DATA_ROOT".to_string()))?;

        let half_base = std::env::var("LATTIS_HALF_BASE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let k = parse_env("LATTIS_K")?.unwrap_or_else(default_k);
        let improve_rounds = parse_env("LATTIS_IMPROVE_ROUNDS")?.unwrap_or(0);
        let seed = parse_env("LATTIS_SEED")?;

        let config = BenchConfig {
            dataset,
            data_root: PathBuf::from(data_root),
            half_base,
            k,
            eps_grid: default_eps_grid(),
            improve_rounds,
            seed,
            max_queries: None,
            graph: GraphParams::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.is_empty() {
            return Err(ConfigError::InvalidField(
                "dataset cannot be empty".to_string(),
            ));
        }

        if !self.data_root.is_dir() {
            return Err(ConfigError::InvalidField(format!(
                "data_root is not a directory: {}",
                self.data_root.display()
            )));
        }

        if self.k == 0 {
            return Err(ConfigError::InvalidField("k must be > 0".to_string()));
        }

        if self.eps_grid.is_empty() {
            return Err(ConfigError::InvalidField(
                "eps_grid cannot be empty".to_string(),
            ));
        }
        for &eps in &self.eps_grid {
            if !eps.is_finite() || eps < 0.0 {
                return Err(ConfigError::InvalidField(format!(
                    "eps values must be finite and >= 0, got {}",
                    eps
                )));
            }
        }

        self.graph
            .validate()
            .map_err(|e| ConfigError::InvalidField(e.to_string()))?;

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidField(format!("cannot parse {}: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid field: {0}")]
    InvalidField(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, yaml: &str) -> String {
        let path = dir.path().join("bench.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_minimal_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "dataset: sift1m\ndata_root: {}\n",
            dir.path().display()
        );
        let path = write_config(&dir, &yaml);

        let config = BenchConfig::load_from_file(&path).unwrap();
        assert_eq!(config.dataset, "sift1m");
        assert_eq!(config.k, 10);
        assert_eq!(config.eps_grid, vec![0.0, 0.05, 0.1, 0.2]);
        assert_eq!(config.graph.edges_per_node, GraphParams::default().edges_per_node);
    }

    #[test]
    fn test_graph_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "dataset: audio\ndata_root: {}\nk: 5\ngraph:\n  edges_per_node: 12\n  extend_k: 24\n",
            dir.path().display()
        );
        let path = write_config(&dir, &yaml);

        let config = BenchConfig::load_from_file(&path).unwrap();
        assert_eq!(config.k, 5);
        assert_eq!(config.graph.edges_per_node, 12);
        assert_eq!(config.graph.extend_k, 24);
    }

    #[test]
    fn test_rejects_bad_eps() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "dataset: audio\ndata_root: {}\neps_grid: [-0.5]\n",
            dir.path().display()
        );
        let path = write_config(&dir, &yaml);

        let err = BenchConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField(_)));
    }

    #[test]
    fn test_rejects_missing_data_root() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = "dataset: audio\ndata_root: /does/not/exist\n";
        let path = write_config(&dir, yaml);

        let err = BenchConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField(_)));
    }
}
