//! Graph construction and optimization parameters.
//!
//! All knobs are validated once, up front. Steady-state operation never
//! surfaces configuration errors.

use crate::{GraphError, Result};
use serde::{Deserialize, Serialize};

/// Parameters for graph construction, improvement, and search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParams {
    /// Maximum number of edges per node (the degree budget).
    /// Default: 24
    pub edges_per_node: usize,

    /// Candidate count for insertion search.
    /// Default: 48
    pub extend_k: usize,

    /// Exploration factor for insertion search.
    /// Default: 0.2
    pub extend_eps: f32,

    /// Candidate count for the cheap improvement pass.
    /// Default: 20
    pub improve_k: usize,

    /// Exploration factor for the cheap improvement pass.
    /// Default: 0.02
    pub improve_eps: f32,

    /// Candidate count for the extended improvement pass.
    /// Default: 48
    pub improve_extended_k: usize,

    /// Exploration factor for the extended improvement pass.
    /// Default: 0.1
    pub improve_extended_eps: f32,

    /// Hop bound for the reachability check before committing a swap.
    /// Default: 10
    pub max_path_length: usize,

    /// Swap attempts per improvement round.
    /// Default: 5
    pub swap_tries: usize,

    /// Swap attempts per extended improvement round.
    /// Default: 12
    pub additional_swap_tries: usize,

    /// Optional hard ceiling on node count. `None` = unbounded.
    #[serde(default)]
    pub max_nodes: Option<usize>,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            edges_per_node: 24,
            extend_k: 48,
            extend_eps: 0.2,
            improve_k: 20,
            improve_eps: 0.02,
            improve_extended_k: 48,
            improve_extended_eps: 0.1,
            max_path_length: 10,
            swap_tries: 5,
            additional_swap_tries: 12,
            max_nodes: None,
        }
    }
}

impl GraphParams {
    /// Validate parameters, failing fast on nonsense values.
    pub fn validate(&self) -> Result<()> {
        if self.edges_per_node < 1 {
            return Err(GraphError::InvalidConfig(
                "edges_per_node must be >= 1".to_string(),
            ));
        }

        for (name, k) in [
            ("extend_k", self.extend_k),
            ("improve_k", self.improve_k),
            ("improve_extended_k", self.improve_extended_k),
        ] {
            if k < 1 {
                return Err(GraphError::InvalidConfig(format!("{} must be >= 1", name)));
            }
        }

        for (name, eps) in [
            ("extend_eps", self.extend_eps),
            ("improve_eps", self.improve_eps),
            ("improve_extended_eps", self.improve_extended_eps),
        ] {
            if !eps.is_finite() || eps < 0.0 {
                return Err(GraphError::InvalidConfig(format!(
                    "{} must be finite and >= 0, got {}",
                    name, eps
                )));
            }
        }

        if self.max_path_length < 1 {
            return Err(GraphError::InvalidConfig(
                "max_path_length must be >= 1".to_string(),
            ));
        }

        if self.swap_tries < 1 {
            return Err(GraphError::InvalidConfig(
                "swap_tries must be >= 1".to_string(),
            ));
        }

        if self.additional_swap_tries < 1 {
            return Err(GraphError::InvalidConfig(
                "additional_swap_tries must be >= 1".to_string(),
            ));
        }

        if let Some(max_nodes) = self.max_nodes {
            if max_nodes < 1 {
                return Err(GraphError::InvalidConfig(
                    "max_nodes must be >= 1 when set".to_string(),
                ));
            }
        }

        Ok(())
    }
}
