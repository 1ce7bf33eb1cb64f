// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Network-level routing configuration.
//!
//! A [`RoutingConfig`] is assembled from, in increasing priority:
//!  - the built-in defaults,
//!  - an optional TOML file,
//!  - environment variables prefixed with `NOC_` (e.g. `NOC_NUM_COLS=8`).

use std::fmt;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::mesh::MeshConfig;
use crate::types::{RoutingError, RoutingResult, VnetId};

/// Prefix of environment variables that override the configuration.
pub const ENV_PREFIX: &str = "NOC_";

/// Largest number of routers a mesh may have. Each router carries a
/// routing unit and four tracked ledger counters.
pub const MAX_ROUTERS: usize = 1 << 16;

/// The algorithm used for hops that do not end at the current router.
#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, Serialize, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingAlgorithm {
    /// Use the weighted routing table for every hop
    Table,

    /// Deterministic dimension-order routing, X first
    Xy,

    /// Dimension-order routing with trust-guided choice between the two
    /// productive directions
    #[default]
    AdaptiveXy,

    /// Topology-specific algorithm supplied by the user
    Custom,
}

impl fmt::Display for RoutingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Number of rows in the mesh
    pub num_rows: usize,

    /// Number of columns in the mesh
    pub num_cols: usize,

    /// Number of virtual networks
    pub num_vnets: usize,

    /// Algorithm used for transit hops
    pub routing_algorithm: RoutingAlgorithm,

    /// Virtual networks that require in-order delivery
    pub ordered_vnets: Vec<VnetId>,

    /// Starting value of every trust counter
    pub initial_trust: i64,

    /// Seed for the random tie-break between equal-weight links
    pub seed: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            num_rows: 4,
            num_cols: 4,
            num_vnets: 1,
            routing_algorithm: RoutingAlgorithm::default(),
            ordered_vnets: Vec::new(),
            initial_trust: 0,
            seed: 1,
        }
    }
}

impl RoutingConfig {
    /// Build the layered configuration without extracting it.
    #[must_use]
    pub fn figment(conf_file: Option<&Path>) -> Figment {
        let mut config = Figment::new().merge(Serialized::defaults(RoutingConfig::default()));
        if let Some(conf_file) = conf_file {
            config = config.merge(Toml::file(conf_file));
        }
        config.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate the configuration.
    pub fn load(conf_file: Option<&Path>) -> RoutingResult<Self> {
        if let Some(conf_file) = conf_file {
            if !conf_file.exists() {
                return Err(RoutingError::Config(format!(
                    "config file {} does not exist",
                    conf_file.display()
                )));
            }
        }
        let config: RoutingConfig = Self::figment(conf_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RoutingResult<()> {
        if self.num_rows == 0 || self.num_cols == 0 {
            return Err(RoutingError::Config(format!(
                "mesh must have at least one row and column, got {}x{}",
                self.num_rows, self.num_cols
            )));
        }
        match self.num_rows.checked_mul(self.num_cols) {
            Some(num_routers) if num_routers <= MAX_ROUTERS => {}
            _ => {
                return Err(RoutingError::Config(format!(
                    "{}x{} mesh exceeds the limit of {MAX_ROUTERS} routers",
                    self.num_rows, self.num_cols
                )));
            }
        }
        if self.num_vnets == 0 {
            return Err(RoutingError::Config(
                "at least one virtual network is required".to_string(),
            ));
        }
        if let Some(vnet) = self.ordered_vnets.iter().find(|v| **v >= self.num_vnets) {
            return Err(RoutingError::Config(format!(
                "ordered vnet {vnet} out of range (num_vnets = {})",
                self.num_vnets
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn mesh(&self) -> MeshConfig {
        MeshConfig::new(self.num_rows, self.num_cols)
    }

    /// Whether `vnet` requires strict in-order delivery.
    #[must_use]
    pub fn is_vnet_ordered(&self, vnet: VnetId) -> bool {
        self.ordered_vnets.contains(&vnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RoutingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mesh().num_routers(), 16);
        assert!(!config.is_vnet_ordered(0));
    }

    #[test]
    fn invalid_configs() {
        let config = RoutingConfig {
            num_cols: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RoutingConfig {
            num_vnets: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RoutingConfig {
            num_vnets: 2,
            ordered_vnets: vec![2],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RoutingError::Config(_))));
    }
}
