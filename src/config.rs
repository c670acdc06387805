//! Run configuration.
//!
//! A [`NetworkConfig`] describes one run of the `netspread` binary and can be
//! stored as JSON. Missing fields take their defaults, so a config file only
//! needs the values it changes:
//!
//! ```json
//! { "node_count": 2000, "seed": 7, "epidemic": { "transmission_probability": 0.02 } }
//! ```

use crate::epidemic::EpidemicParams;
use crate::error::NetworkError;
use crate::network::NetworkBuilder;
use crate::spawn::SpawnShape;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete run configuration.
///
/// Every node links to its [`DEFAULT_K`](crate::DEFAULT_K) nearest neighbors;
/// the neighbor count is not a run setting. Unknown keys are rejected.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub name: String,
    pub node_count: usize,
    pub spawn: SpawnShape,
    /// Expected number of nodes infected at start.
    pub initial_infected: f32,
    pub epidemic: EpidemicParams,
    /// Seed for a reproducible run; random when absent.
    pub seed: Option<u64>,
    /// Ticks the runner executes.
    pub ticks: u64,
    /// Log the population every this many ticks (0 disables periodic lines).
    pub log_every: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".into(),
            node_count: 1000,
            spawn: SpawnShape::default(),
            initial_infected: 10.0,
            epidemic: EpidemicParams::default(),
            seed: None,
            ticks: 1000,
            log_every: 100,
        }
    }
}

impl NetworkConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder carrying every network setting of this config.
    pub fn to_builder(&self) -> NetworkBuilder {
        let builder = NetworkBuilder::new()
            .with_node_count(self.node_count)
            .with_spawn_shape(self.spawn)
            .with_initial_infected(self.initial_infected)
            .with_params(self.epidemic);

        match self.seed {
            Some(seed) => builder.with_seed(seed),
            None => builder,
        }
    }
}
