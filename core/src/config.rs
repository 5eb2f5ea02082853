//! Registry behaviour knobs, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// What to do with a replay request that claims to come over the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplayBridgePolicy {
    /// Store silently.
    #[default]
    Accept,
    /// Store and log the anomaly.
    Warn,
    /// `try_push` refuses the request; `push` stores it and logs the anomaly.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
    pub replay_bridge_policy: ReplayBridgePolicy,
}

impl RegistryConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::parse)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::read(path, err))?;
        Self::from_toml_str(&raw)
    }

    pub fn with_replay_bridge_policy(mut self, policy: ReplayBridgePolicy) -> Self {
        self.replay_bridge_policy = policy;
        self
    }
}
