// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor boot configuration (§7): where connector config and rule
//! data live on disk, and the intervals its background loops run at.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_reconnect_interval_secs() -> u64 {
    5
}

fn default_health_interval_secs() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    1024
}

/// Loaded from a TOML file at startup (`junctiond --config <path>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Connector instance/type config file (`ConnectorConfigFile`, §3).
    pub connectors_path: PathBuf,
    /// Optional directory to auto-discover connector types from (§4.4).
    #[serde(default)]
    pub connector_types_dir: Option<PathBuf>,
    /// Optional newline-delimited JSON snapshot for rule/alarm state (§5).
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default = "default_reconnect_interval_secs")]
    pub reconnect_interval_secs: u64,
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
    #[serde(default = "default_history_capacity")]
    pub event_history_capacity: usize,
}

impl SupervisorConfig {
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigLoadError::Io)?;
        toml::from_str(&raw).map_err(ConfigLoadError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("reading supervisor config: {0}")]
    Io(#[source] std::io::Error),
    #[error("parsing supervisor config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
