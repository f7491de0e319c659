// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connector configuration file schema (§6): a human-edited document
//! loaded on boot and optionally rewritten on mutation.

use serde::{Deserialize, Serialize};

/// Enabled/disabled capability override recorded per instance (§4.4's
/// config-persistence serialisation).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityOverrides {
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// One entry of the `connectors:` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfigEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<CapabilityOverrides>,
}

fn default_enabled() -> bool {
    true
}

/// Top-level document, rooted at `connectors:`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfigFile {
    #[serde(default)]
    pub connectors: Vec<ConnectorConfigEntry>,
}

impl ConnectorConfigFile {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
