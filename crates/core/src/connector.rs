// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connector instance data model (§3, §4.4): the lifecycle state machine
//! and the attributes the registry and dispatcher read/update. The
//! `Connector` trait itself (the behavioural contract) lives in
//! `junction-connector`, which depends on these types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::ConnectorId;

/// Lifecycle state of a connector instance (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectorStatus {
    /// `connect()` from this state is a documented no-op (§4.4).
    pub fn is_connect_noop(self) -> bool {
        self == ConnectorStatus::Connected
    }

    /// `disconnect()` from this state is a documented no-op (§4.4).
    pub fn is_disconnect_noop(self) -> bool {
        self == ConnectorStatus::Disconnected
    }
}

/// `stats = {messagesSent, messagesReceived, errors, lastActivity}` (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceStats {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub errors: u64,
    pub last_activity: Option<u64>,
}

/// Snapshot of a connector instance's attributes (§3), returned by
/// `status()` (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub id: ConnectorId,
    #[serde(rename = "type")]
    pub type_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ConnectorStatus,
    /// Per-capability enable flags; absent entries default to enabled.
    pub enabled_capabilities: BTreeSet<String>,
    pub disabled_capabilities: BTreeSet<String>,
    pub stats: InstanceStats,
    pub last_connected: Option<u64>,
    pub last_error: Option<String>,
    pub connection_attempts: u32,
    /// Epoch millis of the most recent connect attempt, successful or
    /// not — the Supervisor's reconnect loop uses this to know when a
    /// backed-off instance is due for its next try.
    pub last_attempt_at: Option<u64>,
}

impl InstanceInfo {
    pub fn new(id: ConnectorId, type_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            type_id: type_id.into(),
            name: name.into(),
            description: String::new(),
            status: ConnectorStatus::Disconnected,
            enabled_capabilities: BTreeSet::new(),
            disabled_capabilities: BTreeSet::new(),
            stats: InstanceStats::default(),
            last_connected: None,
            last_error: None,
            connection_attempts: 0,
            last_attempt_at: None,
        }
    }

    /// A capability is enabled unless explicitly disabled (§3: "default: enabled").
    pub fn capability_enabled(&self, capability_id: &str) -> bool {
        !self.disabled_capabilities.contains(capability_id)
    }
}

#[cfg(test)]
#[path = "connector_tests.rs"]
mod tests;
