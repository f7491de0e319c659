// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-type connector construction (§4.4's `registerType`/`createInstance`
//! split between immutable type metadata and the concrete behaviour a
//! type builds per instance). Concrete connectors are out of scope
//! (§1); this is the seam a real camera/ADS-B/MQTT implementation plugs
//! into.

use std::sync::Arc;

use junction_connector::Connector;
use junction_core::{ConfigError, ConnectorConfigEntry, ConnectorTypeInfo};

/// A registered connector type's metadata plus its instance builder.
pub trait ConnectorFactory: Send + Sync {
    fn type_info(&self) -> ConnectorTypeInfo;

    /// Validates `entry.config` against this type's contract (§3) and
    /// builds a connector instance. Rejects with [`ConfigError`] rather
    /// than constructing a connector doomed to fail its first connect.
    fn build(&self, entry: &ConnectorConfigEntry) -> Result<Arc<dyn Connector>, ConfigError>;
}
