// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`ConnectorTypeSource`] so `auto_discover_types` tests
//! (§8 scenario 1) never touch the filesystem.

use async_trait::async_trait;

use junction_core::ConnectorTypeInfo;
use junction_registry::{derive_type_id, ConnectorTypeSource, DiscoveredType};

/// Discovers a fixed list of candidate type identifiers, exactly as if
/// they had been enumerated from a directory of connector class files.
#[derive(Default)]
pub struct FakeTypeSource {
    identifiers: Vec<String>,
}

impl FakeTypeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate identifier (e.g. `"UnifiProtectConnector"`), the
    /// filename-shaped form `derive_type_id` strips and maps (§4.4, §6).
    pub fn with_candidate(mut self, identifier: impl Into<String>) -> Self {
        self.identifiers.push(identifier.into());
        self
    }
}

#[async_trait]
impl ConnectorTypeSource for FakeTypeSource {
    async fn discover(&self) -> Vec<DiscoveredType> {
        self.identifiers
            .iter()
            .map(|identifier| {
                let type_id = derive_type_id(identifier);
                DiscoveredType { identifier: identifier.clone(), info: ConnectorTypeInfo::new(type_id, "0.1.0") }
            })
            .collect()
    }
}
