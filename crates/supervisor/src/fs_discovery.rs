// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed connector type auto-discovery (§4.4, §6): enumerates
//! a directory of candidate connector class files and resolves each to a
//! registered [`ConnectorFactory`] by its derived type identifier.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use junction_registry::{derive_type_id, ConnectorTypeSource, DiscoveredType};

use crate::factory::ConnectorFactory;

/// Reads entries from `dir`; each entry's file stem is the candidate
/// identifier (`UnifiProtectConnector.so`, `ADSBConnector/`, …). Entries
/// whose derived type id has no matching factory are skipped with a
/// warning — the directory names candidates, but building one still
/// requires a factory registered ahead of time (§9's "no guessed code").
pub struct FsTypeSource {
    dir: PathBuf,
    factories: HashMap<String, Arc<dyn ConnectorFactory>>,
}

impl FsTypeSource {
    pub fn new(dir: PathBuf, factories: HashMap<String, Arc<dyn ConnectorFactory>>) -> Self {
        Self { dir, factories }
    }
}

#[async_trait]
impl ConnectorTypeSource for FsTypeSource {
    async fn discover(&self) -> Vec<DiscoveredType> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %self.dir.display(), error = %err, "connector type directory unreadable");
                return Vec::new();
            }
        };

        let mut discovered = Vec::new();
        for entry in entries.flatten() {
            let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let type_id = derive_type_id(&stem);
            match self.factories.get(&type_id) {
                Some(factory) => discovered.push(DiscoveredType { identifier: stem, info: factory.type_info() }),
                None => tracing::warn!(identifier = %stem, type_id, "no factory registered for discovered connector type"),
            }
        }
        discovered
    }
}

#[cfg(test)]
#[path = "fs_discovery_tests.rs"]
mod tests;
