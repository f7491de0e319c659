// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connector registry (§4.4): type catalogue, instance catalogue,
//! lifecycle sweeps, event forwarding, and debounced config persistence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use junction_bus::EventBus;
use junction_connector::{Connector, ConnectorInstance};
use junction_core::{
    CapabilityOverrides, ConfigError, ConnectorConfigEntry, ConnectorConfigFile, ConnectorId,
    ConnectorTypeInfo, InstanceInfo,
};

use crate::discovery::{ConnectorTypeSource, DiscoveredType};
use crate::error::RegistryError;

const SAVE_DEBOUNCE: Duration = Duration::from_millis(250);

struct Entry {
    instance: Arc<ConnectorInstance>,
    config: ConnectorConfigEntry,
    forwarder: JoinHandle<()>,
}

struct Inner {
    bus: EventBus,
    types: RwLock<HashMap<String, Arc<ConnectorTypeInfo>>>,
    instances: RwLock<HashMap<ConnectorId, Entry>>,
    config_path: Option<std::path::PathBuf>,
    save_pending: AtomicBool,
}

/// Cheap to clone; all clones share the same catalogues.
#[derive(Clone)]
pub struct ConnectorRegistry {
    inner: Arc<Inner>,
}

impl ConnectorRegistry {
    pub fn new(bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                bus,
                types: RwLock::new(HashMap::new()),
                instances: RwLock::new(HashMap::new()),
                config_path: None,
                save_pending: AtomicBool::new(false),
            }),
        }
    }

    pub fn with_config_path(bus: EventBus, path: std::path::PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                bus,
                types: RwLock::new(HashMap::new()),
                instances: RwLock::new(HashMap::new()),
                config_path: Some(path),
                save_pending: AtomicBool::new(false),
            }),
        }
    }

    /// `registerType` — rejects duplicates (§4.4).
    pub fn register_type(&self, info: ConnectorTypeInfo) -> Result<(), RegistryError> {
        let mut types = self.inner.types.write();
        if types.contains_key(&info.type_id) {
            return Err(ConfigError::DuplicateId(info.type_id).into());
        }
        types.insert(info.type_id.clone(), Arc::new(info));
        Ok(())
    }

    /// `autoDiscoverTypes` — duplicate identifiers are skipped with a
    /// warning rather than failing the whole sweep (§4.4).
    pub async fn auto_discover_types(&self, source: &dyn ConnectorTypeSource) -> Vec<String> {
        let mut registered = Vec::new();
        for DiscoveredType { identifier, info } in source.discover().await {
            let type_id = info.type_id.clone();
            if self.inner.types.read().contains_key(&type_id) {
                tracing::warn!(identifier, type_id, "skipping duplicate connector type");
                continue;
            }
            self.inner.types.write().insert(type_id.clone(), Arc::new(info));
            registered.push(type_id);
        }
        registered
    }

    pub fn type_info(&self, type_id: &str) -> Option<Arc<ConnectorTypeInfo>> {
        self.inner.types.read().get(type_id).cloned()
    }

    /// `createInstance` (§4.4): validates id/type, builds the instance with
    /// a fresh event channel, and spawns a forwarder that republishes the
    /// connector's lifecycle events onto the bus as `connector:<event>`.
    pub fn create_instance(
        &self,
        config: ConnectorConfigEntry,
        connector: Arc<dyn Connector>,
    ) -> Result<ConnectorId, RegistryError> {
        if self.inner.instances.read().contains_key(&ConnectorId::from_string(&config.id)) {
            return Err(ConfigError::DuplicateId(config.id.clone()).into());
        }
        let type_info = self
            .inner
            .types
            .read()
            .get(&config.type_id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownType(config.type_id.clone()))?;

        let id = ConnectorId::from_string(&config.id);
        let mut info = InstanceInfo::new(id, config.type_id.clone(), config.name.clone());
        info.description = config.description.clone();
        if let Some(overrides) = &config.capabilities {
            info.enabled_capabilities = overrides.enabled.iter().cloned().collect();
            info.disabled_capabilities = overrides.disabled.iter().cloned().collect();
        }

        let (tx, rx) = mpsc::channel(256);
        let instance = Arc::new(ConnectorInstance::new(type_info, connector, info, tx));
        let forwarder = spawn_forwarder(self.inner.bus.clone(), id, rx);

        self.inner.instances.write().insert(id, Entry { instance, config, forwarder });
        let _ = self.inner.bus.publish(junction_core::Event::new(
            "connector:created",
            junction_core::SYSTEM_SOURCE,
        ).with_data(serde_json::json!({ "connectorId": id.to_string() })));
        self.schedule_save();
        Ok(id)
    }

    /// `updateInstance` — merges `config` and/or capability enable/disable state.
    pub fn update_instance(
        &self,
        id: ConnectorId,
        config_patch: Option<serde_json::Value>,
        capabilities: Option<CapabilityOverrides>,
    ) -> Result<(), RegistryError> {
        let mut instances = self.inner.instances.write();
        let entry = instances.get_mut(&id).ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        if let Some(patch) = config_patch {
            entry.config.config = patch;
        }
        if let Some(overrides) = capabilities {
            entry.config.capabilities = Some(overrides);
        }
        drop(instances);
        let _ = self.inner.bus.publish(junction_core::Event::new(
            "connector:updated",
            junction_core::SYSTEM_SOURCE,
        ).with_data(serde_json::json!({ "connectorId": id.to_string() })));
        self.schedule_save();
        Ok(())
    }

    /// `removeInstance` — drives through disconnect first if connected (§4.4).
    pub async fn remove_instance(&self, id: ConnectorId) -> Result<(), RegistryError> {
        let instance = {
            let instances = self.inner.instances.read();
            instances.get(&id).map(|e| e.instance.clone())
        };
        let Some(instance) = instance else {
            return Err(RegistryError::NotFound(id.to_string()));
        };
        if instance.status().status != junction_core::ConnectorStatus::Disconnected {
            instance.disconnect().await?;
        }
        if let Some(entry) = self.inner.instances.write().remove(&id) {
            entry.forwarder.abort();
        }
        let _ = self.inner.bus.publish(junction_core::Event::new(
            "connector:removed",
            junction_core::SYSTEM_SOURCE,
        ).with_data(serde_json::json!({ "connectorId": id.to_string() })));
        self.schedule_save();
        Ok(())
    }

    pub fn instance(&self, id: ConnectorId) -> Option<Arc<ConnectorInstance>> {
        self.inner.instances.read().get(&id).map(|e| e.instance.clone())
    }

    /// All registered instances, snapshot order arbitrary — used by
    /// `connect_all`/`disconnect_all` and by the Supervisor's reconnect
    /// and health-snapshot loops.
    pub fn instances(&self) -> Vec<(ConnectorId, Arc<ConnectorInstance>)> {
        self.inner.instances.read().iter().map(|(id, e)| (*id, e.instance.clone())).collect()
    }

    /// Best-effort sweep; returns per-instance outcome.
    pub async fn connect_all(&self) -> Vec<(ConnectorId, Result<(), junction_core::LifecycleError>)> {
        let mut results = Vec::new();
        for (id, instance) in self.instances() {
            results.push((id, instance.connect().await));
        }
        results
    }

    pub async fn disconnect_all(&self) -> Vec<(ConnectorId, Result<(), junction_core::LifecycleError>)> {
        let mut results = Vec::new();
        for (id, instance) in self.instances() {
            results.push((id, instance.disconnect().await));
        }
        results
    }

    /// `findByCapability` — instances with that capability enabled.
    pub fn find_by_capability(&self, capability_id: &str) -> Vec<ConnectorId> {
        self.inner
            .instances
            .read()
            .iter()
            .filter(|(_, e)| {
                e.instance.status().capability_enabled(capability_id)
                    && e.instance.capabilities().iter().any(|c| c.id == capability_id)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// `findCapabilityMatches(src, dst)` — cross product of instances
    /// offering `src` and instances offering `dst`, excluding self-pairs (§4.4).
    pub fn find_capability_matches(&self, src: &str, dst: &str) -> Vec<(ConnectorId, ConnectorId)> {
        let producers = self.find_by_capability(src);
        let consumers = self.find_by_capability(dst);
        producers
            .into_iter()
            .flat_map(|p| consumers.iter().filter(move |c| **c != p).map(move |c| (p, *c)))
            .collect()
    }

    fn schedule_save(&self) {
        if self.inner.config_path.is_none() {
            return;
        }
        if self.inner.save_pending.swap(true, Ordering::SeqCst) {
            return;
        }
        let registry = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SAVE_DEBOUNCE).await;
            registry.inner.save_pending.store(false, Ordering::SeqCst);
            if let Err(err) = registry.write_config_snapshot() {
                tracing::warn!(error = %err, "failed to persist connector configuration");
            }
        });
    }

    fn write_config_snapshot(&self) -> std::io::Result<()> {
        let Some(path) = &self.inner.config_path else { return Ok(()) };
        let file = ConnectorConfigFile {
            connectors: self.inner.instances.read().values().map(|e| e.config.clone()).collect(),
        };
        let rendered = file.to_json_pretty().unwrap_or_default();
        std::fs::write(path, rendered)
    }
}

fn spawn_forwarder(bus: EventBus, connector_id: ConnectorId, mut rx: mpsc::Receiver<junction_core::Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let forwarded_type = format!("connector:{}", event.event_type);
            let mut data = serde_json::json!({ "connectorId": connector_id.to_string() });
            if let serde_json::Value::Object(map) = &mut data {
                if let serde_json::Value::Object(payload) = event.data {
                    map.extend(payload);
                }
            }
            let forwarded = junction_core::Event::new(forwarded_type, connector_id.to_string()).with_data(data);
            let _ = bus.publish(forwarded);
        }
    })
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
