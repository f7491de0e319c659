// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Supervisor (component H, §7): owns the bus, registry, store, and
//! rule engine for a process, drives type auto-discovery and connector
//! boot, and runs the background reconnect and health-snapshot loops.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex as SyncMutex;
use tokio::task::JoinHandle;

use junction_bus::{EventBus, SubscriptionToken};
use junction_core::{ConnectorConfigFile, ConnectorStatus, Event, SYSTEM_SOURCE};
use junction_engine::RuleEngine;
use junction_registry::ConnectorRegistry;
use junction_store::RuleStore;

use crate::backoff::Backoff;
use crate::config::SupervisorConfig;
use crate::factory::ConnectorFactory;
use crate::fs_discovery::FsTypeSource;

/// Ties the hub's components together for one process (§1, §7).
/// Cheap to clone — background loops hold a clone, not a reference.
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

struct Inner {
    config: SupervisorConfig,
    bus: EventBus,
    registry: ConnectorRegistry,
    store: Arc<dyn RuleStore>,
    engine: Arc<RuleEngine>,
    backoff: Backoff,
    factories: SyncMutex<HashMap<String, Arc<dyn ConnectorFactory>>>,
    engine_token: SubscriptionToken,
    started_at: Instant,
    reconnect_task: SyncMutex<Option<JoinHandle<()>>>,
    health_task: SyncMutex<Option<JoinHandle<()>>>,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig, store: Arc<dyn RuleStore>) -> Self {
        let bus = EventBus::with_history_capacity(config.event_history_capacity);
        let registry = ConnectorRegistry::with_config_path(bus.clone(), config.connectors_path.clone());
        let engine = Arc::new(RuleEngine::new(bus.clone(), store.clone(), registry.clone()));
        let engine_token = engine.clone().spawn();
        Self {
            inner: Arc::new(Inner {
                config,
                bus,
                registry,
                store,
                engine,
                backoff: Backoff::default(),
                factories: SyncMutex::new(HashMap::new()),
                engine_token,
                started_at: Instant::now(),
                reconnect_task: SyncMutex::new(None),
                health_task: SyncMutex::new(None),
            }),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn registry(&self) -> &ConnectorRegistry {
        &self.inner.registry
    }

    pub fn store(&self) -> &Arc<dyn RuleStore> {
        &self.inner.store
    }

    pub fn engine(&self) -> &Arc<RuleEngine> {
        &self.inner.engine
    }

    /// Registers a connector type's construction factory ahead of boot.
    /// Concrete connectors are out of scope (§1); this is the seam real
    /// deployments plug camera/ADS-B/MQTT implementations into.
    pub fn register_factory(&self, factory: Arc<dyn ConnectorFactory>) {
        let info = factory.type_info();
        self.inner.factories.lock().insert(info.type_id.clone(), factory);
    }

    /// Boot sequence (§7): auto-discover and register types from the
    /// configured directory (if any), register each factory's type
    /// directly too, load the connector config file, create every
    /// configured instance, then connect all of them and start the
    /// background loops.
    pub async fn boot(&self) -> Result<(), BootError> {
        let factories = self.inner.factories.lock().clone();
        for factory in factories.values() {
            let info = factory.type_info();
            if self.inner.registry.type_info(&info.type_id).is_none() {
                let _ = self.inner.registry.register_type(info);
            }
        }
        if let Some(dir) = &self.inner.config.connector_types_dir {
            let source = FsTypeSource::new(dir.clone(), factories.clone());
            let registered = self.inner.registry.auto_discover_types(&source).await;
            tracing::info!(count = registered.len(), "auto-discovered connector types");
        }

        if self.inner.config.connectors_path.exists() {
            let raw = std::fs::read_to_string(&self.inner.config.connectors_path)
                .map_err(BootError::ReadConfig)?;
            let file = ConnectorConfigFile::parse(&raw).map_err(BootError::ParseConfig)?;
            for entry in file.connectors {
                if !entry.enabled {
                    continue;
                }
                let Some(factory) = factories.get(&entry.type_id) else {
                    tracing::warn!(type_id = %entry.type_id, "no factory registered for configured connector");
                    continue;
                };
                let connector = factory.build(&entry).map_err(BootError::BuildConnector)?;
                self.inner
                    .registry
                    .create_instance(entry, connector)
                    .map_err(BootError::Registry)?;
            }
        }

        self.inner.registry.connect_all().await;
        self.spawn_reconnect_loop();
        self.spawn_health_loop();
        Ok(())
    }

    fn spawn_reconnect_loop(&self) {
        let supervisor = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(supervisor.inner.config.reconnect_interval());
            loop {
                ticker.tick().await;
                supervisor.sweep_reconnects().await;
            }
        });
        *self.inner.reconnect_task.lock() = Some(handle);
    }

    async fn sweep_reconnects(&self) {
        let now = now_ms();
        for (_, instance) in self.inner.registry.instances() {
            let info = instance.status();
            if info.status != ConnectorStatus::Error {
                continue;
            }
            let due_since = info.last_attempt_at.unwrap_or(0);
            let delay_ms = self.inner.backoff.delay_for(info.connection_attempts.max(1)).as_millis() as u64;
            if now.saturating_sub(due_since) < delay_ms {
                continue;
            }
            if let Err(err) = instance.connect().await {
                tracing::warn!(connector_id = %info.id, error = %err, "reconnect attempt failed");
            }
        }
    }

    fn spawn_health_loop(&self) {
        let supervisor = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(supervisor.inner.config.health_interval());
            loop {
                ticker.tick().await;
                supervisor.publish_health_snapshot();
            }
        });
        *self.inner.health_task.lock() = Some(handle);
    }

    fn publish_health_snapshot(&self) {
        let uptime_secs = self.inner.started_at.elapsed().as_secs();
        let connectors: Vec<_> = self
            .inner
            .registry
            .instances()
            .into_iter()
            .map(|(id, instance)| {
                let info = instance.status();
                serde_json::json!({
                    "connectorId": id.to_string(),
                    "status": info.status,
                    "connectionAttempts": info.connection_attempts,
                    "errors": info.stats.errors,
                })
            })
            .collect();
        let data = serde_json::json!({
            "uptimeSecs": uptime_secs,
            "memoryBytes": resident_memory_bytes(),
            "connectors": connectors,
        });
        let _ = self.inner.bus.publish(Event::new("health:check", SYSTEM_SOURCE).with_data(data));
    }

    /// Stops background loops and disconnects every instance (§7).
    pub async fn shutdown(&self) {
        if let Some(handle) = self.inner.reconnect_task.lock().take() {
            handle.abort();
        }
        if let Some(handle) = self.inner.health_task.lock().take() {
            handle.abort();
        }
        self.inner.bus.unsubscribe(self.inner.engine_token.clone()).ok();
        self.inner.registry.disconnect_all().await;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("reading connector config: {0}")]
    ReadConfig(#[source] std::io::Error),
    #[error("parsing connector config: {0}")]
    ParseConfig(#[source] serde_json::Error),
    #[error("building connector: {0}")]
    BuildConnector(#[source] junction_core::ConfigError),
    #[error(transparent)]
    Registry(#[from] junction_registry::RegistryError),
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Resident set size in bytes, read from `/proc/self/statm` (Linux). No
/// `sysinfo` dependency needed for the one number the health snapshot
/// requires (§7).
fn resident_memory_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    let page_size = 4096u64;
    Some(pages * page_size)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
