// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The six concrete end-to-end scenarios named by §8: type
//! auto-discovery, capability match, rule firing and notification,
//! conditional (cooldown) skip, mailbox overflow, and reconnection with
//! `connectionAttempts` tracking.

use std::sync::Arc;
use std::time::Duration;

use junction_bus::{handler, EventBus};
use junction_connector::Connector;
use junction_core::{
    Action, CapabilityDef, Condition, ConfigError, ConnectorConfigEntry, ConnectorTypeInfo, Event,
    Operation, Operator, Rule,
};
use junction_registry::ConnectorRegistry;
use junction_store::{MemStore, RuleStore};
use junction_supervisor::{Supervisor, SupervisorConfig};
use junction_testkit::{FakeTypeSource, RecordingConnector};

use super::fakes::FlakyConnector;

fn config_entry(id: &str, type_id: &str) -> ConnectorConfigEntry {
    ConnectorConfigEntry {
        id: id.to_string(),
        type_id: type_id.to_string(),
        name: id.to_string(),
        description: String::new(),
        enabled: true,
        config: serde_json::Value::Null,
        capabilities: None,
    }
}

/// Scenario 1: auto-discovery derives type identifiers from candidate
/// filenames/class names and registers each one under that identifier.
#[tokio::test]
async fn scenario_type_auto_discovery() {
    let registry = ConnectorRegistry::new(EventBus::new());
    let source = FakeTypeSource::new()
        .with_candidate("UnifiProtectConnector")
        .with_candidate("ADSBConnector");

    let registered = registry.auto_discover_types(&source).await;

    assert_eq!(registered.len(), 2);
    assert!(registry.type_info("unifi-protect").is_some());
    assert!(registry.type_info("adsb").is_some());

    // A second sweep over the same candidates registers nothing new.
    let registered_again = registry.auto_discover_types(&source).await;
    assert!(registered_again.is_empty());
}

/// Scenario 2: `findCapabilityMatches` pairs every producer of `src`
/// with every consumer of `dst`, excluding an instance paired with itself
/// (the case a connector type declaring both capabilities makes possible).
#[tokio::test]
async fn scenario_capability_match() {
    let registry = ConnectorRegistry::new(EventBus::new());
    registry
        .register_type(
            ConnectorTypeInfo::new("producer-type", "1.0.0")
                .with_capabilities([CapabilityDef::new("feed:produce").with_operations([Operation::Publish])]),
        )
        .unwrap();
    registry
        .register_type(
            ConnectorTypeInfo::new("consumer-type", "1.0.0")
                .with_capabilities([CapabilityDef::new("feed:consume").with_operations([Operation::Subscribe])]),
        )
        .unwrap();
    registry
        .register_type(ConnectorTypeInfo::new("bridge-type", "1.0.0").with_capabilities([
            CapabilityDef::new("feed:produce").with_operations([Operation::Publish]),
            CapabilityDef::new("feed:consume").with_operations([Operation::Subscribe]),
        ]))
        .unwrap();

    let producer = registry.create_instance(config_entry("con-producer", "producer-type"), Arc::new(RecordingConnector::new())).unwrap();
    let consumer_a = registry.create_instance(config_entry("con-consumer-a", "consumer-type"), Arc::new(RecordingConnector::new())).unwrap();
    let consumer_b = registry.create_instance(config_entry("con-consumer-b", "consumer-type"), Arc::new(RecordingConnector::new())).unwrap();
    let bridge = registry.create_instance(config_entry("con-bridge", "bridge-type"), Arc::new(RecordingConnector::new())).unwrap();

    let matches = registry.find_capability_matches("feed:produce", "feed:consume");

    assert_eq!(matches.len(), 5);
    assert!(matches.contains(&(producer, consumer_a)));
    assert!(matches.contains(&(producer, consumer_b)));
    assert!(matches.contains(&(producer, bridge)));
    assert!(matches.contains(&(bridge, consumer_a)));
    assert!(matches.contains(&(bridge, consumer_b)));
    assert!(!matches.contains(&(bridge, bridge)));
}

/// Scenario 3: a firing rule renders its `{{field}}` template and
/// dispatches the rendered message through the first capability
/// supporting `send` on each named channel.
#[tokio::test]
async fn scenario_rule_firing_and_notification() {
    let bus = EventBus::new();
    let store: Arc<dyn RuleStore> = Arc::new(MemStore::new());
    let registry = ConnectorRegistry::new(bus.clone());

    let notify_type = ConnectorTypeInfo::new("notify-channel", "1.0.0")
        .with_capabilities([CapabilityDef::new("notify:send").with_operations([Operation::Send])]);
    registry.register_type(notify_type).unwrap();
    let connector = RecordingConnector::new();
    registry.create_instance(config_entry("con-notify", "notify-channel"), Arc::new(connector.clone())).unwrap();

    let rule = Rule::new(junction_core::RuleId::new(), "motion notify", 1_000)
        .with_condition(Condition::new("eventType", Operator::Equals, serde_json::json!("camera:motion-detected")))
        .with_action(Action::Notify {
            channels: vec!["con-notify".to_string()],
            message: "motion seen: {{data.zone}}".to_string(),
        });
    store.create_rule(rule).await.unwrap();

    let engine = Arc::new(junction_engine::RuleEngine::new(bus.clone(), store.clone(), registry));
    engine.spawn();

    bus.publish(Event::new("camera:motion-detected", "con-cam").with_data(serde_json::json!({ "zone": "backyard" }))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let calls = connector.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].capability, "notify:send");
    assert_eq!(calls[0].params["message"], serde_json::json!("motion seen: backyard"));
}

/// Scenario 4: a rule within its cooldown window is skipped even though
/// its conditions still match (§4.6 step 3a).
#[tokio::test]
async fn scenario_conditional_skip_within_cooldown() {
    let bus = EventBus::new();
    let store: Arc<dyn RuleStore> = Arc::new(MemStore::new());
    let registry = ConnectorRegistry::new(bus.clone());

    let rule = Rule::new(junction_core::RuleId::new(), "repeated motion", 1_000)
        .with_condition(Condition::new("eventType", Operator::Equals, serde_json::json!("camera:motion-detected")))
        .with_cooldown_secs(60);
    store.create_rule(rule.clone()).await.unwrap();

    let engine = Arc::new(junction_engine::RuleEngine::new(bus.clone(), store.clone(), registry));
    engine.spawn();

    bus.publish(Event::new("camera:motion-detected", "con-cam")).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    bus.publish(Event::new("camera:motion-detected", "con-cam")).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let history = store.get_alarm_history(Default::default(), 10, 0).await.unwrap();
    assert_eq!(history.len(), 1, "second firing within the cooldown window must be skipped");
}

/// Scenario 5: a subscriber that cannot keep up has its mailbox
/// overflow; the drops across the whole burst are coalesced into
/// exactly one `bus:overflow` notice carrying the drop count, not one
/// notice per drop (§4.1, §8 scenario 5) — and that notice never
/// re-triggers another overflow even if it is itself dropped.
#[tokio::test]
async fn scenario_mailbox_overflow_emits_notice() {
    let bus = EventBus::with_history_capacity(4000);
    // A subscriber with a no-op handler still owns a bounded mailbox;
    // publishing faster than the single-threaded runtime can drain it
    // is what triggers the overflow path.
    bus.subscribe("flood:*", handler(|_event| async {}));

    let overflow = junction_bus::DEFAULT_CAPACITY as u64 + 2;
    for i in 0..overflow {
        bus.publish(Event::new("flood:tick", "test").with_data(serde_json::json!(i))).unwrap();
    }

    // The coalesced flush is debounced; give it time to fire before reading history.
    tokio::time::sleep(Duration::from_millis(150)).await;

    let history = bus.history(None, 4000, 0);
    let overflow_notices: Vec<_> = history.iter().filter(|e| e.event_type == "bus:overflow").collect();
    assert_eq!(overflow_notices.len(), 1, "expected exactly one coalesced bus:overflow notice");
    assert_eq!(overflow_notices[0].data["dropped"], serde_json::json!(2));
}

/// Scenario 6: a connector that fails its first connect attempts is
/// retried by the Supervisor's background reconnect loop and eventually
/// settles `Connected` with `connectionAttempts` reset to zero.
#[tokio::test]
async fn scenario_reconnection_tracks_connection_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let connectors_path = dir.path().join("connectors.json");
    std::fs::write(
        &connectors_path,
        r#"{"connectors":[{"id":"con-flaky01","type":"flaky","name":"Flaky Sensor","enabled":true,"config":{}}]}"#,
    )
    .unwrap();

    let config = SupervisorConfig {
        connectors_path,
        connector_types_dir: None,
        store_path: None,
        reconnect_interval_secs: 1,
        health_interval_secs: 3600,
        event_history_capacity: 256,
    };
    let store: Arc<dyn RuleStore> = Arc::new(MemStore::new());
    let supervisor = Supervisor::new(config, store);
    let flaky = FlakyConnector::new(3);
    supervisor.register_factory(Arc::new(FlakyFactory { connector: flaky.clone() }));
    supervisor.boot().await.unwrap();

    let (_, instance) = supervisor.registry().instances().into_iter().next().expect("one configured instance");
    let info = instance.status();
    assert_eq!(info.status, junction_core::ConnectorStatus::Error, "first connect attempt is expected to fail");
    assert_eq!(info.connection_attempts, 1);

    // Two tick-and-backoff cycles (interval 1s, backoff up to ~2.4s with
    // jitter) are enough to carry the flaky connector from its first
    // failure through to its third, successful attempt.
    tokio::time::sleep(Duration::from_secs(9)).await;

    let info = instance.status();
    assert_eq!(info.status, junction_core::ConnectorStatus::Connected);
    assert_eq!(info.connection_attempts, 0);
    assert!(flaky.attempts() >= 3);

    supervisor.shutdown().await;
}

struct FlakyFactory {
    connector: FlakyConnector,
}

impl junction_supervisor::ConnectorFactory for FlakyFactory {
    fn type_info(&self) -> ConnectorTypeInfo {
        ConnectorTypeInfo::new("flaky", "1.0.0")
    }

    fn build(&self, _entry: &ConnectorConfigEntry) -> Result<Arc<dyn Connector>, ConfigError> {
        Ok(Arc::new(self.connector.clone()))
    }
}
