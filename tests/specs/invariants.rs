// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ten testable invariants named by §8: uniqueness, capability
//! gating, connection precondition, lifecycle idempotence,
//! serial-per-instance execution, bus ordering, history bound,
//! category/priority derivation, rule evaluation, and the alarm trail.

use std::sync::Arc;
use std::time::Duration;

use junction_bus::{handler, EventBus};
use junction_core::{
    Action, CapabilityDef, Category, Condition, ConnectorConfigEntry, ConnectorTypeInfo, Event,
    Operation, Operator, Priority, Rule,
};
use junction_engine::RuleEngine;
use junction_registry::ConnectorRegistry;
use junction_store::{AlarmHistoryFilter, MemStore, RuleStore};
use junction_testkit::RecordingConnector;

use super::fakes::SlowConnector;

fn camera_type() -> ConnectorTypeInfo {
    ConnectorTypeInfo::new("camera", "1.0.0").with_capabilities([
        CapabilityDef::new("camera:snapshot").with_operations([Operation::Read]).requiring_connection(),
        CapabilityDef::new("camera:stream").with_operations([Operation::Subscribe]),
    ])
}

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

#[tokio::test]
async fn duplicate_connector_id_is_rejected() {
    let registry = ConnectorRegistry::new(EventBus::new());
    registry.register_type(camera_type()).unwrap();
    registry.create_instance(config_entry("con-dup", "camera"), Arc::new(RecordingConnector::new())).unwrap();
    let err = registry
        .create_instance(config_entry("con-dup", "camera"), Arc::new(RecordingConnector::new()))
        .unwrap_err();
    assert!(matches!(err, junction_registry::RegistryError::Config(junction_core::ConfigError::DuplicateId(_))));
}

#[tokio::test]
async fn duplicate_connector_type_registration_is_rejected() {
    let registry = ConnectorRegistry::new(EventBus::new());
    registry.register_type(camera_type()).unwrap();
    let err = registry.register_type(camera_type()).unwrap_err();
    assert!(matches!(err, junction_registry::RegistryError::Config(junction_core::ConfigError::DuplicateId(_))));
}

#[tokio::test]
async fn disabled_capability_is_rejected_before_dispatch() {
    let registry = ConnectorRegistry::new(EventBus::new());
    registry.register_type(camera_type()).unwrap();
    let mut entry = config_entry("con-cam", "camera");
    entry.capabilities = Some(junction_core::CapabilityOverrides {
        enabled: Vec::new(),
        disabled: vec!["camera:stream".to_string()],
    });
    let id = registry.create_instance(entry, Arc::new(RecordingConnector::new())).unwrap();
    let instance = registry.instance(id).unwrap();
    instance.connect().await.unwrap();

    let err = instance.execute("camera:stream", Operation::Subscribe, serde_json::Value::Null).await.unwrap_err();
    assert!(matches!(
        err,
        junction_connector::DispatchError::Capability(junction_core::CapabilityError::Disabled(_))
    ));
}

#[tokio::test]
async fn connection_required_capability_blocked_when_disconnected() {
    let registry = ConnectorRegistry::new(EventBus::new());
    registry.register_type(camera_type()).unwrap();
    let id = registry.create_instance(config_entry("con-cam", "camera"), Arc::new(RecordingConnector::new())).unwrap();
    let instance = registry.instance(id).unwrap();

    let err = instance.execute("camera:snapshot", Operation::Read, serde_json::Value::Null).await.unwrap_err();
    assert!(matches!(
        err,
        junction_connector::DispatchError::Lifecycle(junction_core::LifecycleError::NotConnected(_))
    ));
}

#[tokio::test]
async fn connect_when_already_connected_is_idempotent_noop() {
    let registry = ConnectorRegistry::new(EventBus::new());
    registry.register_type(camera_type()).unwrap();
    let connector = RecordingConnector::new();
    let id = registry.create_instance(config_entry("con-cam", "camera"), Arc::new(connector.clone())).unwrap();
    let instance = registry.instance(id).unwrap();

    instance.connect().await.unwrap();
    instance.connect().await.unwrap();
    instance.connect().await.unwrap();

    assert_eq!(connector.connect_calls(), 1);
}

#[tokio::test]
async fn execute_calls_on_one_instance_never_overlap() {
    let registry = ConnectorRegistry::new(EventBus::new());
    let type_info = ConnectorTypeInfo::new("slow", "1.0.0")
        .with_capabilities([CapabilityDef::new("slow:op").with_operations([Operation::Write])]);
    registry.register_type(type_info).unwrap();
    let connector = SlowConnector::new();
    let id = registry.create_instance(config_entry("con-slow", "slow"), Arc::new(connector.clone())).unwrap();
    let instance = registry.instance(id).unwrap();

    let a = instance.execute("slow:op", Operation::Write, serde_json::Value::Null);
    let b = instance.execute("slow:op", Operation::Write, serde_json::Value::Null);
    let (ra, rb) = tokio::join!(a, b);
    ra.unwrap();
    rb.unwrap();

    assert_eq!(connector.max_observed_concurrency(), 1);
}

#[tokio::test]
async fn subscriber_receives_events_in_publish_order() {
    let bus = EventBus::new();
    let received = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let recorded = received.clone();
    bus.subscribe(
        "order:*",
        handler(move |event| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().push(event.data.as_u64().unwrap_or_default());
            }
        }),
    );

    for i in 0..20u64 {
        bus.publish(Event::new("order:tick", "test").with_data(serde_json::json!(i))).unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let seen = received.lock().clone();
    assert_eq!(seen, (0..20u64).collect::<Vec<_>>());
}

#[tokio::test]
async fn event_history_is_bounded_by_configured_capacity() {
    let bus = EventBus::with_history_capacity(5);
    for i in 0..10u64 {
        bus.publish(Event::new("history:tick", "test").with_data(serde_json::json!(i))).unwrap();
    }
    let history = bus.history(None, 100, 0);
    assert_eq!(history.len(), 5);
    // Newest first; the last five published (5..10) survive the ring buffer.
    let values: Vec<u64> = history.iter().map(|e| e.data.as_u64().unwrap_or_default()).collect();
    assert_eq!(values, vec![9, 8, 7, 6, 5]);
}

#[test]
fn event_type_derives_expected_category_and_priority() {
    let intrusion = Event::new("camera:intrusion-detected", "con-cam");
    assert_eq!(intrusion.category, Category::Security);
    assert_eq!(intrusion.priority, Priority::High);

    let adsb = Event::new("adsb:squawk-7700", "con-adsb");
    assert_eq!(adsb.category, Category::Aircraft);
    assert_eq!(adsb.priority, Priority::Critical);

    let status = Event::new("connector-status-changed", "system");
    assert_eq!(status.category, Category::System);
    assert_eq!(status.priority, Priority::Low);
}

#[tokio::test]
async fn rule_fires_only_when_all_conditions_match() {
    let bus = EventBus::new();
    let store: Arc<dyn RuleStore> = Arc::new(MemStore::new());
    let registry = ConnectorRegistry::new(bus.clone());
    let now = 1_000;
    let rule = Rule::new(junction_core::RuleId::new(), "high confidence intrusion", now)
        .with_condition(Condition::new("eventType", Operator::Equals, serde_json::json!("camera:intrusion")))
        .with_condition(Condition::new("data.confidence", Operator::Min, serde_json::json!(0.8)))
        .with_action(Action::Record { channel: "con-nonexistent".into(), payload: serde_json::json!({}) });
    store.create_rule(rule.clone()).await.unwrap();

    let engine = Arc::new(RuleEngine::new(bus.clone(), store.clone(), registry));
    engine.clone().spawn();

    bus.publish(Event::new("camera:intrusion", "con-cam").with_data(serde_json::json!({ "confidence": 0.4 }))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.get_alarm_history(AlarmHistoryFilter::default(), 10, 0).await.unwrap().is_empty());

    bus.publish(Event::new("camera:intrusion", "con-cam").with_data(serde_json::json!({ "confidence": 0.95 }))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let history = store.get_alarm_history(AlarmHistoryFilter::default(), 10, 0).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].rule_id, rule.id);
}

#[tokio::test]
async fn alarm_moves_through_active_acknowledged_resolved() {
    let bus = EventBus::new();
    let store: Arc<dyn RuleStore> = Arc::new(MemStore::new());
    let registry = ConnectorRegistry::new(bus.clone());
    let engine = RuleEngine::new(bus.clone(), store.clone(), registry);

    let entry = store
        .record_alarm_trigger(junction_core::RuleId::new(), "camera:intrusion".into(), "con-cam".into(), serde_json::Value::Null, 1_000)
        .await
        .unwrap();
    assert_eq!(entry.status, junction_core::AlarmStatus::Active);

    let acked = engine.acknowledge_alarm(entry.id, "operator-1".into(), "checked, false alarm".into()).await.unwrap();
    assert_eq!(acked.status, junction_core::AlarmStatus::Acknowledged);

    let resolved = engine.resolve_alarm(entry.id).await.unwrap();
    assert_eq!(resolved.status, junction_core::AlarmStatus::Resolved);
    assert!(resolved.resolved_at.is_some());
}
