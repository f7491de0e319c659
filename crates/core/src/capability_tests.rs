// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn snapshot_capability() -> CapabilityDef {
    CapabilityDef::new("camera:snapshot")
        .with_operations([Operation::Get])
        .with_parameter("quality", ParamSpec::optional(ParamType::String))
        .requiring_connection()
}

#[test]
fn supports_checks_declared_operations() {
    let cap = snapshot_capability();
    assert!(cap.supports(Operation::Get));
    assert!(!cap.supports(Operation::Write));
}

#[test]
fn requires_connection_flag_set_by_builder() {
    assert!(snapshot_capability().requires_connection);
}

#[test]
fn param_type_matches_checks_json_shape() {
    assert!(ParamType::String.matches(&json!("hd")));
    assert!(!ParamType::String.matches(&json!(1)));
    assert!(ParamType::Number.matches(&json!(1.5)));
    assert!(ParamType::Bool.matches(&json!(true)));
    assert!(ParamType::List.matches(&json!([1, 2])));
    assert!(ParamType::Object.matches(&json!({"a": 1})));
}

#[test]
fn operation_producer_consumer_classification() {
    assert!(Operation::Write.is_producer());
    assert!(Operation::Trigger.is_producer());
    assert!(!Operation::Read.is_producer());
    assert!(Operation::Read.is_consumer());
    assert!(Operation::List.is_consumer());
    assert!(!Operation::Write.is_consumer());
}

#[test]
fn connector_type_info_looks_up_capability_by_id() {
    let info = ConnectorTypeInfo::new("unifi-protect", "1.0.0")
        .with_capabilities([snapshot_capability()]);
    assert!(info.capability("camera:snapshot").is_some());
    assert!(info.capability("camera:ptz").is_none());
}
