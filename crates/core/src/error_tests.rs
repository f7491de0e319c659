// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn config_error_messages_name_the_offending_field() {
    assert_eq!(ConfigError::MissingField("id".into()).to_string(), "missing required field `id`");
    assert_eq!(ConfigError::UnknownType("foo".into()).to_string(), "unknown connector type `foo`");
}

#[test]
fn capability_error_unsupported_operation_names_both() {
    let err = CapabilityError::UnsupportedOperation { capability: "camera:ptz".into(), operation: "write".into() };
    assert_eq!(err.to_string(), "operation `write` is not supported by capability `camera:ptz`");
}

#[test]
fn connect_error_includes_connector_and_reason() {
    let err = ConnectError { connector_id: "cam-1".into(), reason: "refused".into() };
    assert_eq!(err.to_string(), "connect failed for `cam-1`: refused");
}

#[test]
fn timeout_error_reports_elapsed_time() {
    let err = TimeoutError { connector_id: "cam-1".into(), operation: "snapshot".into(), elapsed_ms: 5000 };
    assert_eq!(err.to_string(), "operation `snapshot` on `cam-1` timed out after 5000ms");
}

#[test]
fn bus_overflow_error_reports_the_coalesced_count() {
    let err = BusOverflowError { event_type: "camera:motion".into(), dropped: 6 };
    assert_eq!(
        err.to_string(),
        "subscriber mailbox overflowed, dropped 6 event(s) (most recently `camera:motion`)"
    );
}
