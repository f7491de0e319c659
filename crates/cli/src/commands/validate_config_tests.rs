// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn accepts_config_with_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("connectors.json");
    std::fs::write(
        &path,
        r#"{"connectors": [{"id": "con-a", "type": "unifi-protect", "name": "A"}]}"#,
    )
    .unwrap();

    assert!(run(&path, crate::OutputFormat::Text).is_ok());
}

#[test]
fn rejects_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("connectors.json");
    std::fs::write(
        &path,
        r#"{"connectors": [
            {"id": "con-a", "type": "unifi-protect", "name": "A"},
            {"id": "con-a", "type": "adsb", "name": "B"}
        ]}"#,
    )
    .unwrap();

    let err = run(&path, crate::OutputFormat::Json).unwrap_err();
    assert_eq!(err.code, 1);
}

#[test]
fn rejects_missing_file() {
    let err = run(std::path::Path::new("/nonexistent/connectors.json"), crate::OutputFormat::Text).unwrap_err();
    assert_eq!(err.code, 1);
}
