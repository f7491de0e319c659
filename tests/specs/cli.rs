// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess-level checks for the `junction` operator binary (§6) —
//! the one place this spec suite shells out, since `validate-config`
//! and `discover-types` are themselves thin wrappers over file I/O with
//! no library seam worth testing in-process.

use assert_cmd::Command;

#[test]
fn validate_config_reports_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("connectors.json");
    std::fs::write(
        &path,
        r#"{"connectors":[
            {"id":"con-a","type":"camera","name":"a","enabled":true},
            {"id":"con-a","type":"camera","name":"a-again","enabled":true}
        ]}"#,
    )
    .unwrap();

    let output = Command::cargo_bin("junction")
        .unwrap()
        .args(["validate-config", path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("duplicate ids: con-a"), "stdout was: {stdout}");
}

#[test]
fn validate_config_accepts_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("connectors.json");
    std::fs::write(
        &path,
        r#"{"connectors":[{"id":"con-a","type":"camera","name":"a","enabled":true}]}"#,
    )
    .unwrap();

    let output = Command::cargo_bin("junction")
        .unwrap()
        .args(["validate-config", path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no duplicate ids"), "stdout was: {stdout}");
}

#[test]
fn discover_types_previews_derived_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("UnifiProtectConnector.ts"), "").unwrap();
    std::fs::write(dir.path().join("ADSBConnector.ts"), "").unwrap();

    let output = Command::cargo_bin("junction")
        .unwrap()
        .args(["discover-types", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("UnifiProtectConnector -> unifi-protect"), "stdout was: {stdout}");
    assert!(stdout.contains("ADSBConnector -> adsb"), "stdout was: {stdout}");
}
