// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited-JSON snapshot persistence: one record per line,
//! replayed on startup (§6). The simplest concrete realization of a
//! file-backed key-value store.

use std::io::Write;
use std::path::Path;

use junction_core::AlarmHistoryEntry;

use crate::error::StoreError;
use crate::tables::StoreTables;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
enum Record {
    Rule { rule: junction_core::Rule },
    Alarm { alarm: AlarmHistoryEntry },
    Ack { ack: junction_core::Acknowledgment },
}

pub fn load(path: &Path) -> Result<StoreTables, StoreError> {
    let mut tables = StoreTables::default();
    if !path.exists() {
        return Ok(tables);
    }
    let raw = std::fs::read_to_string(path)?;
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)?;
        match record {
            Record::Rule { rule } => {
                tables.rules.insert(rule.id, rule);
            }
            Record::Alarm { alarm } => {
                tables.alarm_history.insert(alarm.id, alarm);
            }
            Record::Ack { ack } => tables.acknowledgments.push(ack),
        }
    }
    Ok(tables)
}

pub fn save(path: &Path, tables: &StoreTables) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&tmp_path)?;
    for rule in tables.rules.values() {
        writeln!(file, "{}", serde_json::to_string(&Record::Rule { rule: rule.clone() })?)?;
    }
    for alarm in tables.alarm_history.values() {
        writeln!(file, "{}", serde_json::to_string(&Record::Alarm { alarm: alarm.clone() })?)?;
    }
    for ack in &tables.acknowledgments {
        writeln!(file, "{}", serde_json::to_string(&Record::Ack { ack: ack.clone() })?)?;
    }
    file.flush()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
