// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `junction validate-config` — parses a connector config file (§6) and
//! reports duplicate ids and unknown-looking entries without booting a
//! supervisor, so an operator can check a file before a restart.

use std::collections::HashSet;
use std::path::Path;

use junction_core::ConnectorConfigFile;

use crate::exit_error::ExitError;

pub fn run(path: &Path, format: crate::OutputFormat) -> Result<(), ExitError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| ExitError::new(1, format!("reading {}: {err}", path.display())))?;
    let file = ConnectorConfigFile::parse(&raw)
        .map_err(|err| ExitError::new(1, format!("parsing {}: {err}", path.display())))?;

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in &file.connectors {
        if !seen.insert(entry.id.clone()) {
            duplicates.push(entry.id.clone());
        }
    }

    match format {
        crate::OutputFormat::Text => {
            println!("{} connector entries, {} enabled", file.connectors.len(), file.connectors.iter().filter(|e| e.enabled).count());
            if duplicates.is_empty() {
                println!("no duplicate ids");
            } else {
                println!("duplicate ids: {}", duplicates.join(", "));
            }
        }
        crate::OutputFormat::Json => {
            let report = serde_json::json!({
                "entries": file.connectors.len(),
                "enabled": file.connectors.iter().filter(|e| e.enabled).count(),
                "duplicateIds": duplicates,
            });
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
    }

    if !duplicates.is_empty() {
        return Err(ExitError::new(1, format!("{} duplicate connector id(s)", duplicates.len())));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_config_tests.rs"]
mod tests;
