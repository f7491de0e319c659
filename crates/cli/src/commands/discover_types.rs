// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `junction discover-types` — previews what `autoDiscoverTypes` (§4.4)
//! would derive as type identifiers from a directory, without needing a
//! running supervisor or registered factories.

use std::path::Path;

use junction_registry::derive_type_id;

use crate::exit_error::ExitError;

pub fn run(dir: &Path, format: crate::OutputFormat) -> Result<(), ExitError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|err| ExitError::new(1, format!("reading {}: {err}", dir.display())))?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
            candidates.push((stem.to_string(), derive_type_id(stem)));
        }
    }
    candidates.sort();

    match format {
        crate::OutputFormat::Text => {
            if candidates.is_empty() {
                println!("no candidates found in {}", dir.display());
            }
            for (identifier, type_id) in &candidates {
                println!("{identifier} -> {type_id}");
            }
        }
        crate::OutputFormat::Json => {
            let report: Vec<_> = candidates
                .iter()
                .map(|(identifier, type_id)| serde_json::json!({ "identifier": identifier, "typeId": type_id }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "discover_types_tests.rs"]
mod tests;
