// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connector type auto-discovery (§4.4, §6).

use async_trait::async_trait;

use junction_core::ConnectorTypeInfo;

/// Fixed mapping for known multi-word identifiers (§6), checked before
/// falling back to generic CamelCase-to-kebab-case conversion.
const KNOWN_MAPPINGS: &[(&str, &str)] = &[
    ("UnifiProtect", "unifi-protect"),
    ("WebGui", "web-gui"),
    ("GuiDesigner", "gui-designer"),
    ("ADSB", "adsb"),
    ("APRS", "aprs"),
    ("LLM", "llm"),
    ("AnkkeDvr", "ankke-dvr"),
    ("SpeedDetectionGui", "speed-detection-gui"),
    ("SpeedCalculation", "speed-calculation"),
];

/// Derive a stable kebab-case type identifier from a file or class
/// identifier (§4.4, §6): strip a trailing `Connector`, apply the fixed
/// mapping for known multi-word identifiers, otherwise convert
/// CamelCase to kebab-case.
pub fn derive_type_id(identifier: &str) -> String {
    let stripped = identifier.strip_suffix("Connector").unwrap_or(identifier);
    if let Some((_, kebab)) = KNOWN_MAPPINGS.iter().find(|(camel, _)| *camel == stripped) {
        return kebab.to_string();
    }
    camel_to_kebab(stripped)
}

fn camel_to_kebab(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.char_indices() {
        if ch.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// A candidate connector type discovered on disk, before registration.
#[derive(Debug, Clone)]
pub struct DiscoveredType {
    pub identifier: String,
    pub info: ConnectorTypeInfo,
}

/// Abstracts over where candidate connector types come from, so
/// `auto_discover_types` can be tested without touching the filesystem.
#[async_trait]
pub trait ConnectorTypeSource: Send + Sync {
    async fn discover(&self) -> Vec<DiscoveredType>;
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
