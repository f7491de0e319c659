// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The normalised event carried by the bus.
//!
//! An event is a small typed header plus an opaque `data` payload whose
//! shape is dictated by `type` — schemas live with the emitting
//! capability's definition, not here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ids::EventId;

/// Severity of an event, derived when not supplied by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        })
    }
}

/// Coarse event family, derived from `type` when not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Aircraft,
    Vehicle,
    System,
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::Security => "security",
            Category::Aircraft => "aircraft",
            Category::Vehicle => "vehicle",
            Category::System => "system",
            Category::General => "general",
        })
    }
}

/// Substrings of `event.type` that identify each category, checked in
/// order — first match wins. Kept as a flat table so the mapping stays
/// auditable; see `DESIGN.md` for the source of these groupings.
const CATEGORY_RULES: &[(&str, Category)] = &[
    ("aircraft", Category::Aircraft),
    ("adsb", Category::Aircraft),
    ("squawk", Category::Aircraft),
    ("aprs", Category::Aircraft),
    ("vehicle", Category::Vehicle),
    ("speed", Category::Vehicle),
    ("plate", Category::Vehicle),
    ("motion", Category::Security),
    ("intrusion", Category::Security),
    ("loitering", Category::Security),
    ("smart-detect", Category::Security),
    ("smartdetect", Category::Security),
    ("person", Category::Security),
    ("camera", Category::Security),
    ("alarm", Category::Security),
    ("connector", Category::System),
    ("system", Category::System),
    ("bus", Category::System),
    ("health", Category::System),
];

/// Derives a category from substrings of the event type. See §3/§9.
pub fn derive_category(event_type: &str) -> Category {
    let lower = event_type.to_ascii_lowercase();
    for (needle, category) in CATEGORY_RULES {
        if lower.contains(needle) {
            return *category;
        }
    }
    Category::General
}

/// Derives a priority from substrings of the event type. See §3.
pub fn derive_priority(event_type: &str) -> Priority {
    let lower = event_type.to_ascii_lowercase();
    if lower.contains("emergency") || lower.contains("squawk") {
        return Priority::Critical;
    }
    if lower.contains("intrusion") || lower.contains("loitering") || lower.contains("speed-violation")
    {
        return Priority::High;
    }
    if lower.contains("motion")
        || lower.contains("smart-detect")
        || lower.contains("smartdetect")
        || lower.contains("vehicle")
        || lower.contains("person")
    {
        return Priority::Normal;
    }
    if lower.contains("connector-status") || lower.contains("system-status") {
        return Priority::Low;
    }
    Priority::Normal
}

/// The producing connector, or the literal string `"system"` for
/// events emitted by the kernel itself.
pub const SYSTEM_SOURCE: &str = "system";

/// The normalised unit carried by the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    /// Milliseconds since the Unix epoch, UTC.
    pub timestamp: u64,
    pub priority: Priority,
    pub category: Category,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Event {
    /// Build a new event, filling `id`/`timestamp`/`category`/`priority`
    /// the way `EventBus::publish` would for a caller that omitted them.
    pub fn new(event_type: impl Into<String>, source: impl Into<String>) -> Self {
        let event_type = event_type.into();
        let category = derive_category(&event_type);
        let priority = derive_priority(&event_type);
        Self {
            id: EventId::new(),
            event_type,
            source: source.into(),
            timestamp: now_ms(),
            priority,
            category,
            data: serde_json::Value::Null,
            metadata: HashMap::new(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Reads a dotted path (`"confidence"`, `"device.name"`) out of `data`.
    pub fn data_path(&self, path: &str) -> Option<&serde_json::Value> {
        let mut cursor = &self.data;
        for segment in path.split('.') {
            cursor = cursor.get(segment)?;
        }
        Some(cursor)
    }
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
