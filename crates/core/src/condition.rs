// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared condition/filter operators (§4.7), used by both bus filter
//! subscriptions and rule conditions so there is exactly one
//! implementation of each operator.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::event::{Event, Priority};

/// Operator applied when comparing a field value against a condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Equals,
    Contains,
    Min,
    Max,
    In,
}

/// Evaluate `operator` between an observed JSON value and a condition value.
///
/// `Min`/`Max` coerce both sides to `f64`; a non-numeric observed value
/// never satisfies a `Min`/`Max` condition. `In` expects `value` to be a
/// JSON array and checks membership by value equality.
pub fn evaluate(operator: Operator, observed: &serde_json::Value, value: &serde_json::Value) -> bool {
    match operator {
        Operator::Equals => observed == value,
        Operator::Contains => match (observed.as_str(), value.as_str()) {
            (Some(o), Some(v)) => o.contains(v),
            _ => false,
        },
        Operator::Min => match (observed.as_f64(), value.as_f64()) {
            (Some(o), Some(v)) => o >= v,
            _ => false,
        },
        Operator::Max => match (observed.as_f64(), value.as_f64()) {
            (Some(o), Some(v)) => o <= v,
            _ => false,
        },
        Operator::In => match value.as_array() {
            Some(items) => items.iter().any(|item| item == observed),
            None => false,
        },
    }
}

/// Resolves a rule condition's field name (`eventType`, `source`,
/// `priority`, `category`, or a `data.`-prefixed path) against an event
/// (§4.6 step 2). Unknown field names resolve to `null`, which never
/// satisfies anything but `In`/`Equals` against an explicit `null`.
pub fn resolve_field(field: &str, event: &Event) -> serde_json::Value {
    match field {
        "eventType" | "type" => serde_json::Value::String(event.event_type.clone()),
        "source" => serde_json::Value::String(event.source.clone()),
        "priority" => serde_json::Value::String(event.priority.to_string()),
        "category" => serde_json::Value::String(event.category.to_string()),
        _ => field
            .strip_prefix("data.")
            .and_then(|path| event.data_path(path))
            .cloned()
            .unwrap_or(serde_json::Value::Null),
    }
}

/// A single `path -> {operator, value}` predicate against `event.data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPredicate {
    pub operator: Operator,
    pub value: serde_json::Value,
}

/// Conjunctive set of optional predicates over an event (§4.7).
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<HashSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<HashSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<HashSet<Priority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<HashMap<String, DataPredicate>>,
}

impl Filter {
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(types) = &self.event_type {
            let hit = types
                .iter()
                .any(|t| event.event_type == *t || event.event_type.contains(t.as_str()));
            if !hit {
                return false;
            }
        }
        if let Some(sources) = &self.source {
            if !sources.contains(&event.source) {
                return false;
            }
        }
        if let Some(priorities) = &self.priority {
            if !priorities.contains(&event.priority) {
                return false;
            }
        }
        if let Some(paths) = &self.data_path {
            for (path, predicate) in paths {
                let observed = event.data_path(path).cloned().unwrap_or(serde_json::Value::Null);
                if !evaluate(predicate.operator, &observed, &predicate.value) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
