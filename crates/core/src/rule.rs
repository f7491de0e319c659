// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent rule schema (§3, §4.5/§4.6): a predicate over events plus
//! an ordered action list.

use serde::{Deserialize, Serialize};

use crate::condition::{self, Operator};
use crate::event::{Category, Event, Priority};
use crate::ids::RuleId;

/// A single `{field} operator value` predicate. Unlike `condition::Filter`
/// (a set-oriented bus subscription filter), a rule condition names one
/// event field explicitly so it can be persisted as a flat row
/// (`alarm_conditions`, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Field path: `eventType`, `source`, `priority`, or a `data.`-prefixed path.
    #[serde(rename = "type")]
    pub field: String,
    pub operator: Operator,
    pub value: serde_json::Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: serde_json::Value) -> Self {
        Self { field: field.into(), operator, value }
    }

    /// Evaluates this single predicate against an event (§4.6 step 2).
    pub fn matches(&self, event: &Event) -> bool {
        let observed = condition::resolve_field(&self.field, event);
        condition::evaluate(self.operator, &observed, &self.value)
    }
}

/// An ordered step a rule takes once its conditions match (§4.6 step 3c).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "lowercase")]
pub enum Action {
    Notify { channels: Vec<String>, message: String },
    Execute { connector_id: String, capability: String, operation: String, params: serde_json::Value },
    Record { channel: String, payload: serde_json::Value },
    Escalate { priority: Priority },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Notify { .. } => "notify",
            Action::Execute { .. } => "execute",
            Action::Record { .. } => "record",
            Action::Escalate { .. } => "escalate",
        }
    }
}

/// Persistent, uniquely identified rule (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Seconds; a rule that fired less than this long ago is skipped (§4.6 step 3a).
    #[serde(default)]
    pub cooldown_secs: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

fn default_enabled() -> bool {
    true
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl Rule {
    pub fn new(id: RuleId, name: impl Into<String>, now: u64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            priority: Priority::Normal,
            category: None,
            enabled: true,
            conditions: Vec::new(),
            actions: Vec::new(),
            cooldown_secs: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_cooldown_secs(mut self, secs: u64) -> Self {
        self.cooldown_secs = secs;
        self
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
