// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory table set behind `MemStore`'s single writer lock (§4.5):
//! `alarm_rules`/`alarm_conditions`/`alarm_actions` collapse to one
//! `Rule` per row (conditions/actions are inline `Vec`s on the struct,
//! not separate maps — they are always mutated together transactionally
//! so splitting them into separate `IndexMap`s would buy nothing), plus
//! `alarm_history` and `alarm_acknowledgments`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use junction_core::{Action, AlarmHistoryEntry, Category, Condition, Priority, Rule, RuleId};

/// Partial update applied to an existing rule (§6's `updateRule`).
/// `None` fields are left unchanged; unknown keys are rejected by the
/// caller (a JSON deserializer), not by this struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Option<Category>>,
    pub enabled: Option<bool>,
    pub conditions: Option<Vec<Condition>>,
    pub actions: Option<Vec<Action>>,
    pub cooldown_secs: Option<u64>,
}

impl RuleUpdate {
    pub fn apply(self, rule: &mut Rule, now: u64) {
        if let Some(name) = self.name {
            rule.name = name;
        }
        if let Some(description) = self.description {
            rule.description = description;
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }
        if let Some(category) = self.category {
            rule.category = category;
        }
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
        if let Some(conditions) = self.conditions {
            rule.conditions = conditions;
        }
        if let Some(actions) = self.actions {
            rule.actions = actions;
        }
        if let Some(cooldown_secs) = self.cooldown_secs {
            rule.cooldown_secs = cooldown_secs;
        }
        rule.updated_at = now;
    }
}

/// Conjunctive filter over `alarm_history` (§6's `getAlarmHistory`).
#[derive(Debug, Clone, Default)]
pub struct AlarmHistoryFilter {
    pub rule_id: Option<RuleId>,
    pub event_type: Option<String>,
    pub status: Option<junction_core::AlarmStatus>,
}

impl AlarmHistoryFilter {
    pub fn matches(&self, entry: &AlarmHistoryEntry) -> bool {
        if let Some(rule_id) = self.rule_id {
            if entry.rule_id != rule_id {
                return false;
            }
        }
        if let Some(event_type) = &self.event_type {
            if &entry.event_type != event_type {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        true
    }
}

/// Counts returned by `getStats` (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub rule_count: usize,
    pub enabled_rule_count: usize,
    pub alarm_count: usize,
    pub active_alarm_count: usize,
}

/// The durable tables. `IndexMap` preserves insertion order so snapshots
/// and listings are reproducible across a reload.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreTables {
    pub rules: IndexMap<RuleId, Rule>,
    pub alarm_history: IndexMap<junction_core::AlarmId, AlarmHistoryEntry>,
    pub acknowledgments: Vec<junction_core::Acknowledgment>,
}

impl StoreTables {
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            rule_count: self.rules.len(),
            enabled_rule_count: self.rules.values().filter(|r| r.enabled).count(),
            alarm_count: self.alarm_history.len(),
            active_alarm_count: self
                .alarm_history
                .values()
                .filter(|a| a.status == junction_core::AlarmStatus::Active)
                .count(),
        }
    }
}
