// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only alarm history (§3, §4.5).

use serde::{Deserialize, Serialize};

use crate::ids::{AckId, AlarmId, RuleId};

/// Lifecycle state of an `AlarmHistoryEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    Active,
    Acknowledged,
    Resolved,
}

/// One row in `alarm_history`: created when a rule fires, mutated only
/// by acknowledgement/resolution (§3). Never deleted by normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmHistoryEntry {
    pub id: AlarmId,
    pub rule_id: RuleId,
    pub event_type: String,
    pub event_source: String,
    /// Serialised `event.data` at the time of firing.
    pub event_data: serde_json::Value,
    pub triggered_at: u64,
    pub resolved_at: Option<u64>,
    pub status: AlarmStatus,
}

impl AlarmHistoryEntry {
    pub fn new(
        id: AlarmId,
        rule_id: RuleId,
        event_type: impl Into<String>,
        event_source: impl Into<String>,
        event_data: serde_json::Value,
        triggered_at: u64,
    ) -> Self {
        Self {
            id,
            rule_id,
            event_type: event_type.into(),
            event_source: event_source.into(),
            event_data,
            triggered_at,
            resolved_at: None,
            status: AlarmStatus::Active,
        }
    }

    pub fn acknowledge(&mut self) {
        if self.status == AlarmStatus::Active {
            self.status = AlarmStatus::Acknowledged;
        }
    }

    pub fn resolve(&mut self, now: u64) {
        self.status = AlarmStatus::Resolved;
        self.resolved_at = Some(now);
    }
}

/// One entry in `alarm_acknowledgments`: an audited acknowledgement of
/// an alarm by an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub id: AckId,
    pub alarm_id: AlarmId,
    pub user_id: String,
    pub acknowledged_at: u64,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
#[path = "alarm_tests.rs"]
mod tests;
