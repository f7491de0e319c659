// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! junction-store: the persistent rule store (§4.5) — `alarm_rules`,
//! `alarm_conditions`, `alarm_actions`, `alarm_history`, and
//! `alarm_acknowledgments`, behind a pluggable [`RuleStore`] trait.
//!
//! Ships one concrete implementation, [`MemStore`]: an in-memory table
//! set guarded by a single writer lock, with an independent read-mostly
//! cache of enabled rules invalidated on every mutation, optionally
//! snapshotted to a newline-delimited-JSON file on disk (§6's
//! "file-backed key-value" option).

mod error;
mod mem_store;
mod persistence;
mod tables;

pub use error::StoreError;
pub use mem_store::MemStore;
pub use tables::{AlarmHistoryFilter, RuleUpdate, StoreStats};

use async_trait::async_trait;
use junction_core::{AlarmHistoryEntry, AlarmId, Category, Rule, RuleId};

/// Client API a rule store exposes (§6). The concrete engine behind it
/// is pluggable — file-backed key-value, embedded SQL, or (as shipped
/// here) an in-memory table set.
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn create_rule(&self, rule: Rule) -> Result<Rule, StoreError>;
    async fn update_rule(&self, id: RuleId, updates: RuleUpdate, now: u64) -> Result<Rule, StoreError>;
    async fn delete_rule(&self, id: RuleId) -> Result<(), StoreError>;
    async fn get_rule(&self, id: RuleId) -> Result<Option<Rule>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Rule>, StoreError>;
    async fn get_by_category(&self, category: Category) -> Result<Vec<Rule>, StoreError>;
    /// Hot-path read, served from the enabled-rules cache (§4.5).
    async fn get_enabled(&self) -> Result<Vec<Rule>, StoreError>;

    /// Appends an `alarm_history` row with status `active` (§4.6 step 3b).
    async fn record_alarm_trigger(
        &self,
        rule_id: RuleId,
        event_type: String,
        event_source: String,
        event_data: serde_json::Value,
        triggered_at: u64,
    ) -> Result<AlarmHistoryEntry, StoreError>;

    /// `active` → `acknowledged`; records an `alarm_acknowledgments` row.
    async fn acknowledge_alarm(
        &self,
        alarm_id: AlarmId,
        user_id: String,
        notes: String,
        now: u64,
    ) -> Result<AlarmHistoryEntry, StoreError>;

    /// Sets `resolved_at` and status `resolved`.
    async fn resolve_alarm(&self, alarm_id: AlarmId, now: u64) -> Result<AlarmHistoryEntry, StoreError>;

    async fn get_alarm_history(
        &self,
        filter: AlarmHistoryFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AlarmHistoryEntry>, StoreError>;

    async fn get_stats(&self) -> Result<StoreStats, StoreError>;
}
