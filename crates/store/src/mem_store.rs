// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `MemStore`: the shipped [`crate::RuleStore`] implementation. A single
//! `parking_lot::Mutex<StoreTables>` is the "single-writer lock" (§5);
//! an independent `RwLock`-guarded cache of enabled rules serves the
//! Rule Engine's hot-path reads and is invalidated on every mutation.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use junction_core::{Acknowledgment, AckId, AlarmHistoryEntry, AlarmId, Category, Rule, RuleId};

use crate::error::StoreError;
use crate::tables::{AlarmHistoryFilter, RuleUpdate, StoreStats, StoreTables};
use crate::{persistence, RuleStore};

pub struct MemStore {
    tables: Mutex<StoreTables>,
    enabled_cache: RwLock<Option<Vec<Rule>>>,
    snapshot_path: Option<PathBuf>,
}

impl MemStore {
    pub fn new() -> Self {
        Self { tables: Mutex::new(StoreTables::default()), enabled_cache: RwLock::new(None), snapshot_path: None }
    }

    /// Loads existing state from `path` if present, and snapshots the
    /// whole table set to it after every mutating call.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let tables = persistence::load(&path)?;
        Ok(Self { tables: Mutex::new(tables), enabled_cache: RwLock::new(None), snapshot_path: Some(path) })
    }

    fn invalidate_cache(&self) {
        *self.enabled_cache.write() = None;
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else { return Ok(()) };
        let tables = self.tables.lock().clone();
        persistence::save(path, &tables)
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleStore for MemStore {
    async fn create_rule(&self, rule: Rule) -> Result<Rule, StoreError> {
        {
            let mut tables = self.tables.lock();
            tables.rules.insert(rule.id, rule.clone());
        }
        self.invalidate_cache();
        self.persist()?;
        Ok(rule)
    }

    async fn update_rule(&self, id: RuleId, updates: RuleUpdate, now: u64) -> Result<Rule, StoreError> {
        let updated = {
            let mut tables = self.tables.lock();
            let rule = tables.rules.get_mut(&id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            updates.apply(rule, now);
            rule.clone()
        };
        self.invalidate_cache();
        self.persist()?;
        Ok(updated)
    }

    async fn delete_rule(&self, id: RuleId) -> Result<(), StoreError> {
        {
            let mut tables = self.tables.lock();
            tables.rules.shift_remove(&id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        }
        self.invalidate_cache();
        self.persist()?;
        Ok(())
    }

    async fn get_rule(&self, id: RuleId) -> Result<Option<Rule>, StoreError> {
        Ok(self.tables.lock().rules.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Rule>, StoreError> {
        Ok(self.tables.lock().rules.values().cloned().collect())
    }

    async fn get_by_category(&self, category: Category) -> Result<Vec<Rule>, StoreError> {
        Ok(self
            .tables
            .lock()
            .rules
            .values()
            .filter(|r| r.category == Some(category))
            .cloned()
            .collect())
    }

    async fn get_enabled(&self) -> Result<Vec<Rule>, StoreError> {
        if let Some(cached) = self.enabled_cache.read().clone() {
            return Ok(cached);
        }
        let enabled: Vec<Rule> = self.tables.lock().rules.values().filter(|r| r.enabled).cloned().collect();
        *self.enabled_cache.write() = Some(enabled.clone());
        Ok(enabled)
    }

    async fn record_alarm_trigger(
        &self,
        rule_id: RuleId,
        event_type: String,
        event_source: String,
        event_data: serde_json::Value,
        triggered_at: u64,
    ) -> Result<AlarmHistoryEntry, StoreError> {
        let entry = AlarmHistoryEntry::new(
            AlarmId::new(),
            rule_id,
            event_type,
            event_source,
            event_data,
            triggered_at,
        );
        self.tables.lock().alarm_history.insert(entry.id, entry.clone());
        self.persist()?;
        Ok(entry)
    }

    async fn acknowledge_alarm(
        &self,
        alarm_id: AlarmId,
        user_id: String,
        notes: String,
        now: u64,
    ) -> Result<AlarmHistoryEntry, StoreError> {
        let entry = {
            let mut tables = self.tables.lock();
            let alarm = tables
                .alarm_history
                .get_mut(&alarm_id)
                .ok_or_else(|| StoreError::AlarmNotFound(alarm_id.to_string()))?;
            alarm.acknowledge();
            let snapshot = alarm.clone();
            tables.acknowledgments.push(Acknowledgment { id: AckId::new(), alarm_id, user_id, acknowledged_at: now, notes });
            snapshot
        };
        self.persist()?;
        Ok(entry)
    }

    async fn resolve_alarm(&self, alarm_id: AlarmId, now: u64) -> Result<AlarmHistoryEntry, StoreError> {
        let entry = {
            let mut tables = self.tables.lock();
            let alarm = tables
                .alarm_history
                .get_mut(&alarm_id)
                .ok_or_else(|| StoreError::AlarmNotFound(alarm_id.to_string()))?;
            alarm.resolve(now);
            alarm.clone()
        };
        self.persist()?;
        Ok(entry)
    }

    async fn get_alarm_history(
        &self,
        filter: AlarmHistoryFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AlarmHistoryEntry>, StoreError> {
        Ok(self
            .tables
            .lock()
            .alarm_history
            .values()
            .rev()
            .filter(|entry| filter.matches(entry))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        Ok(self.tables.lock().stats())
    }
}

#[cfg(test)]
#[path = "mem_store_tests.rs"]
mod tests;
