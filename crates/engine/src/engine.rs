// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RuleEngine`: subscribes to the bus with a wildcard and evaluates
//! every enabled rule against every event (§4.6).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use junction_bus::{handler, EventBus, SubscriptionToken};
use junction_core::{AlarmHistoryEntry, AlarmId, Clock, Event, Rule, RuleId, SystemClock, SYSTEM_SOURCE};
use junction_registry::ConnectorRegistry;
use junction_store::{RuleStore, StoreError};

use crate::action;

/// Evaluates enabled rules against every bus event and drives their
/// ordered action lists (§4.6). Generic over [`Clock`] so cooldowns are
/// deterministically testable; production code uses [`SystemClock`].
pub struct RuleEngine<C = SystemClock> {
    bus: EventBus,
    store: Arc<dyn RuleStore>,
    registry: ConnectorRegistry,
    clock: C,
    last_triggered: Mutex<HashMap<RuleId, Instant>>,
}

impl RuleEngine<SystemClock> {
    pub fn new(bus: EventBus, store: Arc<dyn RuleStore>, registry: ConnectorRegistry) -> Self {
        Self::with_clock(bus, store, registry, SystemClock)
    }
}

impl<C: Clock + 'static> RuleEngine<C> {
    pub fn with_clock(bus: EventBus, store: Arc<dyn RuleStore>, registry: ConnectorRegistry, clock: C) -> Self {
        Self { bus, store, registry, clock, last_triggered: Mutex::new(HashMap::new()) }
    }

    /// Subscribes to the bus with a wildcard pattern; evaluation then
    /// runs inside the bus's own worker pool (§5), so a slow rule never
    /// blocks a publisher.
    pub fn spawn(self: Arc<Self>) -> SubscriptionToken {
        self.bus.subscribe(
            "*",
            handler({
                let engine = self.clone();
                move |event| {
                    let engine = engine.clone();
                    async move { engine.handle_event(event).await }
                }
            }),
        )
    }

    async fn handle_event(&self, event: Event) {
        let rules = match self.store.get_enabled().await {
            Ok(rules) => rules,
            Err(err) => {
                tracing::warn!(error = %err, "rule store unavailable, skipping evaluation for this event");
                return;
            }
        };
        for rule in &rules {
            if rule.conditions.iter().all(|condition| condition.matches(&event)) {
                self.fire(rule, &event).await;
            }
        }
    }

    /// §4.6 step 3a: a rule that fired within its cooldown window is skipped.
    fn on_cooldown(&self, rule: &Rule) -> bool {
        if rule.cooldown_secs == 0 {
            return false;
        }
        match self.last_triggered.lock().get(&rule.id) {
            Some(last) => self.clock.now().duration_since(*last) < Duration::from_secs(rule.cooldown_secs),
            None => false,
        }
    }

    async fn fire(&self, rule: &Rule, event: &Event) {
        if self.on_cooldown(rule) {
            return;
        }
        self.last_triggered.lock().insert(rule.id, self.clock.now());

        let entry = match self
            .store
            .record_alarm_trigger(
                rule.id,
                event.event_type.clone(),
                event.source.clone(),
                event.data.clone(),
                self.clock.epoch_ms(),
            )
            .await
        {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, rule = %rule.id, "failed to record alarm trigger");
                return;
            }
        };

        for action in &rule.actions {
            if let Err(err) = action::run(action, event, &self.registry, &self.bus).await {
                tracing::warn!(error = %err, rule = %rule.id, action = action.kind(), "rule action failed");
            }
        }

        let _ = self.bus.publish(
            Event::new("alarm:triggered", SYSTEM_SOURCE)
                .with_data(serde_json::json!({ "alarmId": entry.id.to_string(), "ruleId": rule.id.to_string() })),
        );
    }

    /// Out-of-band acknowledgement (§4.6): moves `active` → `acknowledged`
    /// and publishes `alarm:acknowledged`.
    pub async fn acknowledge_alarm(
        &self,
        alarm_id: AlarmId,
        user_id: String,
        notes: String,
    ) -> Result<AlarmHistoryEntry, StoreError> {
        let now = self.clock.epoch_ms();
        let entry = self.store.acknowledge_alarm(alarm_id, user_id, notes, now).await?;
        let _ = self
            .bus
            .publish(Event::new("alarm:acknowledged", SYSTEM_SOURCE).with_data(serde_json::json!({ "alarmId": alarm_id.to_string() })));
        Ok(entry)
    }

    /// Out-of-band resolution (§4.6): sets `resolvedAt`/status `resolved`
    /// and publishes `alarm:resolved`.
    pub async fn resolve_alarm(&self, alarm_id: AlarmId) -> Result<AlarmHistoryEntry, StoreError> {
        let now = self.clock.epoch_ms();
        let entry = self.store.resolve_alarm(alarm_id, now).await?;
        let _ = self
            .bus
            .publish(Event::new("alarm:resolved", SYSTEM_SOURCE).with_data(serde_json::json!({ "alarmId": alarm_id.to_string() })));
        Ok(entry)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
