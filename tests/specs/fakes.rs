// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles specific to the workspace-level spec suite — narrower
//! than `junction-testkit`'s `RecordingConnector` because each needs a
//! behaviour (blocking overlap detection, scripted connect failures)
//! that fake doesn't model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use junction_connector::Connector;
use junction_core::{CapabilityDef, ConnectError, DisconnectError, ExecutionError, Operation};

/// Detects overlapping `execute_capability` calls: increments a counter
/// on entry, asserts it never exceeds 1, sleeps briefly, decrements on
/// exit. Used to verify per-instance serialization (§8).
#[derive(Clone, Default)]
pub struct SlowConnector {
    concurrent: Arc<AtomicUsize>,
    max_observed: Arc<AtomicUsize>,
}

impl SlowConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_observed_concurrency(&self) -> usize {
        self.max_observed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for SlowConnector {
    async fn perform_connect(&self) -> Result<(), ConnectError> {
        Ok(())
    }

    async fn perform_disconnect(&self) -> Result<(), DisconnectError> {
        Ok(())
    }

    async fn execute_capability(
        &self,
        _capability: &CapabilityDef,
        _operation: Operation,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ExecutionError> {
        let in_flight = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_observed.fetch_max(in_flight, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        self.concurrent.fetch_sub(1, Ordering::SeqCst);
        Ok(params)
    }
}

/// Fails `perform_connect` until the `succeed_after`-th attempt, then
/// succeeds on every attempt after that. Models the flaky connector the
/// reconnection scenario (§8 scenario 6) needs.
#[derive(Clone)]
pub struct FlakyConnector {
    attempts: Arc<AtomicUsize>,
    succeed_after: usize,
}

impl FlakyConnector {
    pub fn new(succeed_after: usize) -> Self {
        Self { attempts: Arc::new(AtomicUsize::new(0)), succeed_after }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FlakyConnector {
    async fn perform_connect(&self) -> Result<(), ConnectError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt < self.succeed_after {
            return Err(ConnectError { connector_id: "flaky".into(), reason: "not yet".into() });
        }
        Ok(())
    }

    async fn perform_disconnect(&self) -> Result<(), DisconnectError> {
        Ok(())
    }

    async fn execute_capability(
        &self,
        capability: &CapabilityDef,
        _operation: Operation,
        _params: serde_json::Value,
    ) -> Result<serde_json::Value, ExecutionError> {
        Err(ExecutionError {
            connector_id: "flaky".into(),
            capability: capability.id.clone(),
            reason: "not implemented".into(),
        })
    }
}
