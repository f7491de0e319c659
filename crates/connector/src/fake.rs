// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A recording connector fake used by this crate's own tests and exported
//! under `test-support` for use from other crates' tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use junction_core::{CapabilityDef, ConnectError, DisconnectError, ExecutionError, Operation};

use crate::contract::Connector;

/// One recorded `execute_capability` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub capability: String,
    pub operation: Operation,
    pub params: Value,
}

struct State {
    calls: Vec<RecordedCall>,
    connect_calls: u32,
    disconnect_calls: u32,
    fail_connect: bool,
    fail_execute: bool,
}

/// Records every call it receives; never does real I/O. Used to test the
/// serial-per-instance and dispatch-gating invariants (§8).
#[derive(Clone)]
pub struct RecordingConnector {
    state: Arc<Mutex<State>>,
}

impl Default for RecordingConnector {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                calls: Vec::new(),
                connect_calls: 0,
                disconnect_calls: 0,
                fail_connect: false,
                fail_execute: false,
            })),
        }
    }
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_connect() -> Self {
        let c = Self::default();
        c.state.lock().fail_connect = true;
        c
    }

    pub fn failing_execute() -> Self {
        let c = Self::default();
        c.state.lock().fail_execute = true;
        c
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn connect_calls(&self) -> u32 {
        self.state.lock().connect_calls
    }

    pub fn disconnect_calls(&self) -> u32 {
        self.state.lock().disconnect_calls
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn perform_connect(&self) -> Result<(), ConnectError> {
        let mut state = self.state.lock();
        state.connect_calls += 1;
        if state.fail_connect {
            return Err(ConnectError { connector_id: "fake".into(), reason: "forced failure".into() });
        }
        Ok(())
    }

    async fn perform_disconnect(&self) -> Result<(), DisconnectError> {
        self.state.lock().disconnect_calls += 1;
        Ok(())
    }

    async fn execute_capability(
        &self,
        capability: &CapabilityDef,
        operation: Operation,
        params: Value,
    ) -> Result<Value, ExecutionError> {
        let mut state = self.state.lock();
        if state.fail_execute {
            return Err(ExecutionError {
                connector_id: "fake".into(),
                capability: capability.id.clone(),
                reason: "forced failure".into(),
            });
        }
        state.calls.push(RecordedCall { capability: capability.id.clone(), operation, params: params.clone() });
        Ok(params)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
