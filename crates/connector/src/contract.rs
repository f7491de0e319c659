// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connector contract (§4.2). Every connector type implements the
//! three `perform*` primitives; everything else — lifecycle state,
//! serialization, event emission, capability gating — is common and
//! lives in [`crate::instance::ConnectorInstance`].

use async_trait::async_trait;
use serde_json::Value;

use junction_core::{CapabilityDef, ConnectError, DisconnectError, ExecutionError, Operation};

/// Type-specific behaviour a connector implements.
///
/// Implementors are wrapped in a [`crate::instance::ConnectorInstance`],
/// which is the only thing the rest of the system talks to.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establish the underlying connection (socket, poll loop, session, …).
    async fn perform_connect(&self) -> Result<(), ConnectError>;

    /// Tear down the underlying connection. Must be safe to call even if
    /// `perform_connect` partially failed.
    async fn perform_disconnect(&self) -> Result<(), DisconnectError>;

    /// Execute a capability operation. Only reached after the dispatcher
    /// (§4.3) has validated the capability, operation, and parameters.
    async fn execute_capability(
        &self,
        capability: &CapabilityDef,
        operation: Operation,
        params: Value,
    ) -> Result<Value, ExecutionError>;

    /// Called after a successful connect. No-op by default.
    async fn on_connect(&self) {}

    /// Called after a successful disconnect. No-op by default.
    async fn on_disconnect(&self) {}

    /// Called when a connect/disconnect/execute attempt fails. No-op by default.
    async fn on_error(&self, _error: &str) {}
}

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;
