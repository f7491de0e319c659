// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ConnectorInstance`: wraps a [`Connector`] with the lifecycle state
//! machine, per-instance serialization, and event emission common to
//! every connector (§4.2, §4.4).

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex as SyncMutex;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use junction_core::{
    ConnectorTypeInfo, Event, InstanceInfo, LifecycleError, Operation,
};

use crate::contract::Connector;
use crate::dispatcher::{self, DispatchError};

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// A live connector instance: the type-specific [`Connector`] plus the
/// shared attributes and concurrency control the registry and
/// dispatcher rely on.
pub struct ConnectorInstance {
    type_info: Arc<ConnectorTypeInfo>,
    connector: Arc<dyn Connector>,
    info: SyncMutex<InstanceInfo>,
    /// Serializes lifecycle transitions and `execute` calls per instance (§5).
    serialize: AsyncMutex<()>,
    events: mpsc::Sender<Event>,
}

impl ConnectorInstance {
    pub fn new(
        type_info: Arc<ConnectorTypeInfo>,
        connector: Arc<dyn Connector>,
        info: InstanceInfo,
        events: mpsc::Sender<Event>,
    ) -> Self {
        Self { type_info, connector, info: SyncMutex::new(info), serialize: AsyncMutex::new(()), events }
    }

    pub fn status(&self) -> InstanceInfo {
        self.info.lock().clone()
    }

    pub fn capabilities(&self) -> &[junction_core::CapabilityDef] {
        &self.type_info.capabilities
    }

    fn emit(&self, event_type: &str, data: Value) {
        let id = self.info.lock().id;
        let event = Event::new(event_type, id.to_string()).with_data(data);
        let _ = self.events.try_send(event);
    }

    /// `connect()` — idempotent, serialized per instance (§4.4).
    pub async fn connect(&self) -> Result<(), LifecycleError> {
        let _guard = self.serialize.lock().await;
        if self.info.lock().status.is_connect_noop() {
            return Ok(());
        }
        self.info.lock().status = junction_core::ConnectorStatus::Connecting;
        match self.connector.perform_connect().await {
            Ok(()) => {
                let now = now_ms();
                {
                    let mut info = self.info.lock();
                    info.status = junction_core::ConnectorStatus::Connected;
                    info.last_connected = Some(now);
                    info.last_attempt_at = Some(now);
                    info.connection_attempts = 0;
                }
                self.connector.on_connect().await;
                self.emit("connected", Value::Null);
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                {
                    let mut info = self.info.lock();
                    // §4.4's state diagram routes a failed connect through
                    // Error, not back to Disconnected — that's what lets the
                    // Supervisor's backoff loop find and retry it.
                    info.status = junction_core::ConnectorStatus::Error;
                    info.connection_attempts += 1;
                    info.last_attempt_at = Some(now_ms());
                    info.last_error = Some(reason.clone());
                }
                self.connector.on_error(&reason).await;
                self.emit("connection-error", serde_json::json!({ "reason": reason }));
                Ok(())
            }
        }
    }

    /// `disconnect()` — idempotent, serialized per instance (§4.4).
    pub async fn disconnect(&self) -> Result<(), LifecycleError> {
        let _guard = self.serialize.lock().await;
        if self.info.lock().status.is_disconnect_noop() {
            return Ok(());
        }
        match self.connector.perform_disconnect().await {
            Ok(()) => {
                self.info.lock().status = junction_core::ConnectorStatus::Disconnected;
                self.connector.on_disconnect().await;
                self.emit("disconnected", Value::Null);
            }
            Err(err) => {
                let reason = err.to_string();
                self.info.lock().last_error = Some(reason.clone());
                self.connector.on_error(&reason).await;
                self.emit("connection-error", serde_json::json!({ "reason": reason }));
            }
        }
        Ok(())
    }

    /// `execute(capabilityId, operation, params)` — the only path into
    /// connector behaviour (§4.2), routed through the dispatcher (§4.3).
    pub async fn execute(
        &self,
        capability_id: &str,
        operation: Operation,
        params: Value,
    ) -> Result<Value, DispatchError> {
        let _guard = self.serialize.lock().await;
        let now = now_ms();
        // Clone out rather than hold the sync mutex across the dispatch's
        // await points, then write the mutated copy back under a fresh lock.
        let mut snapshot = self.info.lock().clone();
        let result = dispatcher::dispatch(
            &self.type_info,
            &mut snapshot,
            self.connector.as_ref(),
            capability_id,
            operation,
            params,
            now,
        )
        .await;
        *self.info.lock() = snapshot;

        match &result {
            Ok(outcome) => {
                self.emit(
                    "operation-completed",
                    serde_json::json!({ "capability": capability_id, "operation": outcome.operation.to_string() }),
                );
            }
            Err(err) => {
                self.emit(
                    "operation-error",
                    serde_json::json!({ "capability": capability_id, "error": err.to_string() }),
                );
            }
        }
        result.map(|outcome| outcome.result)
    }

    /// Like [`Self::execute`], but races the dispatch against an optional
    /// deadline (§5 "cancellation & timeouts"). On expiry the in-flight
    /// dispatch future is dropped (aborting any I/O it was awaiting) and
    /// the call returns [`DispatchError::Timeout`].
    pub async fn execute_with_timeout(
        &self,
        capability_id: &str,
        operation: Operation,
        params: Value,
        timeout: Option<std::time::Duration>,
    ) -> Result<Value, DispatchError> {
        let Some(timeout) = timeout else {
            return self.execute(capability_id, operation, params).await;
        };
        let connector_id = self.info.lock().id.to_string();
        match tokio::time::timeout(timeout, self.execute(capability_id, operation, params)).await {
            Ok(result) => result,
            Err(_) => {
                self.info.lock().stats.errors += 1;
                self.emit(
                    "operation-error",
                    serde_json::json!({ "capability": capability_id, "error": "timeout" }),
                );
                Err(DispatchError::Timeout(junction_core::TimeoutError {
                    connector_id,
                    operation: operation.to_string(),
                    elapsed_ms: timeout.as_millis() as u64,
                }))
            }
        }
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
