// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes a single rule action (§4.6 step 3c). Every variant's failure
//! is non-fatal to the rule: the caller logs and continues with the
//! next action (§7 `ExecutionError`, §8 "a failing action does not
//! prevent later actions").

use serde_json::{json, Value};
use thiserror::Error;

use junction_bus::{BusError, EventBus};
use junction_connector::DispatchError;
use junction_core::{Action, ConnectorId, Event, Operation};
use junction_registry::ConnectorRegistry;

use crate::template;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("connector `{0}` not found")]
    ConnectorNotFound(String),
    #[error("connector `{connector}` exposes no capability supporting operation `{operation}`")]
    NoCapability { connector: String, operation: String },
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Parses the free-form operation name carried by `Action::Execute`
/// against the closed [`Operation`] set (§6's client API uses string ids
/// throughout; this is the one place a string must become a typed verb).
fn parse_operation(name: &str) -> Option<Operation> {
    match name {
        "read" => Some(Operation::Read),
        "write" => Some(Operation::Write),
        "subscribe" => Some(Operation::Subscribe),
        "list" => Some(Operation::List),
        "trigger" => Some(Operation::Trigger),
        "send" => Some(Operation::Send),
        "get" => Some(Operation::Get),
        "publish" => Some(Operation::Publish),
        _ => None,
    }
}

/// Resolves `channel` to an instance and dispatches `params` through the
/// first declared capability supporting `operation` — the convention
/// §6's glossary describes for notification channels ("just connectors
/// exposing a capability whose operation `send` takes
/// `{message, priority, metadata}`") generalised to any operation.
async fn dispatch_to_channel(
    registry: &ConnectorRegistry,
    channel: &str,
    operation: Operation,
    params: Value,
) -> Result<(), ActionError> {
    let instance = registry
        .instance(ConnectorId::from_string(channel))
        .ok_or_else(|| ActionError::ConnectorNotFound(channel.to_string()))?;
    let capability_id = instance
        .capabilities()
        .iter()
        .find(|c| c.supports(operation))
        .map(|c| c.id.clone())
        .ok_or_else(|| ActionError::NoCapability {
            connector: channel.to_string(),
            operation: operation.to_string(),
        })?;
    instance.execute_with_timeout(&capability_id, operation, params, None).await?;
    Ok(())
}

pub async fn run(
    action: &Action,
    event: &Event,
    registry: &ConnectorRegistry,
    bus: &EventBus,
) -> Result<(), ActionError> {
    match action {
        Action::Notify { channels, message } => {
            let rendered = template::render(message, event);
            for channel in channels {
                let params = json!({
                    "message": rendered,
                    "priority": event.priority.to_string(),
                    "metadata": event.metadata,
                });
                dispatch_to_channel(registry, channel, Operation::Send, params).await?;
            }
            Ok(())
        }
        Action::Execute { connector_id, capability, operation, params } => {
            let op = parse_operation(operation).ok_or_else(|| ActionError::UnknownOperation(operation.clone()))?;
            let instance = registry
                .instance(ConnectorId::from_string(connector_id))
                .ok_or_else(|| ActionError::ConnectorNotFound(connector_id.clone()))?;
            instance.execute_with_timeout(capability, op, params.clone(), None).await?;
            Ok(())
        }
        Action::Record { channel, payload } => {
            dispatch_to_channel(registry, channel, Operation::Write, payload.clone()).await
        }
        Action::Escalate { priority } => {
            let escalated = Event::new(event.event_type.clone(), event.source.clone())
                .with_priority(*priority)
                .with_data(event.data.clone());
            bus.publish(escalated)?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
