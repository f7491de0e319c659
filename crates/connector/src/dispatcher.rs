// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability dispatcher (§4.3): the only path into connector
//! behaviour. Validates, invokes, classifies, and records stats.

use serde_json::Value;
use thiserror::Error;

use junction_core::{
    CapabilityError, ConnectorStatus, ConnectorTypeInfo, ExecutionError, InstanceInfo,
    LifecycleError, Operation, ParamType, ParameterError,
};

use crate::contract::Connector;

/// Everything that can go wrong before or during a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Timeout(#[from] junction_core::TimeoutError),
}

/// Result of a successful dispatch, carrying the info the caller needs to
/// decide which lifecycle events to publish (§4.3 steps 8-9).
pub struct DispatchOutcome {
    pub result: Value,
    pub operation: Operation,
}

/// Runs the 9-step dispatch contract against one connector instance.
///
/// `info` and `connector` are passed separately rather than bundled so
/// callers can hold the stats lock only as long as needed; `dispatch`
/// itself does not lock anything — serialization is the caller's job
/// (`ConnectorInstance` holds the per-instance mutex).
pub async fn dispatch(
    type_info: &ConnectorTypeInfo,
    info: &mut InstanceInfo,
    connector: &dyn Connector,
    capability_id: &str,
    operation: Operation,
    params: Value,
    now: u64,
) -> Result<DispatchOutcome, DispatchError> {
    // 1. capability must be declared by the type.
    let capability = type_info
        .capability(capability_id)
        .ok_or_else(|| CapabilityError::Unknown(capability_id.to_string()))?;

    // 2. capability must be enabled on the instance.
    if !info.capability_enabled(capability_id) {
        return Err(CapabilityError::Disabled(capability_id.to_string()).into());
    }

    // 3. operation must be declared by the capability.
    if !capability.supports(operation) {
        return Err(CapabilityError::UnsupportedOperation {
            capability: capability_id.to_string(),
            operation: operation.to_string(),
        }
        .into());
    }

    // 4. connection precondition.
    if capability.requires_connection && info.status != ConnectorStatus::Connected {
        return Err(LifecycleError::NotConnected(info.id.to_string()).into());
    }

    // 5. parameter schema validation.
    validate_params(&capability.parameters, &params)?;

    // 6. mark activity before invoking the type-specific implementation.
    info.stats.last_activity = Some(now);

    // 7. invoke.
    match connector.execute_capability(capability, operation, params).await {
        Ok(result) => {
            // 8. classify and count.
            if operation.is_producer() {
                info.stats.messages_sent += 1;
            }
            if operation.is_consumer() {
                info.stats.messages_received += 1;
            }
            Ok(DispatchOutcome { result, operation })
        }
        Err(err) => {
            // 9. record failure, propagate.
            info.stats.errors += 1;
            info.last_error = Some(err.to_string());
            Err(err.into())
        }
    }
}

fn validate_params(
    schema: &indexmap::IndexMap<String, junction_core::ParamSpec>,
    params: &Value,
) -> Result<(), ParameterError> {
    for (name, spec) in schema {
        match params.get(name) {
            Some(value) => {
                if !spec.param_type.matches(value) {
                    return Err(ParameterError::WrongType {
                        name: name.clone(),
                        expected: param_type_name(spec.param_type).to_string(),
                    });
                }
            }
            None if spec.required => return Err(ParameterError::Missing(name.clone())),
            None => {}
        }
    }
    Ok(())
}

fn param_type_name(t: ParamType) -> &'static str {
    match t {
        ParamType::String => "string",
        ParamType::Number => "number",
        ParamType::Bool => "bool",
        ParamType::List => "list",
        ParamType::Object => "object",
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
