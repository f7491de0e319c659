// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative capability schema (§3) shared by every connector type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Verb a capability supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Write,
    Subscribe,
    List,
    Trigger,
    Send,
    Get,
    Publish,
}

impl Operation {
    /// `true` for operations the dispatcher counts against `messagesSent` (§4.3 step 8).
    pub fn is_producer(self) -> bool {
        matches!(self, Operation::Write | Operation::Publish | Operation::Trigger | Operation::Send)
    }

    /// `true` for operations the dispatcher counts against `messagesReceived` (§4.3 step 8).
    pub fn is_consumer(self) -> bool {
        matches!(self, Operation::Read | Operation::Subscribe | Operation::List | Operation::Get)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Subscribe => "subscribe",
            Operation::List => "list",
            Operation::Trigger => "trigger",
            Operation::Send => "send",
            Operation::Get => "get",
            Operation::Publish => "publish",
        })
    }
}

/// Coarse parameter type tag, checked against the shape of a `serde_json::Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Bool,
    List,
    Object,
}

impl ParamType {
    pub fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Bool => value.is_boolean(),
            ParamType::List => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

/// Declared shape of a single parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
}

impl ParamSpec {
    pub fn required(param_type: ParamType) -> Self {
        Self { param_type, required: true }
    }

    pub fn optional(param_type: ParamType) -> Self {
        Self { param_type, required: false }
    }
}

/// Declarative schema for one capability a connector type exposes (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDef {
    /// Namespaced identifier, e.g. `camera:snapshot`.
    pub id: String,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub data_types: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParamSpec>,
    #[serde(default)]
    pub requires_connection: bool,
}

impl CapabilityDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operations: Vec::new(),
            data_types: Vec::new(),
            events: Vec::new(),
            parameters: IndexMap::new(),
            requires_connection: false,
        }
    }

    pub fn with_operations(mut self, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.operations = ops.into_iter().collect();
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    pub fn requiring_connection(mut self) -> Self {
        self.requires_connection = true;
        self
    }

    pub fn supports(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }
}

/// Immutable registered driver class (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorTypeInfo {
    /// Stable kebab-case identifier.
    pub type_id: String,
    pub version: String,
    pub capabilities: Vec<CapabilityDef>,
}

impl ConnectorTypeInfo {
    pub fn new(type_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self { type_id: type_id.into(), version: version.into(), capabilities: Vec::new() }
    }

    pub fn with_capabilities(mut self, caps: impl IntoIterator<Item = CapabilityDef>) -> Self {
        self.capabilities = caps.into_iter().collect();
        self
    }

    pub fn capability(&self, id: &str) -> Option<&CapabilityDef> {
        self.capabilities.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
