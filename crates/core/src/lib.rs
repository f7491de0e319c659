// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! junction-core: shared types for the heterogeneous integration hub —
//! events, identifiers, the connector instance data model, rules and
//! alarms, error kinds, and the connector configuration file schema.

pub mod alarm;
pub mod capability;
pub mod clock;
pub mod condition;
pub mod config;
pub mod connector;
pub mod error;
pub mod event;
pub mod id;
pub mod ids;
pub mod rule;

pub use alarm::{Acknowledgment, AlarmHistoryEntry, AlarmStatus};
pub use capability::{CapabilityDef, ConnectorTypeInfo, Operation, ParamSpec, ParamType};
pub use clock::{Clock, FakeClock, SystemClock};
pub use condition::{evaluate, DataPredicate, Filter, Operator};
pub use config::{CapabilityOverrides, ConnectorConfigEntry, ConnectorConfigFile};
pub use connector::{ConnectorStatus, InstanceInfo, InstanceStats};
pub use error::{
    BusOverflowError, CapabilityError, ConfigError, ConnectError, DisconnectError, ExecutionError,
    LifecycleError, ParameterError, TimeoutError,
};
pub use event::{derive_category, derive_priority, Category, Event, Priority, SYSTEM_SOURCE};
pub use id::{short, IdBuf};
pub use ids::{AckId, AlarmId, ConnectorId, EventId, RuleId};
pub use rule::{Action, Condition, Rule};
