// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! junction-supervisor: the process that owns a hub's bus, registry,
//! store, and rule engine, drives connector boot and type discovery,
//! and runs the reconnect and health-snapshot background loops (§7).

mod backoff;
mod config;
mod factory;
mod fs_discovery;
mod supervisor;

pub use backoff::Backoff;
pub use config::{ConfigLoadError, SupervisorConfig};
pub use factory::ConnectorFactory;
pub use fs_discovery::FsTypeSource;
pub use supervisor::{BootError, Supervisor};
