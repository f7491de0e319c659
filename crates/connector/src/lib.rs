// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! junction-connector: the connector contract (§4.2) and capability
//! dispatcher (§4.3) shared by every connector type.

mod contract;
mod dispatcher;
mod instance;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use contract::Connector;
pub use dispatcher::{dispatch, DispatchError, DispatchOutcome};
pub use instance::ConnectorInstance;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{RecordedCall, RecordingConnector};
