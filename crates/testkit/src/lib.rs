// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! junction-testkit: fakes shared by the workspace's crate-local and
//! end-to-end tests (§8 ambient test tooling) — a recording connector,
//! a deterministic `ConnectorTypeSource`, and the `FakeClock` re-export.

mod type_source;

pub use junction_connector::{RecordedCall, RecordingConnector};
pub use junction_core::FakeClock;
pub use type_source::FakeTypeSource;
