// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("unknown subscription token")]
    UnknownSubscription,
    #[error("event `type` must not be empty")]
    MissingEventType,
}
