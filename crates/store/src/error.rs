// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Everything that can go wrong reading or writing the rule store (§7's
/// `StoreError` kind): non-fatal for the bus, callers degrade to cached
/// rules rather than treat it as fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rule `{0}` not found")]
    NotFound(String),
    #[error("alarm `{0}` not found")]
    AlarmNotFound(String),
    #[error("rule store I/O error: {0}")]
    Io(String),
    #[error("rule store serialization error: {0}")]
    Serde(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
