// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnection backoff (§4.8): initial 1s, factor 2, cap 60s, jitter
//! ±20%. A fresh [`rand::thread_rng`] is drawn per call rather than a
//! shared RNG, so retries across connectors stay independent (§4.8).

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub initial: Duration,
    pub factor: f64,
    pub cap: Duration,
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { initial: Duration::from_secs(1), factor: 2.0, cap: Duration::from_secs(60), jitter: 0.2 }
    }
}

impl Backoff {
    /// Delay before the `attempt`-th retry (1-based, matching
    /// `connectionAttempts` right after a failure). Saturates at `cap`
    /// before jitter is applied.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let base = (self.initial.as_secs_f64() * self.factor.powi(exponent)).min(self.cap.as_secs_f64());
        let span = base * self.jitter;
        let jittered = if span > 0.0 {
            rand::thread_rng().gen_range((base - span).max(0.0)..=(base + span))
        } else {
            base
        };
        Duration::from_secs_f64(jittered.max(0.0))
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
