// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription matchers: literal type, namespace prefix (`"camera:*"`),
//! the global wildcard `*`, or a full `Filter` (§4.1, §4.7).

use junction_core::{Event, Filter};

/// What a subscription matches against published events.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    /// `prefix` excludes the trailing `*`, e.g. `"camera:"` for `"camera:*"`.
    Prefix(String),
    Wildcard,
    Filter(Filter),
}

impl Matcher {
    /// Parse a `subscribe(pattern, ...)` pattern string (§4.1).
    pub fn from_pattern(pattern: &str) -> Self {
        if pattern == "*" {
            Matcher::Wildcard
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Matcher::Prefix(prefix.to_string())
        } else {
            Matcher::Exact(pattern.to_string())
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Matcher::Exact(t) => event.event_type == *t,
            Matcher::Prefix(p) => event.event_type.starts_with(p.as_str()),
            Matcher::Wildcard => true,
            Matcher::Filter(f) => f.matches(event),
        }
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
