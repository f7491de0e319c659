// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal `{{field}}` substitution for `notify` action messages (§4.6).
//! Single-level interpolation only — not a general template engine, the
//! one place this kernel reaches for `format!`-style ad hoc construction
//! rather than a crate.

use junction_core::{condition, Event};
use serde_json::Value;

/// Substitutes every `{{field}}` placeholder in `template` with the
/// string form of [`condition::resolve_field`] against `event`.
/// Unterminated `{{` is left verbatim; an unresolved field renders empty.
pub fn render(template: &str, event: &Event) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let field = after[..end].trim();
                out.push_str(&render_field(field, event));
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_field(field: &str, event: &Event) -> String {
    match condition::resolve_field(field, event) {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
