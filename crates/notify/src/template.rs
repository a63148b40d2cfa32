// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal `{field}` template interpolation for bridge rule messages
//! (§4.11). Generalizes `oj_runbook::template`'s `${var}` interpolation
//! to single-brace placeholders over an event's payload fields rather
//! than job/crew vars; unknown placeholders are left as-is.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid"));

/// Replaces `{name}` placeholders in `template` with values from `fields`.
/// A placeholder with no matching field is left untouched.
pub fn render(template: &str, fields: &HashMap<String, String>) -> String {
    FIELD_PATTERN
        .replace_all(template, |caps: &regex::Captures| match fields.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
