// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code.

use serde_json::Value;

/// The default number of characters shown when previewing malformed input.
pub const DEFAULT_PREVIEW_CHARS: usize = 160;

/// Returns the first `max_chars` characters of `s`, with a trailing `…` if anything was cut.
pub(crate) fn preview_line(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_owned(),
    }
}

/// Returns the first `max_chars` characters of `s`, without any marker.
pub(crate) fn prefix_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Renders a JSON field as a plain string.
///
/// Strings are returned as-is, `null` as empty, and any other value as its JSON text.
pub(crate) fn json_field_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
