// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rust libtest logs.
//!
//! The structured form is the event stream printed with `--format json`, one object per line:
//!
//! * `{ "type": "test", "event": "started", "name": "<name>" }`
//! * `{ "type": "test", "name": "<name>", "event": "ok", "exec_time": <f32> }`
//! * `{ "type": "test", "name": "<name>", "event": "failed", "stdout": "..." }`
//! * `{ "type": "test", "name": "<name>", "event": "ignored" }`
//! * `{ "type": "suite", ... }` lines, which carry no per-test outcome
//!
//! The textual form is the default console output: `test path::to::name ... ok`.

use crate::{
    helpers::json_field_string,
    outcome::{Canonicalizer, Outcome},
    result_set::ResultSet,
};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TEST_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^test\s+(?P<name>.+?)\s+\.\.\.\s+(?P<status>ok|FAILED|ignored)(?:\b.*)?$")
        .expect("test line regex is valid")
});

const KIND_TEST: &str = "test";

const EVENT_OK: &str = "ok";
const EVENT_FAILED: &str = "failed";
const EVENT_IGNORED: &str = "ignored";

pub(super) fn extract(text: &str, canonicalizer: &Canonicalizer) -> ResultSet {
    let results = extract_json_lines(text);
    if !results.is_empty() {
        tracing::debug!("detected libtest JSON events for {} tests", results.len());
        return results;
    }

    let results = extract_text_lines(text, canonicalizer);
    tracing::debug!("read {} tests from libtest console lines", results.len());
    results
}

fn extract_json_lines(text: &str) -> ResultSet {
    let mut results = ResultSet::new();
    for line in text.lines() {
        let line = line.trim();
        // Cheap textual filter before paying for a parse.
        if !(line.starts_with('{') && line.contains("\"type\"") && line.contains("\"event\"")) {
            continue;
        }
        let Ok(event) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        if event.get("type").and_then(Value::as_str) != Some(KIND_TEST) {
            continue;
        }

        let name = json_field_string(event.get("name"));
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let outcome = match json_field_string(event.get("event")).trim().to_lowercase().as_str() {
            EVENT_OK => Outcome::Passed,
            EVENT_FAILED => Outcome::Failed,
            EVENT_IGNORED => Outcome::Skipped,
            // `started`, `timeout` and friends don't settle an outcome.
            _ => continue,
        };
        results.insert(name, outcome);
    }
    results
}

fn extract_text_lines(text: &str, canonicalizer: &Canonicalizer) -> ResultSet {
    let mut results = ResultSet::new();
    for line in text.lines() {
        let line = line.trim_end();
        let Some(captures) = TEST_LINE_REGEX.captures(line) else {
            continue;
        };
        let outcome = match &captures["status"] {
            "ok" => Outcome::Passed,
            "FAILED" => Outcome::Failed,
            "ignored" => Outcome::Skipped,
            other => canonicalizer.canonicalize(other),
        };
        results.insert(captures["name"].trim(), outcome);
    }
    results
}
