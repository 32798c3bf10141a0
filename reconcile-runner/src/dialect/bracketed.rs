// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! googletest-style logs.
//!
//! The structured form is the JSON report written by `--gtest_output=json`:
//!
//! ```json
//! {"testsuites": [{"name": "MathTests", "testsuite": [
//!     {"name": "Addition", "classname": "MathTests", "status": "RUN", "result": "COMPLETED"}
//! ]}]}
//! ```
//!
//! The textual form is the console output. Only `[ OK ]`, `[ FAILED ]` and `[ SKIPPED ]` lines
//! carry outcomes; `[ RUN ]` and the `[----------]` separators are noise. googletest prints a
//! digest of failed tests after the body, so a digest `[ FAILED ]` line for a test seen earlier
//! as `[ OK ]` overrides it.

use crate::{
    helpers::json_field_string,
    outcome::{Canonicalizer, Outcome},
    result_set::ResultSet,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static OUTCOME_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*(?P<tag>OK|FAILED|SKIPPED)\s*\]\s+(?P<name>.+?)(?:\s+\(.*\))?\s*$")
        .expect("outcome line regex is valid")
});

static SUMMARY_FAILED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*FAILED\s*\]\s+(?P<name>.+?)\s*$").expect("summary line regex is valid")
});

// `[  FAILED  ] 2 tests, listed below:` introduces the digest and names no test.
static DIGEST_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+ tests?, listed below:$").expect("digest header regex is valid")
});

static ANNOTATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+\(.*\)\s*$").expect("annotation regex is valid")
});

// Parameterized tests are listed in the digest as `Suite/Test.Case/0, where GetParam() = 5`.
static PARAM_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r", where (?:GetParam\(\)|TypeParam) =.*$").expect("param suffix regex is valid")
});

pub(super) fn extract(text: &str, canonicalizer: &Canonicalizer) -> ResultSet {
    let results = extract_json(text);
    if !results.is_empty() {
        tracing::debug!("detected googletest JSON report with {} tests", results.len());
        return results;
    }

    let results = extract_lines(text, canonicalizer);
    tracing::debug!("read {} tests from googletest console lines", results.len());
    results
}

fn extract_json(text: &str) -> ResultSet {
    let mut results = ResultSet::new();
    let Ok(Value::Object(document)) = serde_json::from_str::<Value>(text) else {
        return results;
    };
    let Some(Value::Array(suites)) = document.get("testsuites") else {
        return results;
    };

    for suite in suites.iter().filter_map(Value::as_object) {
        let suite_name = json_field_string(suite.get("name"));
        for case in suite_cases(suite).iter().filter_map(Value::as_object) {
            let test = json_field_string(case.get("name"));
            let test = test.trim();
            if test.is_empty() {
                continue;
            }

            let classname = json_field_string(case.get("classname"));
            let prefix = if classname.trim().is_empty() {
                suite_name.trim()
            } else {
                classname.trim()
            };
            let name = if prefix.is_empty() {
                test.to_owned()
            } else {
                format!("{prefix}.{test}")
            };

            if let Some(outcome) = case_outcome(case) {
                results.insert(name, outcome);
            }
        }
    }
    results
}

fn suite_cases(suite: &Map<String, Value>) -> &[Value] {
    ["testsuite", "tests"]
        .into_iter()
        .filter_map(|key| suite.get(key).and_then(Value::as_array))
        .find(|cases| !cases.is_empty())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn case_outcome(case: &Map<String, Value>) -> Option<Outcome> {
    let field = |key: &str| json_field_string(case.get(key)).trim().to_uppercase();

    if field("status") == "SKIPPED" || field("result") == "SKIPPED" {
        return Some(Outcome::Skipped);
    }
    if let Some(ok) = case.get("ok").and_then(Value::as_bool) {
        return Some(if ok { Outcome::Passed } else { Outcome::Failed });
    }

    match field("result").as_str() {
        "PASSED" | "SUCCESS" | "COMPLETED" => Some(Outcome::Passed),
        "FAILED" | "FAILURE" => Some(Outcome::Failed),
        "SKIPPED" => Some(Outcome::Skipped),
        _ => None,
    }
}

fn extract_lines(text: &str, canonicalizer: &Canonicalizer) -> ResultSet {
    let mut results = ResultSet::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(captures) = OUTCOME_LINE_REGEX.captures(line) {
            let name = sanitize_name(&captures["name"]);
            if !is_digest_header(name) {
                results.insert(name, canonicalizer.canonicalize(&captures["tag"]));
            }
        } else if let Some(captures) = SUMMARY_FAILED_REGEX.captures(line) {
            let name = sanitize_name(&captures["name"]);
            if !is_digest_header(name) {
                results.insert(name, Outcome::Failed);
            }
        }
    }
    results
}

fn sanitize_name(name: &str) -> &str {
    let end = PARAM_SUFFIX_REGEX
        .find(name)
        .map_or(name.len(), |m| m.start());
    let name = &name[..end];
    let end = ANNOTATION_REGEX.find(name).map_or(name.len(), |m| m.start());
    name[..end].trim()
}

fn is_digest_header(name: &str) -> bool {
    DIGEST_HEADER_REGEX.is_match(name)
}
