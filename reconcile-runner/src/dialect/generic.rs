// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{outcome::Canonicalizer, result_set::ResultSet};
use regex::Regex;
use std::sync::LazyLock;

static OUTCOME_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>.+?)\s+(?P<status>PASSED|FAILED|SKIPPED|XFAILED|XPASS|ERROR|RERUN)(?:\b.*)?$",
    )
    .expect("outcome line regex is valid")
});

const RERUN: &str = "RERUN";

pub(super) fn extract(text: &str, canonicalizer: &Canonicalizer) -> ResultSet {
    let mut results = ResultSet::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(captures) = OUTCOME_LINE_REGEX.captures(line) else {
            continue;
        };

        // A rerun line is superseded by whatever the retry prints next.
        let status = &captures["status"];
        if status == RERUN {
            continue;
        }
        let name = captures["name"].trim();
        results.insert(name, canonicalizer.canonicalize(status));
    }

    tracing::debug!("read {} tests from generic log lines", results.len());
    results
}
