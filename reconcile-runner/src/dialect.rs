// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log dialects: the textual and structured log grammars produced by families of test runners.
//!
//! Each dialect turns raw log text into a [`ResultSet`]. Lines that aren't recognized are
//! treated as noise and skipped; extraction only fails, once at the end, if nothing at all was
//! recognized.
//!
//! Dialects with both a structured and a textual form try the structured form first, and fall
//! back to scanning lines if the structured pass produces no tests. A structured document that
//! parses but describes zero tests is treated the same as one that doesn't parse.
//!
//! Dialects are never auto-detected from each other: the caller picks one.

mod bracketed;
mod generic;
mod libtest;

use crate::{
    errors::MalformedInputError,
    outcome::{Canonicalizer, Outcome},
    result_set::ResultSet,
};
use serde::Deserialize;
use std::fmt;

/// A log grammar produced by one family of test runners.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogDialect {
    /// Line-oriented `<name> <STATUS>` output, as printed by pytest in verbose mode.
    ///
    /// `RERUN` lines are recognized but discarded, so the last non-`RERUN` line for a test wins.
    #[default]
    #[serde(alias = "pytest")]
    Generic,

    /// googletest-style output: `[       OK ] Suite.Name (0 ms)` lines, or the JSON report
    /// written by `--gtest_output=json`.
    #[serde(alias = "gtest")]
    Bracketed,

    /// Rust libtest output: `test path::name ... ok` lines, or the JSON event stream written by
    /// `--format json`.
    #[serde(alias = "rust")]
    Libtest,
}

impl LogDialect {
    /// Returns the name of this dialect.
    pub fn as_str(self) -> &'static str {
        match self {
            LogDialect::Generic => "generic",
            LogDialect::Bracketed => "bracketed",
            LogDialect::Libtest => "libtest",
        }
    }

    /// Returns the status canonicalizer used for runs in this dialect.
    ///
    /// The same canonicalizer is applied to the structured source of a run, so that both sides
    /// fold the same synonyms.
    pub fn default_canonicalizer(self) -> Canonicalizer {
        match self {
            LogDialect::Generic => Canonicalizer::canonical(),
            LogDialect::Bracketed => Canonicalizer::canonical().with_alias("OK", Outcome::Passed),
            LogDialect::Libtest => Canonicalizer::canonical()
                .with_alias("OK", Outcome::Passed)
                .with_alias("IGNORED", Outcome::Skipped),
        }
    }

    /// Extracts a result set from log text in this dialect.
    ///
    /// Fails if no test outcome could be recognized.
    pub fn extract(
        self,
        text: &str,
        canonicalizer: &Canonicalizer,
    ) -> Result<ResultSet, MalformedInputError> {
        let results = match self {
            LogDialect::Generic => generic::extract(text, canonicalizer),
            LogDialect::Bracketed => bracketed::extract(text, canonicalizer),
            LogDialect::Libtest => libtest::extract(text, canonicalizer),
        };

        if results.is_empty() {
            return Err(MalformedInputError::ZeroLogOutcomes { dialect: self });
        }
        Ok(results)
    }
}

impl fmt::Display for LogDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("generic", LogDialect::Generic ; "generic")]
    #[test_case("pytest", LogDialect::Generic ; "pytest alias")]
    #[test_case("gtest", LogDialect::Bracketed ; "gtest alias")]
    #[test_case("rust", LogDialect::Libtest ; "rust alias")]
    fn deserialize(input: &str, expected: LogDialect) {
        let dialect: LogDialect = serde_json::from_value(input.into()).unwrap();
        assert_eq!(dialect, expected);
        if !["pytest", "gtest", "rust"].contains(&input) {
            assert_eq!(dialect.as_str(), input);
        }
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        serde_json::from_value::<LogDialect>("junit".into()).unwrap_err();
    }

    #[test_case(LogDialect::Generic, "ok", Outcome::Other("OK".into()) ; "generic keeps ok opaque")]
    #[test_case(LogDialect::Bracketed, "ok", Outcome::Passed ; "bracketed folds ok")]
    #[test_case(LogDialect::Bracketed, "ignored", Outcome::Other("IGNORED".into()) ; "bracketed keeps ignored opaque")]
    #[test_case(LogDialect::Libtest, "Ignored", Outcome::Skipped ; "libtest folds ignored")]
    fn dialect_tables(dialect: LogDialect, raw: &str, expected: Outcome) {
        assert_eq!(dialect.default_canonicalizer().canonicalize(raw), expected);
    }

    #[test_case(LogDialect::Generic ; "generic")]
    #[test_case(LogDialect::Bracketed ; "bracketed")]
    #[test_case(LogDialect::Libtest ; "libtest")]
    fn noise_only_is_an_error(dialect: LogDialect) {
        let text = "compiling...\nall done\n";
        let err = dialect
            .extract(text, &dialect.default_canonicalizer())
            .unwrap_err();
        assert_eq!(err, MalformedInputError::ZeroLogOutcomes { dialect });
    }
}
