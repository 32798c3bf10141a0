// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical test outcomes, and the canonicalizers that map raw status tokens onto them.
//!
//! Every test runner has its own vocabulary for results: pytest says `PASSED`, googletest says
//! `OK`, libtest says `ok` and `ignored`. Before two sources can be compared, both are folded
//! onto [`Outcome`] through a [`Canonicalizer`].
//!
//! Unknown tokens are never an error. They are kept as [`Outcome::Other`], so that a runner
//! emitting a status the tables don't know about shows up as a mismatch rather than aborting the
//! whole reconciliation.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{collections::BTreeMap, fmt};

/// The outcome of a single test, as recorded by one source.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "SmolStr", into = "SmolStr")]
pub enum Outcome {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was skipped or ignored.
    Skipped,

    /// The test was expected to fail, and did.
    XFailed,

    /// The test was expected to fail, but passed.
    XPass,

    /// The test errored out outside of its body (e.g. in a fixture).
    Error,

    /// A status token not known to the canonicalizer.
    ///
    /// The token is stored trimmed and upper-cased. It may be empty, if the source did not
    /// provide a status at all.
    Other(SmolStr),
}

impl Outcome {
    /// The canonical outcomes, in the order they are usually listed.
    pub const CANONICAL: [Outcome; 6] = [
        Outcome::Passed,
        Outcome::Failed,
        Outcome::Skipped,
        Outcome::XFailed,
        Outcome::XPass,
        Outcome::Error,
    ];

    /// Returns the canonical upper-case spelling of this outcome.
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Other(token) => token.as_str(),
            canonical => canonical.canonical_name().unwrap_or_default(),
        }
    }

    fn canonical_name(&self) -> Option<&'static str> {
        match self {
            Outcome::Passed => Some("PASSED"),
            Outcome::Failed => Some("FAILED"),
            Outcome::Skipped => Some("SKIPPED"),
            Outcome::XFailed => Some("XFAILED"),
            Outcome::XPass => Some("XPASS"),
            Outcome::Error => Some("ERROR"),
            Outcome::Other(_) => None,
        }
    }

    /// Returns true if this outcome is one of the canonical values.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Outcome::Other(_))
    }

    /// Parses an exact canonical spelling, returning `None` for anything else.
    fn from_canonical_str(s: &str) -> Option<Self> {
        match s {
            "PASSED" => Some(Outcome::Passed),
            "FAILED" => Some(Outcome::Failed),
            "SKIPPED" => Some(Outcome::Skipped),
            "XFAILED" => Some(Outcome::XFailed),
            "XPASS" => Some(Outcome::XPass),
            "ERROR" => Some(Outcome::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SmolStr> for Outcome {
    fn from(s: SmolStr) -> Self {
        Outcome::from_canonical_str(&s).unwrap_or(Outcome::Other(s))
    }
}

impl From<Outcome> for SmolStr {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Other(token) => token,
            canonical => SmolStr::new_static(canonical.canonical_name().unwrap_or_default()),
        }
    }
}

/// Maps raw status tokens onto [`Outcome`]s through a synonym table.
///
/// Lookups trim and upper-case the input first, so `" passed "` and `"PASSED"` canonicalize to
/// the same value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Canonicalizer {
    table: BTreeMap<SmolStr, Outcome>,
}

impl Canonicalizer {
    /// Returns a canonicalizer that only knows the canonical spellings.
    pub fn canonical() -> Self {
        let table = Outcome::CANONICAL
            .into_iter()
            .map(|outcome| (SmolStr::from(outcome.clone()), outcome))
            .collect();
        Self { table }
    }

    /// Adds a synonym, replacing any earlier mapping for the same token.
    ///
    /// The token is normalized the same way lookups are.
    pub fn with_alias(mut self, token: &str, outcome: Outcome) -> Self {
        self.insert_alias(token, outcome);
        self
    }

    /// Adds a synonym in place.
    pub fn insert_alias(&mut self, token: &str, outcome: Outcome) {
        self.table.insert(normalize(token), outcome);
    }

    /// Maps a raw status token to an outcome.
    ///
    /// Tokens not in the table are returned as [`Outcome::Other`], trimmed and upper-cased.
    pub fn canonicalize(&self, raw: &str) -> Outcome {
        let token = normalize(raw);
        match self.table.get(&token) {
            Some(outcome) => outcome.clone(),
            None => Outcome::Other(token),
        }
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::canonical()
    }
}

fn normalize(raw: &str) -> SmolStr {
    SmolStr::new(raw.trim().to_uppercase())
}
