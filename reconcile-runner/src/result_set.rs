// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::outcome::Outcome;
use serde::Serialize;
use std::collections::{BTreeMap, btree_map};

/// A mapping from test name to the [`Outcome`] one source recorded for it.
///
/// Names are unique: inserting a name twice keeps the later outcome. Log extractors rely on this
/// so that the final line for a retried test is the authoritative one.
///
/// Iteration is in lexicographic name order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: BTreeMap<String, Outcome>,
}

impl ResultSet {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome for `name`, returning the outcome it replaced, if any.
    pub fn insert(&mut self, name: impl Into<String>, outcome: Outcome) -> Option<Outcome> {
        self.entries.insert(name.into(), outcome)
    }

    /// Returns the outcome recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries.get(name)
    }

    /// Returns true if `name` has an outcome.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The number of distinct test names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tests were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over test names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(name, outcome)` pairs in sorted name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Outcome)> for ResultSet {
    fn from_iter<T: IntoIterator<Item = (S, Outcome)>>(iter: T) -> Self {
        let mut set = ResultSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<(S, Outcome)> for ResultSet {
    fn extend<T: IntoIterator<Item = (S, Outcome)>>(&mut self, iter: T) {
        for (name, outcome) in iter {
            self.insert(name, outcome);
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = (&'a str, &'a Outcome);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`ResultSet`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Outcome>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Outcome);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
