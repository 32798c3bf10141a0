// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation of two result sets.

use crate::{outcome::Outcome, result_set::ResultSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeTuple};
use std::fmt;

/// A test present in both result sets, with different outcomes.
///
/// Serializes as the three-element array `[name, reference, observed]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusMismatch {
    /// The test name.
    pub name: String,

    /// The outcome in the reference (structured) result set.
    pub reference: Outcome,

    /// The outcome in the observed (log) result set.
    pub observed: Outcome,
}

impl Serialize for StatusMismatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.reference)?;
        tuple.serialize_element(&self.observed)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for StatusMismatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (name, reference, observed) = <(String, Outcome, Outcome)>::deserialize(deserializer)?;
        Ok(Self {
            name,
            reference,
            observed,
        })
    }
}

/// The verdict of a reconciliation, derived only from [`ComparisonResult::same`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The two sources agree.
    Pass,

    /// The two sources disagree.
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// The outcome of comparing a reference result set against an observed one.
///
/// All name lists are sorted lexicographically.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// True if the two result sets are equal as mappings.
    pub same: bool,

    /// True if both sets hold the same number of tests.
    ///
    /// This is necessary but not sufficient for `names_equal`: two disjoint sets of the same
    /// size have equal counts.
    pub counts_equal: bool,

    /// True if both sets hold exactly the same names.
    pub names_equal: bool,

    /// True if every name present in both sets has the same outcome in each.
    pub statuses_equal: bool,

    /// The number of tests in the reference set.
    pub count_json: usize,

    /// The number of tests in the observed set.
    pub count_log: usize,

    /// Names only present in the reference set.
    pub only_in_json: Vec<String>,

    /// Names only present in the observed set.
    pub only_in_log: Vec<String>,

    /// Names present in both sets whose outcomes differ.
    pub status_mismatches: Vec<StatusMismatch>,
}

impl ComparisonResult {
    /// Returns the pass/fail verdict for this comparison.
    pub fn verdict(&self) -> Verdict {
        if self.same {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Compares a reference result set against an observed one.
///
/// Never fails: empty sets are compared like any other. Outcomes are compared for exact
/// equality, so two different unrecognized tokens are a mismatch even if they mean the same
/// thing.
pub fn compare(reference: &ResultSet, observed: &ResultSet) -> ComparisonResult {
    let only_in_json: Vec<String> = reference
        .names()
        .filter(|name| !observed.contains(name))
        .map(str::to_owned)
        .collect();
    let only_in_log: Vec<String> = observed
        .names()
        .filter(|name| !reference.contains(name))
        .map(str::to_owned)
        .collect();

    let status_mismatches: Vec<StatusMismatch> = reference
        .iter()
        .filter_map(|(name, reference_outcome)| {
            let observed_outcome = observed.get(name)?;
            (reference_outcome != observed_outcome).then(|| StatusMismatch {
                name: name.to_owned(),
                reference: reference_outcome.clone(),
                observed: observed_outcome.clone(),
            })
        })
        .collect();

    let counts_equal = reference.len() == observed.len();
    let names_equal = only_in_json.is_empty() && only_in_log.is_empty();
    let statuses_equal = status_mismatches.is_empty();

    ComparisonResult {
        same: counts_equal && names_equal && statuses_equal,
        counts_equal,
        names_equal,
        statuses_equal,
        count_json: reference.len(),
        count_log: observed.len(),
        only_in_json,
        only_in_log,
        status_mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dialect::LogDialect, outcome::Canonicalizer, structured::StructuredExtractor};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn set(entries: &[(&str, Outcome)]) -> ResultSet {
        entries.iter().cloned().collect()
    }

    #[test]
    fn matching_sources() {
        let canonicalizer = Canonicalizer::canonical();
        let reference = StructuredExtractor::new(&canonicalizer)
            .extract(r#"[{"name":"a","status":"passed"},{"name":"b","status":"FAILED"}]"#)
            .unwrap();
        let observed = LogDialect::Generic
            .extract("a PASSED\nb FAILED", &canonicalizer)
            .unwrap();

        let result = compare(&reference, &observed);
        assert_eq!(
            result,
            ComparisonResult {
                same: true,
                counts_equal: true,
                names_equal: true,
                statuses_equal: true,
                count_json: 2,
                count_log: 2,
                only_in_json: vec![],
                only_in_log: vec![],
                status_mismatches: vec![],
            }
        );
        assert_eq!(result.verdict(), Verdict::Pass);
    }

    #[test]
    fn missing_from_log() {
        let reference = set(&[("a", Outcome::Passed), ("c", Outcome::Passed)]);
        let observed = set(&[("a", Outcome::Passed)]);
        let result = compare(&reference, &observed);
        assert_eq!(result.only_in_json, ["c"]);
        assert!(result.only_in_log.is_empty());
        assert!(!result.names_equal);
        assert!(!result.counts_equal);
        assert!(result.statuses_equal);
        assert!(!result.same);
        assert_eq!(result.verdict(), Verdict::Fail);
    }

    #[test]
    fn disjoint_sets_of_equal_size() {
        let reference = set(&[("a", Outcome::Passed), ("b", Outcome::Passed)]);
        let observed = set(&[("c", Outcome::Passed), ("d", Outcome::Passed)]);
        let result = compare(&reference, &observed);
        assert!(result.counts_equal);
        assert!(!result.names_equal);
        assert!(result.statuses_equal);
        assert!(!result.same);
        assert_eq!(result.only_in_json, ["a", "b"]);
        assert_eq!(result.only_in_log, ["c", "d"]);
    }

    #[test]
    fn mismatches_are_sorted_and_exact() {
        let reference = set(&[
            ("z", Outcome::Passed),
            ("m", Outcome::Other("OK".into())),
            ("a", Outcome::Skipped),
            ("same", Outcome::Failed),
        ]);
        let observed = set(&[
            ("a", Outcome::XFailed),
            ("m", Outcome::Other("SUCCESS".into())),
            ("z", Outcome::Failed),
            ("same", Outcome::Failed),
        ]);
        let result = compare(&reference, &observed);
        assert!(result.names_equal);
        assert!(!result.statuses_equal);
        assert_eq!(
            result.status_mismatches,
            vec![
                StatusMismatch {
                    name: "a".to_owned(),
                    reference: Outcome::Skipped,
                    observed: Outcome::XFailed,
                },
                StatusMismatch {
                    name: "m".to_owned(),
                    reference: Outcome::Other("OK".into()),
                    observed: Outcome::Other("SUCCESS".into()),
                },
                StatusMismatch {
                    name: "z".to_owned(),
                    reference: Outcome::Passed,
                    observed: Outcome::Failed,
                },
            ]
        );
    }

    #[test]
    fn empty_sets_compare_equal() {
        let result = compare(&ResultSet::new(), &ResultSet::new());
        assert!(result.same);
        assert_eq!(result.count_json, 0);
    }

    #[test]
    fn serialization_shape() {
        let reference = set(&[("a", Outcome::Passed), ("b", Outcome::Passed)]);
        let observed = set(&[("a", Outcome::Failed), ("c", Outcome::Passed)]);
        let result = compare(&reference, &observed);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "same": false,
                "counts_equal": true,
                "names_equal": false,
                "statuses_equal": false,
                "count_json": 2,
                "count_log": 2,
                "only_in_json": ["b"],
                "only_in_log": ["c"],
                "status_mismatches": [["a", "PASSED", "FAILED"]],
            })
        );
        let back: ComparisonResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    fn outcome_strategy() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::Passed),
            Just(Outcome::Failed),
            Just(Outcome::Skipped),
            Just(Outcome::XFailed),
            Just(Outcome::XPass),
            Just(Outcome::Error),
            "[A-Z]{1,4}".prop_map(|s| Outcome::from(smol_str::SmolStr::new(s))),
        ]
    }

    fn result_set_strategy() -> impl Strategy<Value = ResultSet> {
        prop::collection::btree_map("[a-e]{1,2}", outcome_strategy(), 1..8)
            .prop_map(|entries| entries.into_iter().collect())
    }

    proptest! {
        #[test]
        fn same_iff_equal_mappings(a in result_set_strategy(), b in result_set_strategy()) {
            prop_assert_eq!(compare(&a, &b).same, a == b);
            prop_assert!(compare(&a, &a).same);
        }

        #[test]
        fn role_swap_mirrors_differences(a in result_set_strategy(), b in result_set_strategy()) {
            let forward = compare(&a, &b);
            let backward = compare(&b, &a);
            prop_assert_eq!(&forward.only_in_json, &backward.only_in_log);
            prop_assert_eq!(&forward.only_in_log, &backward.only_in_json);
            prop_assert_eq!(forward.status_mismatches.len(), backward.status_mismatches.len());
            prop_assert_eq!(forward.same, backward.same);
        }
    }
}
