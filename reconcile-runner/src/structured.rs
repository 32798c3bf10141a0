// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of the structured reference source.
//!
//! The reference source is JSON in one of three shapes:
//!
//! * a list of test objects: `[{"name": "a", "status": "passed"}, ...]`
//! * an object holding such a list under one of a fixed set of keys (by default `tests`,
//!   `items`, `results` and `cases`, searched in that order)
//! * newline-delimited JSON, one test object per line
//!
//! The whole input is first parsed as a single document. Only if that fails is it read as
//! newline-delimited JSON, where any unparseable line fails the whole extraction.

use crate::{
    errors::MalformedInputError,
    helpers::{DEFAULT_PREVIEW_CHARS, json_field_string, prefix_chars, preview_line},
    outcome::Canonicalizer,
    result_set::ResultSet,
};
use serde_json::Value;

/// The keys searched, in order, for a list of tests inside a JSON object.
pub const DEFAULT_STRUCTURED_KEYS: [&str; 4] = ["tests", "items", "results", "cases"];

/// Turns a structured reference source into a [`ResultSet`].
#[derive(Clone, Debug)]
pub struct StructuredExtractor<'a> {
    canonicalizer: &'a Canonicalizer,
    keys: Vec<String>,
    preview_chars: usize,
}

impl<'a> StructuredExtractor<'a> {
    /// Creates an extractor that canonicalizes statuses through `canonicalizer`.
    pub fn new(canonicalizer: &'a Canonicalizer) -> Self {
        Self {
            canonicalizer,
            keys: DEFAULT_STRUCTURED_KEYS.map(String::from).to_vec(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Replaces the keys searched for a list of tests inside a JSON object.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the number of characters shown when previewing a malformed line.
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Extracts a result set from `text`.
    ///
    /// Fails if the text isn't JSON or NDJSON, if an entry isn't an object or has no name, or
    /// if no tests were found at all. Later entries with the same name replace earlier ones.
    pub fn extract(&self, text: &str) -> Result<ResultSet, MalformedInputError> {
        let entries = match serde_json::from_str::<Value>(text) {
            Ok(document) => self.test_array(document)?,
            Err(err) => {
                tracing::debug!("input is not a single JSON document ({err}), trying NDJSON");
                self.parse_ndjson(text)?
            }
        };

        let mut results = ResultSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Object(fields) = &entry else {
                return Err(MalformedInputError::EntryNotObject {
                    index,
                    entry: entry.to_string(),
                });
            };

            let name = json_field_string(fields.get("name"));
            let name = name.trim();
            if name.is_empty() {
                return Err(MalformedInputError::EntryMissingName { index });
            }
            let status = json_field_string(fields.get("status"));
            results.insert(name, self.canonicalizer.canonicalize(&status));
        }

        if results.is_empty() {
            return Err(MalformedInputError::ZeroTests);
        }
        Ok(results)
    }

    fn test_array(&self, document: Value) -> Result<Vec<Value>, MalformedInputError> {
        match document {
            Value::Array(entries) => Ok(entries),
            Value::Object(mut fields) => {
                for key in &self.keys {
                    if let Some(Value::Array(_)) = fields.get(key.as_str())
                        && let Some(Value::Array(entries)) = fields.remove(key.as_str())
                    {
                        tracing::debug!("found test list under key `{key}`");
                        return Ok(entries);
                    }
                }
                Err(self.no_test_array())
            }
            _ => Err(self.no_test_array()),
        }
    }

    fn parse_ndjson(&self, text: &str) -> Result<Vec<Value>, MalformedInputError> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|_| MalformedInputError::InvalidLine {
                    line_number: idx + 1,
                    line_preview: preview_line(line, self.preview_chars),
                    file_preview: prefix_chars(text, self.preview_chars).to_owned(),
                })
            })
            .collect()
    }

    fn no_test_array(&self) -> MalformedInputError {
        MalformedInputError::NoTestArray {
            keys: self.keys.clone(),
        }
    }
}
