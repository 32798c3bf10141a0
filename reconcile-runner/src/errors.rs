// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the reconciliation engine.

use crate::{dialect::LogDialect, input::InputLabel};
use camino::Utf8PathBuf;
use config::ConfigError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A structured source or log could not be turned into a result set.
///
/// Retrying won't help: the input itself is malformed, or describes zero tests.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum MalformedInputError {
    /// The document parsed as JSON, but holds no list of tests.
    #[error(
        "JSON does not contain a list of tests \
         (expected a list of objects with `name` and `status`, \
         or an object with one of the keys: {})",
        .keys.join(", ")
    )]
    NoTestArray {
        /// The keys that were searched for a list.
        keys: Vec<String>,
    },

    /// The input is neither a JSON document nor newline-delimited JSON.
    #[error(
        "JSON parse failed: not valid JSON or NDJSON\n\
         problem at line {line_number}: {line_preview}\n\
         start of file:\n{file_preview:?}"
    )]
    InvalidLine {
        /// The 1-based line number, counting only non-blank lines.
        line_number: usize,

        /// A bounded preview of the offending line.
        line_preview: String,

        /// A bounded preview of the start of the input.
        file_preview: String,
    },

    /// An entry in the list of tests is not a JSON object.
    #[error("test entry {index} is not an object: {entry}")]
    EntryNotObject {
        /// The 0-based index of the entry.
        index: usize,

        /// The entry, rendered as compact JSON.
        entry: String,
    },

    /// An entry in the list of tests has a missing or blank `name`.
    #[error("test entry {index} missing `name`")]
    EntryMissingName {
        /// The 0-based index of the entry.
        index: usize,
    },

    /// The structured source parsed, but holds zero tests.
    #[error("parsed JSON but found zero tests")]
    ZeroTests,

    /// No line of the log was recognized as a test outcome.
    #[error("parsed log but found zero {dialect} test outcome lines (check the log format)")]
    ZeroLogOutcomes {
        /// The dialect the log was read as.
        dialect: LogDialect,
    },
}

/// An input file was rejected before extraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InputError {
    /// The path does not exist.
    #[error("{label} not found: {path}")]
    NotFound {
        /// Which input this is.
        label: InputLabel,

        /// The path that was looked up.
        path: Utf8PathBuf,
    },

    /// The path is a directory.
    #[error("{label} is a directory, not a file: {path}")]
    IsDirectory {
        /// Which input this is.
        label: InputLabel,

        /// The path that was looked up.
        path: Utf8PathBuf,
    },

    /// The file is zero bytes long.
    #[error("{label} is empty: {path}")]
    Empty {
        /// Which input this is.
        label: InputLabel,

        /// The path that was read.
        path: Utf8PathBuf,
    },

    /// The file contains nothing but whitespace.
    #[error("{label} contains only whitespace: {path}")]
    WhitespaceOnly {
        /// Which input this is.
        label: InputLabel,

        /// The path that was read.
        path: Utf8PathBuf,
    },

    /// Reading the file failed.
    #[error("failed to read {label} at {path}")]
    Read {
        /// Which input this is.
        label: InputLabel,

        /// The path that was read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },
}

impl InputError {
    /// Returns which input failed.
    pub fn label(&self) -> InputLabel {
        match self {
            Self::NotFound { label, .. }
            | Self::IsDirectory { label, .. }
            | Self::Empty { label, .. }
            | Self::WhitespaceOnly { label, .. }
            | Self::Read { label, .. } => *label,
        }
    }
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse reconcile config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),

    /// A value in `status-aliases` is not a canonical outcome.
    #[error(transparent)]
    InvalidStatusAlias(InvalidStatusAliasError),
}

/// A `status-aliases` entry whose target is not a canonical outcome.
///
/// This is a [`Diagnostic`]: the offending entry is rendered as source code, with the target
/// underlined.
#[derive(Clone, Debug, Error, Diagnostic, PartialEq, Eq)]
#[error("in profile `{profile}`, status alias `{token}` maps to `{target}`")]
#[diagnostic(help("an alias must map to one of: PASSED, FAILED, SKIPPED, XFAILED, XPASS, ERROR"))]
#[non_exhaustive]
pub struct InvalidStatusAliasError {
    /// The profile the alias was defined in.
    pub profile: String,

    /// The token being aliased.
    pub token: String,

    /// The non-canonical target.
    pub target: String,

    #[source_code]
    entry: String,

    #[label("not a canonical outcome")]
    span: SourceSpan,
}

impl InvalidStatusAliasError {
    pub(crate) fn new(
        profile: impl Into<String>,
        token: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let token = token.into();
        let target = target.into();
        let entry = format!("{token} = \"{target}\"");
        // Points just past the opening quote.
        let span = (token.len() + 4, target.len()).into();
        Self {
            profile: profile.into(),
            token,
            target,
            entry,
            span,
        }
    }
}

/// An error which indicates that a profile was requested but not known.
#[derive(Clone, Debug, Error)]
#[error("profile `{profile}` not found (known profiles: {})", .all_profiles.join(", "))]
pub struct ProfileNotFound {
    profile: String,
    all_profiles: Vec<String>,
}

impl ProfileNotFound {
    pub(crate) fn new(
        profile: impl Into<String>,
        all_profiles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut all_profiles: Vec<_> = all_profiles.into_iter().map(|s| s.into()).collect();
        all_profiles.sort_unstable();
        Self {
            profile: profile.into(),
            all_profiles,
        }
    }
}
