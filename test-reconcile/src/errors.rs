// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use reconcile_runner::{
    ReconcileExitCode,
    errors::{
        ConfigParseError, ConfigParseErrorKind, InputError, MalformedInputError, ProfileNotFound,
    },
    input::InputLabel,
};
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are mostly placeholder messages: the expected way to print out errors
// is with the display_to_stderr method, which colorizes errors.

/// An expected failure of a `test-reconcile` invocation.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },

    #[error("profile not found")]
    ProfileNotFound {
        #[from]
        err: ProfileNotFound,
    },

    #[error("input error")]
    InputError {
        #[from]
        err: InputError,
    },

    #[error("failed to extract results from {label} `{path}`")]
    ExtractionFailed {
        label: InputLabel,
        path: Utf8PathBuf,
        #[source]
        err: MalformedInputError,
    },

    #[error("error writing report")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },

    #[error("error writing JSON comparison to `{path}`")]
    JsonOutWriteError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn extraction_failed(
        label: InputLabel,
        path: impl Into<Utf8PathBuf>,
        err: MalformedInputError,
    ) -> Self {
        Self::ExtractionFailed {
            label,
            path: path.into(),
            err,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. } | Self::ProfileNotFound { .. } => {
                ReconcileExitCode::SETUP_ERROR
            }
            Self::InputError { .. } | Self::ExtractionFailed { .. } => {
                ReconcileExitCode::EXTRACTION_FAILED
            }
            Self::WriteOutputError { .. } | Self::JsonOutWriteError { .. } => {
                ReconcileExitCode::WRITE_OUTPUT_ERROR
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::ConfigParseError { err } => match err.kind() {
                ConfigParseErrorKind::InvalidStatusAlias(alias_err) => {
                    tracing::error!(
                        "for config file `{}`, invalid status alias in profile `{}`",
                        err.config_file().style(styles.bold),
                        alias_err.profile.style(styles.bold),
                    );
                    // Printed through the miette hook.
                    let report = miette::Report::new(alias_err.clone());
                    tracing::error!(target: NO_HEADING_TARGET, "{report:?}");
                    None
                }
                kind => {
                    tracing::error!(
                        "failed to parse config at `{}`",
                        err.config_file().style(styles.bold)
                    );
                    Some(kind as &dyn Error)
                }
            },
            Self::ProfileNotFound { err } => {
                tracing::error!("{err}");
                err.source()
            }
            Self::InputError { err } => {
                tracing::error!("invalid {}", err.label());
                Some(err as &dyn Error)
            }
            Self::ExtractionFailed { label, path, err } => {
                tracing::error!(
                    "failed to extract results from {label} `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::WriteOutputError { err } => {
                tracing::error!("error writing report");
                Some(err as &dyn Error)
            }
            Self::JsonOutWriteError { path, err } => {
                tracing::error!(
                    "error writing JSON comparison to `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
