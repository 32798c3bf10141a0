// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `test-reconcile` runs.
///
/// A reconciliation that completes exits with [`OK`](Self::OK) whether or not the two sources
/// agree, unless the profile enables `fail-on-mismatch`.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ReconcileExitCode {}

impl ReconcileExitCode {
    /// The reconciliation completed.
    pub const OK: i32 = 0;

    /// The two sources disagree and `fail-on-mismatch` is enabled.
    pub const MISMATCH: i32 = 100;

    /// An input couldn't be read, or no results could be extracted from it.
    pub const EXTRACTION_FAILED: i32 = 2;

    /// The config couldn't be loaded, or the requested profile doesn't exist.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing the report to stdout or to a file produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
