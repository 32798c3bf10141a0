// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Check that a structured test-result file and a test-runner log agree.
//!
//! For the library that does the work, see `reconcile-runner`.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;
#[cfg(test)]
mod tests_integration;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
