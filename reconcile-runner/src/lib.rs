// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `test-reconcile`: checks that a structured test report and a
//! test-runner log agree on which tests ran and how each one ended.
//!
//! The basic flow is:
//!
//! 1. Read both inputs with [`input::read_input`].
//! 2. Turn the reference document into a [`ResultSet`](result_set::ResultSet) with
//!    [`structured::StructuredExtractor`], and the log with a
//!    [`LogDialect`](dialect::LogDialect).
//! 3. Reconcile the two with [`compare::compare`], and render the outcome with
//!    [`reporter::Reporter`].
//!
//! Status tokens are mapped onto [`Outcome`](outcome::Outcome)s by a
//! [`Canonicalizer`](outcome::Canonicalizer), configured per profile through
//! [`config::ReconcileConfig`].

pub mod compare;
pub mod config;
pub mod dialect;
pub mod errors;
mod exit_codes;
mod helpers;
pub mod input;
pub mod outcome;
pub mod reporter;
pub mod result_set;
pub mod structured;

pub use exit_codes::ReconcileExitCode;
