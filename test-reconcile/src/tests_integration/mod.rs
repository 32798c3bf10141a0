// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that drive the parsed app against files on disk, capturing stdout.

use crate::{ExpectedError, OutputWriter, dispatch::ReconcileApp, output::OutputContext};
use clap::Parser;
use pretty_assertions::assert_eq;
use reconcile_runner::{
    ReconcileExitCode, compare::ComparisonResult, errors::InputError, input::InputLabel,
};

mod fixtures;

use fixtures::*;

fn run(inputs: &TempInputs, extra_args: &[&str]) -> (Result<i32, ExpectedError>, String) {
    let config_file = inputs.config_file();
    let reference = inputs.path("reference.json");
    let log = inputs.path("run.log");
    let mut args = vec![
        "test-reconcile",
        "--reference",
        reference.as_str(),
        "--log",
        log.as_str(),
        "--config-file",
        config_file.as_str(),
    ];
    args.extend_from_slice(extra_args);

    let app = ReconcileApp::parse_from(args);
    let mut output = OutputWriter::new_test();
    let result = app.exec(OutputContext::for_tests(), &mut output);
    let stdout = output.stdout().expect("stdout is valid UTF-8").to_owned();
    (result, stdout)
}

#[test]
fn matching_sources_pass() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG);

    let (result, stdout) = run(&inputs, &[]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
    assert!(stdout.contains("\nMATCH\n"), "stdout: {stdout}");
    assert!(stdout.contains("Counts equal:   true (JSON=3, LOG=3)"), "stdout: {stdout}");
    assert!(stdout.contains("JSON_DIFF =\n{"), "stdout: {stdout}");
    assert!(stdout.contains("FINAL REVIEW STATUS: PASS"), "stdout: {stdout}");
}

#[test]
fn differences_exit_zero_by_default() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG_DIVERGED);

    let (result, stdout) = run(&inputs, &[]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
    assert!(stdout.contains("DIFFERENCES FOUND"), "stdout: {stdout}");
    assert!(
        stdout.contains("Present only in JSON:\n  • tests/test_math.py::test_div"),
        "stdout: {stdout}"
    );
    assert!(
        stdout.contains("Present only in LOG:\n  • tests/test_math.py::test_mul"),
        "stdout: {stdout}"
    );
    assert!(
        stdout.contains("  • tests/test_math.py::test_sub\n      JSON=FAILED | LOG=PASSED"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("FINAL REVIEW STATUS: FAIL"), "stdout: {stdout}");
}

#[test]
fn fail_on_mismatch_profile() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG_DIVERGED);
    inputs.write(
        "reconcile.toml",
        "[profile.ci]\nfail-on-mismatch = true\njson-diff = false\n",
    );

    let (result, stdout) = run(&inputs, &["--profile", "ci"]);
    assert_eq!(result.unwrap(), ReconcileExitCode::MISMATCH);
    assert!(!stdout.contains("JSON_DIFF"), "stdout: {stdout}");

    // The default profile still reports differences without failing.
    let (result, _) = run(&inputs, &[]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
}

#[test]
fn json_message_format() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG_DIVERGED);

    let (result, stdout) = run(&inputs, &["--message-format", "json"]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
    let parsed: ComparisonResult = serde_json::from_str(&stdout).unwrap();
    assert!(!parsed.same);
    assert_eq!(parsed.count_json, 3);
    assert_eq!(parsed.count_log, 3);
    assert_eq!(parsed.only_in_json, ["tests/test_math.py::test_div"]);
    assert_eq!(parsed.only_in_log, ["tests/test_math.py::test_mul"]);
}

#[test]
fn json_out_file() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG);
    let json_out = inputs.path("comparison.json");

    let (result, _) = run(&inputs, &["--json-out", json_out.as_str()]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
    let written = std::fs::read_to_string(&json_out).unwrap();
    let parsed: ComparisonResult = serde_json::from_str(&written).unwrap();
    assert!(parsed.same);
}

#[test]
fn bracketed_dialect_with_ndjson_reference() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", GTEST_REFERENCE_NDJSON);
    inputs.write("run.log", GTEST_LOG);

    let (result, stdout) = run(&inputs, &["--dialect", "gtest"]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
    assert!(stdout.contains("FINAL REVIEW STATUS: PASS"), "stdout: {stdout}");
}

#[test]
fn log_without_outcomes() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", "collecting ...\nnothing to see here\n");

    let (result, _) = run(&inputs, &[]);
    let error = result.unwrap_err();
    assert_eq!(error.process_exit_code(), ReconcileExitCode::EXTRACTION_FAILED);
    assert!(
        matches!(
            error,
            ExpectedError::ExtractionFailed {
                label: InputLabel::Log,
                ..
            }
        ),
        "unexpected error: {error:?}"
    );
}

#[test]
fn dialect_and_aliases_from_config() {
    let inputs = TempInputs::new();
    inputs.write(
        "reference.json",
        r#"[{"name": "T.One", "status": "GREEN"}, {"name": "T.Two", "status": "RED"}]"#,
    );
    inputs.write("run.log", GTEST_LOG);
    inputs.write(
        "reconcile.toml",
        "[profile.default]\ndialect = \"bracketed\"\n\n\
         [profile.default.status-aliases]\nGREEN = \"PASSED\"\nRED = \"FAILED\"\n",
    );

    let (result, stdout) = run(&inputs, &[]);
    assert_eq!(result.unwrap(), ReconcileExitCode::OK);
    assert!(stdout.contains("\nMATCH\n"), "stdout: {stdout}");
}

#[test]
fn missing_reference() {
    let inputs = TempInputs::new();
    inputs.write("run.log", PYTEST_LOG);

    let (result, stdout) = run(&inputs, &[]);
    let error = result.unwrap_err();
    assert_eq!(error.process_exit_code(), ReconcileExitCode::EXTRACTION_FAILED);
    assert!(
        matches!(
            error,
            ExpectedError::InputError {
                err: InputError::NotFound {
                    label: InputLabel::Reference,
                    ..
                }
            }
        ),
        "unexpected error: {error:?}"
    );
    assert!(stdout.is_empty(), "nothing is reported on failure");
}

#[test]
fn malformed_reference() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", "{\"name\": \"a\", \"status\": \"passed\"}\nnot json\n");
    inputs.write("run.log", PYTEST_LOG);

    let (result, _) = run(&inputs, &[]);
    let error = result.unwrap_err();
    assert_eq!(error.process_exit_code(), ReconcileExitCode::EXTRACTION_FAILED);
    assert!(
        matches!(
            error,
            ExpectedError::ExtractionFailed {
                label: InputLabel::Reference,
                ..
            }
        ),
        "unexpected error: {error:?}"
    );
}

#[test]
fn unknown_profile() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG);

    let (result, _) = run(&inputs, &["--profile", "nightly"]);
    let error = result.unwrap_err();
    assert_eq!(error.process_exit_code(), ReconcileExitCode::SETUP_ERROR);
    assert!(
        matches!(error, ExpectedError::ProfileNotFound { .. }),
        "unexpected error: {error:?}"
    );
}

#[test]
fn missing_config_file() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG);
    std::fs::remove_file(inputs.config_file()).unwrap();

    let (result, _) = run(&inputs, &[]);
    let error = result.unwrap_err();
    assert_eq!(error.process_exit_code(), ReconcileExitCode::SETUP_ERROR);
}

#[test]
fn invalid_status_alias() {
    let inputs = TempInputs::new();
    inputs.write("reference.json", PYTEST_REFERENCE);
    inputs.write("run.log", PYTEST_LOG);
    inputs.write(
        "reconcile.toml",
        "[profile.default.status-aliases]\nGREEN = \"EMERALD\"\n",
    );

    let (result, stdout) = run(&inputs, &[]);
    let error = result.unwrap_err();
    assert_eq!(error.process_exit_code(), ReconcileExitCode::SETUP_ERROR);
    assert!(
        matches!(error, ExpectedError::ConfigParseError { .. }),
        "unexpected error: {error:?}"
    );
    assert!(stdout.is_empty(), "nothing is reported on failure");
}
