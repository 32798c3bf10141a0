// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use camino_tempfile::Utf8TempDir;
use indoc::indoc;

pub(super) const PYTEST_REFERENCE: &str = indoc! {r#"
    {"tests": [
        {"name": "tests/test_math.py::test_add", "status": "passed"},
        {"name": "tests/test_math.py::test_sub", "status": "failed"},
        {"name": "tests/test_math.py::test_div", "status": "skipped"}
    ]}
"#};

pub(super) const PYTEST_LOG: &str = indoc! {"
    ============================= test session starts ==============================
    collected 3 items

    tests/test_math.py::test_add PASSED                                      [ 33%]
    tests/test_math.py::test_sub RERUN                                       [ 66%]
    tests/test_math.py::test_sub FAILED                                      [ 66%]
    tests/test_math.py::test_div SKIPPED (no numpy)                          [100%]
"};

/// Same tests as [`PYTEST_LOG`], but `test_sub` passes and `test_div` never ran.
pub(super) const PYTEST_LOG_DIVERGED: &str = indoc! {"
    tests/test_math.py::test_add PASSED
    tests/test_math.py::test_sub PASSED
    tests/test_math.py::test_mul PASSED
"};

pub(super) const GTEST_REFERENCE_NDJSON: &str = indoc! {r#"
    {"name": "T.One", "status": "OK"}
    {"name": "T.Two", "status": "FAILED"}
"#};

pub(super) const GTEST_LOG: &str = indoc! {"
    [ RUN      ] T.One
    [       OK ] T.One (0 ms)
    [ RUN      ] T.Two
    [  FAILED  ] T.Two (1 ms)
    [  FAILED  ] 1 test, listed below:
    [  FAILED  ] T.Two
"};

/// A temporary directory holding the inputs and config of one invocation.
pub(super) struct TempInputs {
    dir: Utf8TempDir,
}

impl TempInputs {
    pub(super) fn new() -> Self {
        let dir = camino_tempfile::Builder::new()
            .prefix("test-reconcile-")
            .tempdir()
            .expect("created temp dir");
        let inputs = Self { dir };
        inputs.write("reconcile.toml", "# no overrides\n");
        inputs
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("wrote input file");
        path
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.dir.path().join(name)
    }

    pub(super) fn config_file(&self) -> Utf8PathBuf {
        self.path("reconcile.toml")
    }
}
