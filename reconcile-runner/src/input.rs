// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading the two inputs of a reconciliation off disk.

use crate::errors::InputError;
use camino::Utf8Path;
use std::fmt;

/// Which of the two inputs a file is.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum InputLabel {
    /// The structured reference result set.
    Reference,

    /// The free-form execution log.
    Log,
}

impl fmt::Display for InputLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLabel::Reference => write!(f, "reference file"),
            InputLabel::Log => write!(f, "log file"),
        }
    }
}

/// Reads an input file, rejecting paths that can't hold a usable input.
///
/// Missing paths, directories, zero-length files and whitespace-only files are all rejected
/// with an error naming `label`. Invalid UTF-8 is replaced, never fatal.
pub fn read_input(path: &Utf8Path, label: InputLabel) -> Result<String, InputError> {
    let metadata = match path.metadata() {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::NotFound {
                label,
                path: path.to_owned(),
            });
        }
        Err(err) => {
            return Err(InputError::Read {
                label,
                path: path.to_owned(),
                err,
            });
        }
    };

    if metadata.is_dir() {
        return Err(InputError::IsDirectory {
            label,
            path: path.to_owned(),
        });
    }
    if metadata.len() == 0 {
        return Err(InputError::Empty {
            label,
            path: path.to_owned(),
        });
    }

    let bytes = std::fs::read(path).map_err(|err| InputError::Read {
        label,
        path: path.to_owned(),
        err,
    })?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if text.trim().is_empty() {
        return Err(InputError::WhitespaceOnly {
            label,
            path: path.to_owned(),
        });
    }

    tracing::debug!("read {} bytes from {label} `{path}`", bytes.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;

    #[test]
    fn rejects_unusable_paths() {
        let dir = Utf8TempDir::new().unwrap();

        let missing = dir.path().join("missing.json");
        let err = read_input(&missing, InputLabel::Reference).unwrap_err();
        assert!(matches!(err, InputError::NotFound { .. }), "{err:?}");
        assert_eq!(err.label(), InputLabel::Reference);

        let err = read_input(dir.path(), InputLabel::Log).unwrap_err();
        assert!(matches!(err, InputError::IsDirectory { .. }), "{err:?}");

        let empty = dir.path().join("empty.log");
        std::fs::write(&empty, "").unwrap();
        let err = read_input(&empty, InputLabel::Log).unwrap_err();
        assert!(matches!(err, InputError::Empty { .. }), "{err:?}");
        assert_eq!(err.to_string(), format!("log file is empty: {empty}"));

        let blank = dir.path().join("blank.log");
        std::fs::write(&blank, " \n\t\n").unwrap();
        let err = read_input(&blank, InputLabel::Log).unwrap_err();
        assert!(matches!(err, InputError::WhitespaceOnly { .. }), "{err:?}");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = Utf8TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, b"a PASSED \xff\n").unwrap();
        let text = read_input(&path, InputLabel::Log).unwrap();
        assert_eq!(text, "a PASSED \u{fffd}\n");
    }
}
