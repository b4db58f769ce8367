//! Error types for the host tester
//!
//! Messages follow the shape users see in the log, e.g.
//! `tests[2][execString] cannot be empty`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the host tester
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("'configName' cannot be empty")]
    MissingConfigName,

    #[error("tests[{index}][{field}] cannot be empty")]
    EmptyTestField { index: usize, field: &'static str },

    // === Execution Errors ===
    #[error("Not all tests passed ({failed} of {total} failed)")]
    TestsFailed { failed: usize, total: usize },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a file read error for the given path
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create an empty-field validation error for a test case
    pub fn empty_test_field(index: usize, field: &'static str) -> Self {
        Self::EmptyTestField { index, field }
    }
}
