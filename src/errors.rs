//! Error types for experiment preparation.
//!
//! Every failure the pipeline can hit surfaces as a [`KableError`]. Nothing is
//! recovered locally: scan errors abort the scan, runner errors abort the run,
//! and the caller decides how to report them.
//!
//! # Example
//!
//! ```rust
//! use kable::errors::KableError;
//!
//! let err = KableError::config("An OpenAI API key is required");
//! assert_eq!(err.code().as_str(), "E020");
//! assert!(err.is_user_fixable());
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
///
/// - E001-E009: I/O and filesystem errors
/// - E010-E019: Dataset record errors
/// - E020-E029: Configuration errors
/// - E030-E039: Runner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    pub const IO_GENERIC: ErrorCode = ErrorCode("E001");
    pub const RECORD_MALFORMED: ErrorCode = ErrorCode("E010");
    pub const RECORD_MISSING_SUBJECT: ErrorCode = ErrorCode("E011");
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    pub const RUNNER_MISSING_PROMPT: ErrorCode = ErrorCode("E030");
    pub const RUNNER_HTTP: ErrorCode = ErrorCode("E031");
    pub const RUNNER_ENCODING: ErrorCode = ErrorCode("E032");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum KableError {
    /// A dataset line is not a JSON object.
    #[error("malformed record at {}:{line}: {message}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A parsed record has no `subject` key.
    #[error("record at {}:{line} has no `subject` field", .path.display())]
    MissingSubjectField { path: PathBuf, line: usize },

    /// None of the recognised prompt fields hold usable text.
    #[error(
        "could not find a prompt field in the example from {}; looked for one of: {}",
        .source_file.display(),
        .fields.join(", ")
    )]
    MissingPromptField {
        source_file: PathBuf,
        fields: Vec<&'static str>,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Transport or status failure talking to a remote model endpoint.
    #[error("request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl KableError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn http(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(path: impl AsRef<Path>, line: usize, message: impl ToString) -> Self {
        Self::MalformedRecord {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedRecord { .. } => ErrorCode::RECORD_MALFORMED,
            Self::MissingSubjectField { .. } => ErrorCode::RECORD_MISSING_SUBJECT,
            Self::MissingPromptField { .. } => ErrorCode::RUNNER_MISSING_PROMPT,
            Self::Configuration(_) => ErrorCode::CONFIG_INVALID,
            Self::Io { .. } => ErrorCode::IO_GENERIC,
            Self::Http { .. } => ErrorCode::RUNNER_HTTP,
            Self::Json(_) => ErrorCode::RUNNER_ENCODING,
        }
    }

    /// Whether the user can fix the problem by editing the dataset or the
    /// invocation, as opposed to an environmental failure.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. }
                | Self::MissingSubjectField { .. }
                | Self::MissingPromptField { .. }
                | Self::Configuration(_)
        )
    }
}

pub type Result<T, E = KableError> = std::result::Result<T, E>;
