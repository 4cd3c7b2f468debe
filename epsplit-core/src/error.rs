//! Error types for epsplit-core.
//!
//! Every fatal outcome of a run is a `CoreError`. The four detection failures
//! (`Parse`, `EmptyInput`, `ShapeMismatch`, `SuspiciousTail`) each map to their
//! own process exit code so wrappers can tell them apart.

use std::io;
use thiserror::Error;

/// Custom error types for epsplit
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed chapter metadata: {0}")]
    Parse(String),

    #[error("No usable chapters found; the file cannot be split")]
    EmptyInput,

    #[error(
        "Could not resolve shape: {remaining} chapter(s) left unmatched starting at chapter {chapter}"
    )]
    ShapeMismatch { chapter: usize, remaining: usize },

    #[error(
        "Remaining chapter {chapter} is {} long, which might mean the splits were mismatched",
        tail_length(.duration_ms)
    )]
    SuspiciousTail { chapter: usize, duration_ms: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Required tool '{0}' was not found in PATH")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("'{command}' exited with status {status}: {output}")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },

    #[error("Path error: {0}")]
    PathError(String),
}

impl CoreError {
    /// Process exit code for this error.
    ///
    /// Detection failures get dedicated codes; environment failures share `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Parse(_) => 2,
            CoreError::EmptyInput => 3,
            CoreError::ShapeMismatch { .. } => 4,
            CoreError::SuspiciousTail { .. } => 5,
            _ => 1,
        }
    }

    /// Whether a different show duration could plausibly change the outcome.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::ShapeMismatch { .. })
    }
}

fn tail_length(duration_ms: &u64) -> String {
    crate::utils::format_ms(*duration_ms)
}

/// Result type for epsplit operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error, mapping "not found" to `DependencyNotFound`.
pub fn command_start_error(command: &str, err: io::Error) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(command.to_string())
    } else {
        CoreError::CommandStart(command.to_string(), err)
    }
}

/// Builds a `CommandFailed` error from an exit code and captured output.
pub fn command_failed_error(command: &str, status: Option<i32>, output: &str) -> CoreError {
    CoreError::CommandFailed {
        command: command.to_string(),
        status: status.unwrap_or(-1),
        output: output.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_for_detection_failures() {
        let codes = [
            CoreError::Parse("bad".into()).exit_code(),
            CoreError::EmptyInput.exit_code(),
            CoreError::ShapeMismatch { chapter: 3, remaining: 2 }.exit_code(),
            CoreError::SuspiciousTail { chapter: 9, duration_ms: 150_000 }.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            assert_ne!(*a, 1);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(CoreError::Config("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_suspicious_tail_message_uses_timestamp() {
        let err = CoreError::SuspiciousTail { chapter: 9, duration_ms: 150_000 };
        assert!(err.to_string().contains("00:02:30.000"));
    }

    #[test]
    fn test_command_start_error_not_found() {
        let err = command_start_error("mkvinfo", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, CoreError::DependencyNotFound(ref name) if name == "mkvinfo"));

        let err = command_start_error("mkvinfo", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, CoreError::CommandStart(..)));
    }

    #[test]
    fn test_only_shape_mismatch_is_retryable() {
        assert!(CoreError::ShapeMismatch { chapter: 1, remaining: 2 }.is_retryable());
        assert!(!CoreError::SuspiciousTail { chapter: 1, duration_ms: 1 }.is_retryable());
        assert!(!CoreError::EmptyInput.is_retryable());
    }
}
