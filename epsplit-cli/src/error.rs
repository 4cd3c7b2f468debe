// ============================================================================
// epsplit-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses CoreError so that the process exit code is always decided by
// `CoreError::exit_code`. Context added here only wraps path problems, never
// detection failures, which keep their own exit codes.

// ---- Internal crate imports ----
use epsplit_core::reporting::ReporterError;
use epsplit_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;
use std::io;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Turns I/O failures into path errors, prefixed with lazily built context.
pub trait CliErrorContext<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T> CliErrorContext<T> for io::Result<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| CoreError::PathError(format!("{}: {}", f(), e)))
    }
}

// ============================================================================
// ERROR PRESENTATION
// ============================================================================

/// Builds the reporter message for a fatal error, with a hint where one helps.
pub fn to_reporter_error(error: &CoreError) -> ReporterError {
    let (title, suggestion) = match error {
        CoreError::Parse(_) => (
            "Malformed chapter metadata",
            Some("Check the mkvinfo output for this file"),
        ),
        CoreError::EmptyInput => ("No usable chapters", None),
        CoreError::ShapeMismatch { .. } => (
            "Unrecognized chapter layout",
            Some("Try a different --duration or inspect the chapters with `epsplit inspect`"),
        ),
        CoreError::SuspiciousTail { .. } => (
            "Suspicious leftover chapter",
            Some("The episode splits might be wrong; inspect the chapters before splitting"),
        ),
        CoreError::DependencyNotFound(_) => (
            "Missing dependency",
            Some("Install MKVToolNix or pass the executable with --mkvinfo/--mkvmerge"),
        ),
        CoreError::Config(_) => ("Invalid options", None),
        _ => ("Split failed", None),
    };

    ReporterError {
        title: title.to_string(),
        message: error.to_string(),
        context: None,
        suggestion: suggestion.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_context_keeps_source_message() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.cli_with_context(|| "Input file 'x.mkv'").unwrap_err();
        assert_eq!(err.to_string(), "Path error: Input file 'x.mkv': gone");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_reporter_error_suggests_fix_for_mismatch() {
        let err = CoreError::ShapeMismatch { chapter: 4, remaining: 2 };
        let report = to_reporter_error(&err);
        assert_eq!(report.title, "Unrecognized chapter layout");
        assert!(report.message.contains("chapter 4"));
        assert!(report.suggestion.is_some());
    }
}
