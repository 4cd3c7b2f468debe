//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. The
//! helpers here cover what both commands share: validating the input file
//! and choosing where chapters are read from.

use crate::cli::DetectionArgs;
use crate::error::{CliErrorContext, CliResult};

use epsplit_core::external::{MkvinfoChapterSource, TextChapterSource};
use epsplit_core::utils::is_valid_video_file;
use epsplit_core::{ChapterSource, CoreError, check_dependency};

use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Module containing the implementation of the `split` command.
pub mod split;

/// Module containing the implementation of the `inspect` command.
pub mod inspect;

/// Checks that the input exists and is a regular file.
///
/// Files without an .mkv extension are accepted with a warning, since
/// mkvinfo/mkvmerge decide what they can read.
pub(crate) fn validate_input(input: &Path) -> CliResult<()> {
    let metadata = fs::metadata(input)
        .cli_with_context(|| format!("Invalid input path '{}'", input.display()))?;
    if !metadata.is_file() {
        return Err(CoreError::PathError(format!(
            "Input '{}' is not a file",
            input.display()
        )));
    }
    if !is_valid_video_file(input) {
        warn!("Input '{}' does not look like an .mkv file", input.display());
    }
    Ok(())
}

/// Chapter source for a run: a saved dump when given, mkvinfo otherwise.
pub(crate) fn chapter_source(args: &DetectionArgs) -> CliResult<Box<dyn ChapterSource>> {
    match &args.chapters_from {
        Some(dump) => {
            debug!("Reading chapters from dump {}", dump.display());
            Ok(Box::new(TextChapterSource::new(dump)))
        }
        None => {
            check_dependency(&args.mkvinfo.to_string_lossy(), "--version")?;
            Ok(Box::new(MkvinfoChapterSource::with_program(&args.mkvinfo)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_input(&dir.path().join("missing.mkv")),
            Err(CoreError::PathError(_))
        ));
        assert!(matches!(validate_input(dir.path()), Err(CoreError::PathError(_))));

        let file = dir.path().join("disc.mkv");
        fs::write(&file, b"").unwrap();
        assert!(validate_input(&file).is_ok());
    }
}
