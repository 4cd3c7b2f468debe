// ============================================================================
// epsplit-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with mkvinfo and mkvmerge
//
// This module encapsulates interactions with the MKVToolNix command-line
// tools. Reading chapters and splitting files both go through traits, so the
// detection pipeline can run against saved dumps or mocks in tests.
//
// KEY COMPONENTS:
// - ChapterSource: produces the ordered chapter boundary records of a file
// - Splitter: executes a cut plan against a file
// - SplitRequest / SplitProgress: the data exchanged with a Splitter
// - Dependency checking

// ---- Internal crate imports ----
use crate::chapters::{ChapterBoundary, ChapterList};
use crate::detection::CutPlan;
use crate::error::{CoreError, CoreResult};
use crate::utils::{numbered_output, output_template};

// ---- External crate imports ----
use serde::Serialize;

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// mkvinfo output parsing and chapter sources
pub mod mkvinfo;

/// mkvmerge command construction and execution
pub mod mkvmerge;

/// Mock implementations for tests
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use mkvinfo::{MkvinfoChapterSource, TextChapterSource, parse_mkvinfo_output};
pub use mkvmerge::{MkvmergeSplitter, parse_progress_percent};

// ============================================================================
// TRAITS
// ============================================================================

/// Source of chapter boundary records for a container file.
pub trait ChapterSource {
    /// Returns Start/End records in the order the container lists them.
    fn read_boundaries(&self, input: &Path) -> CoreResult<Vec<ChapterBoundary>>;

    /// Reads and parses the chapter list of `input`.
    fn read_chapters(&self, input: &Path) -> CoreResult<ChapterList> {
        let boundaries = self.read_boundaries(input)?;
        log::debug!(
            "Read {} chapter boundary records from {}",
            boundaries.len(),
            input.display()
        );
        ChapterList::from_boundaries(boundaries)
    }
}

/// Executes a cut plan against a container file.
pub trait Splitter {
    /// Full command line the splitter would run for `request`.
    fn command_line(&self, request: &SplitRequest) -> Vec<String>;

    /// Runs the split, reporting progress through `on_progress`.
    fn split(
        &self,
        request: &SplitRequest,
        on_progress: &mut dyn FnMut(&SplitProgress),
    ) -> CoreResult<()>;
}

// ============================================================================
// SPLIT REQUEST
// ============================================================================

/// Everything a splitter needs to cut one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRequest {
    pub input: PathBuf,
    /// Output name with a `%02d` placeholder for the file number
    pub output_template: PathBuf,
    /// Cut points in mkvmerge form, e.g. `chapters:3,5,7`
    pub split_spec: String,
    /// Number of files the split produces
    pub file_count: usize,
}

impl SplitRequest {
    /// Builds the request for splitting `input` into `output_dir` per `plan`.
    pub fn new(input: &Path, output_dir: &Path, plan: &CutPlan) -> CoreResult<Self> {
        Ok(Self {
            input: input.to_path_buf(),
            output_template: output_template(input, output_dir)?,
            split_spec: plan.split_spec(),
            file_count: plan.output_file_count(),
        })
    }

    /// Path of output file `number` (1-based).
    #[must_use]
    pub fn output_path(&self, number: usize) -> PathBuf {
        numbered_output(&self.output_template, number)
    }

    /// Paths of every file the split produces, in order.
    #[must_use]
    pub fn output_paths(&self) -> Vec<PathBuf> {
        (1..=self.file_count).map(|n| self.output_path(n)).collect()
    }
}

/// Progress of a running split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitProgress {
    /// Output file currently being written (1-based, 0 before the first)
    pub current_file: usize,
    pub total_files: usize,
    pub percent: f32,
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command can be started.
///
/// Runs `cmd_name version_arg` with output discarded; only the ability to
/// spawn the process matters, not its exit status.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - the command is not on the path
/// * `CoreError::CommandStart` - the command exists but could not start
pub fn check_dependency(cmd_name: &str, version_arg: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::warn!("Dependency '{}' not found.", cmd_name);
                Err(CoreError::DependencyNotFound(cmd_name.to_string()))
            } else {
                log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
                Err(CoreError::CommandStart(cmd_name.to_string(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::plan::{EpisodeRange, build_cut_plan};

    #[test]
    fn test_check_dependency_missing_command() {
        let result = check_dependency("epsplit-definitely-not-a-real-tool", "--version");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }

    #[test]
    fn test_split_request_paths() {
        let plan = build_cut_plan(
            &[EpisodeRange { start: 1, end: 2 }, EpisodeRange { start: 3, end: 4 }],
            5,
        )
        .unwrap();
        let request =
            SplitRequest::new(Path::new("/rips/Show Disc 1.mkv"), Path::new("/out"), &plan).unwrap();

        assert_eq!(request.split_spec, "chapters:3,5");
        assert_eq!(request.file_count, 3);
        assert_eq!(
            request.output_template,
            PathBuf::from("/out/Show Disc 1-%02d.mkv")
        );
        assert_eq!(
            request.output_paths(),
            vec![
                PathBuf::from("/out/Show Disc 1-01.mkv"),
                PathBuf::from("/out/Show Disc 1-02.mkv"),
                PathBuf::from("/out/Show Disc 1-03.mkv"),
            ]
        );
    }
}
