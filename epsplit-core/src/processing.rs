// ============================================================================
// epsplit-core/src/processing.rs
// ============================================================================
//
// PROCESSING: End-to-end handling of one multi-episode file
//
// This module coordinates a full run: read the chapters through a
// ChapterSource, detect the episodes, then either stop (single episode or dry
// run) or hand the cut plan to a Splitter and remove the junk files it
// produced.
//
// WORKFLOW:
// 1. Read chapter boundaries and build the chapter list
// 2. Detect episodes and build the cut plan
// 3. Stop when the file already holds exactly one episode
// 4. Render the splitter command on a dry run
// 5. Otherwise split, then delete the leading/trailing junk files

// ---- Internal crate imports ----
use crate::config::SplitConfig;
use crate::detection::{self, Detection, Inspection};
use crate::error::CoreResult;
use crate::external::{ChapterSource, SplitRequest, Splitter};
use crate::reporting::{Reporter, SplitSummary};

// ---- External crate imports ----
use log::{debug, info, warn};
use serde::Serialize;

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Per-run options that do not affect detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Directory receiving the episode files
    pub output_dir: PathBuf,
    /// Render the splitter command instead of running it
    pub dry_run: bool,
}

/// What a run ended up doing with the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SplitAction {
    /// The file already holds one episode and nothing else
    NoSplitNeeded,
    /// Dry run; the command that would have been executed
    DryRun { command: Vec<String> },
    /// The file was split
    Split(SplitSummary),
}

/// Detection report plus the action taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitOutcome {
    pub detection: Detection,
    pub action: SplitAction,
}

/// Detects the episodes of `input` and splits it into `options.output_dir`.
///
/// The source file is never modified or removed.
pub fn split_file<C, S>(
    source: &C,
    splitter: &S,
    reporter: &dyn Reporter,
    config: &SplitConfig,
    input: &Path,
    options: &SplitOptions,
) -> CoreResult<SplitOutcome>
where
    C: ChapterSource + ?Sized,
    S: Splitter + ?Sized,
{
    info!("Processing {}", input.display());
    let chapters = source.read_chapters(input)?;
    info!("{} chapters found", chapters.len());
    reporter.chapters_loaded(input, &chapters);

    let detection = detection::detect_episodes(&chapters, config)?;
    if let detection::TailResolution::Dropped { chapter } = detection.tail {
        reporter.warning(&format!(
            "Chapter {} was left over and is treated as junk",
            chapter.index
        ));
    }
    reporter.detection_complete(&detection);

    let plan = &detection.plan;
    if plan.is_single_episode() {
        info!("This file holds ONE episode without any excess chapters, no need to split");
        reporter.no_split_needed(input);
        return Ok(SplitOutcome {
            detection,
            action: SplitAction::NoSplitNeeded,
        });
    }

    let request = SplitRequest::new(input, &options.output_dir, plan)?;
    debug!("Split right before chapters: {:?}", plan.cuts);

    if options.dry_run {
        let command = splitter.command_line(&request);
        info!("Would execute the following:");
        info!(" {}", command.join(" "));
        reporter.dry_run(&command);
        return Ok(SplitOutcome {
            detection,
            action: SplitAction::DryRun { command },
        });
    }

    fs::create_dir_all(&options.output_dir)?;
    let start = Instant::now();
    reporter.split_started(&request);
    splitter.split(&request, &mut |progress| reporter.split_progress(progress))?;

    let junk = plan.junk_file_numbers();
    let mut removed_files = Vec::with_capacity(junk.len());
    for number in &junk {
        let path = request.output_path(*number);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Removed junk file {}", path.display());
            removed_files.push(path);
        } else {
            warn!("Junk file {} was not produced", path.display());
            reporter.warning(&format!("Expected junk file {} is missing", path.display()));
        }
    }

    let episode_files: Vec<PathBuf> = (1..=request.file_count)
        .filter(|number| !junk.contains(number))
        .map(|number| request.output_path(number))
        .collect();

    let summary = SplitSummary {
        input: input.to_path_buf(),
        episode_files,
        removed_files,
        elapsed: start.elapsed(),
    };
    info!(
        "Split {} into {} episode files",
        input.display(),
        summary.episode_files.len()
    );
    reporter.split_complete(&summary);

    Ok(SplitOutcome {
        detection,
        action: SplitAction::Split(summary),
    })
}

/// Reads and classifies the chapters of `input` without matching or splitting.
pub fn inspect_file<C>(
    source: &C,
    reporter: &dyn Reporter,
    config: &SplitConfig,
    input: &Path,
) -> CoreResult<Inspection>
where
    C: ChapterSource + ?Sized,
{
    let chapters = source.read_chapters(input)?;
    reporter.chapters_loaded(input, &chapters);
    let inspection = detection::inspect(&chapters, config)?;
    reporter.inspection(&inspection);
    Ok(inspection)
}
