//! Implementation of the 'split' subcommand.
//!
//! Validates the input, checks for the MKVToolNix executables the run needs,
//! and hands the file to the core split pipeline.

use crate::cli::SplitArgs;
use crate::commands::{chapter_source, validate_input};
use crate::error::CliResult;

use epsplit_core::external::MkvmergeSplitter;
use epsplit_core::reporting::Reporter;
use epsplit_core::{SplitAction, SplitOptions, SplitOutcome, check_dependency, split_file};

use log::{debug, info};

/// Runs detection on `args.input` and splits it unless this is a dry run.
pub fn run_split(args: &SplitArgs, reporter: &dyn Reporter) -> CliResult<SplitOutcome> {
    validate_input(&args.input)?;
    let config = args.detection.to_config();
    config.validate()?;
    debug!("Detection config: {:?}", config);

    let source = chapter_source(&args.detection)?;
    if !args.dry_run {
        check_dependency(&args.mkvmerge.to_string_lossy(), "--version")?;
    }
    let splitter = MkvmergeSplitter::with_program(&args.mkvmerge);

    let options = SplitOptions {
        output_dir: args.output_dir(),
        dry_run: args.dry_run,
    };
    info!("Output directory: {}", options.output_dir.display());

    let outcome = split_file(
        source.as_ref(),
        &splitter,
        reporter,
        &config,
        &args.input,
        &options,
    )?;

    if let SplitAction::Split(summary) = &outcome.action {
        info!(
            "Done: {} episode file(s) written",
            summary.episode_files.len()
        );
    }
    Ok(outcome)
}
