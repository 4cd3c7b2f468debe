//! Implementation of the 'inspect' subcommand.

use crate::cli::InspectArgs;
use crate::commands::{chapter_source, validate_input};
use crate::error::CliResult;

use epsplit_core::reporting::Reporter;
use epsplit_core::{Inspection, inspect_file};

/// Prints the chapter table and classification of `args.input`.
pub fn run_inspect(args: &InspectArgs, reporter: &dyn Reporter) -> CliResult<Inspection> {
    validate_input(&args.input)?;
    let config = args.detection.to_config();
    config.validate()?;

    let source = chapter_source(&args.detection)?;
    inspect_file(source.as_ref(), reporter, &config, &args.input)
}
