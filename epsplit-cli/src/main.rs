// ============================================================================
// epsplit-cli/src/main.rs
// ============================================================================
//
// MAIN ENTRY POINT: epsplit Command-Line Application
//
// Parses the arguments, sets up logging (terminal or --logfile), selects the
// reporter, and dispatches to the requested command. Failures are reported
// once and turned into the exit code that matches the error kind.

use epsplit::error::to_reporter_error;
use epsplit::logging::{init_console_logging, level_for};
use epsplit::{Commands, parse_cli, run_inspect, run_split};
use epsplit_core::file_logging::setup_file_logging;
use epsplit_core::reporting::{JsonReporter, Reporter, TerminalReporter};

use log::error;

fn main() {
    let cli = parse_cli();
    let level = level_for(cli.debug);

    let logging = match &cli.logfile {
        Some(path) => setup_file_logging(path, level).map_err(|e| e.to_string()),
        None => init_console_logging(level).map_err(|e| e.to_string()),
    };
    if let Err(e) = logging {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let reporter: Box<dyn Reporter> = if cli.json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(TerminalReporter::new())
    };

    let result = match &cli.command {
        Commands::Split(args) => run_split(args, reporter.as_ref()).map(|_| ()),
        Commands::Inspect(args) => run_inspect(args, reporter.as_ref()).map(|_| ()),
    };

    if let Err(e) = result {
        error!("{e}");
        reporter.error(&to_reporter_error(&e));
        std::process::exit(e.exit_code());
    }
}
