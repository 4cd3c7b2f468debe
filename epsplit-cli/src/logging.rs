// ============================================================================
// epsplit-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Console logger setup and helpers
//
// The CLI logs through the standard `log` facade. Without --logfile, records
// go to stderr through a fern dispatch so that stdout stays free for the
// reporter output (and for JSON events in --json mode). With --logfile, the
// core's log4rs file appender is used instead.
//
// LEVELS:
// - info (default): what was detected and what is being done
// - debug (--debug): chapter tables, labels, shape steps

use console::style;
use log::{Level, LevelFilter};

/// Log level selected by the --debug flag.
pub fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn styled_level(level: Level) -> String {
    let name = format!("{:<5}", level);
    match level {
        Level::Error => style(name).red().bold().to_string(),
        Level::Warn => style(name).yellow().bold().to_string(),
        Level::Info => style(name).green().to_string(),
        Level::Debug => style(name).blue().to_string(),
        Level::Trace => style(name).dim().to_string(),
    }
}

/// Installs the stderr console logger.
///
/// Dependency crates are capped at warn so their chatter does not drown out
/// the detection log at debug level.
pub fn init_console_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} {}",
                style(chrono::Local::now().format("%H:%M:%S")).dim(),
                styled_level(record.level()),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("epsplit_core", level)
        .level_for("epsplit", level)
        .chain(std::io::stderr())
        .apply()
}
