use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
};
use std::path::Path;

/// Layout of one log line: time, source location, level, message.
pub const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {f}@{L} - {l} - {m}{n}";

/// Crates whose records are kept at the requested level; everything else is
/// capped at warn.
const OWN_TARGETS: [&str; 2] = ["epsplit_core", "epsplit"];

/// Routes log records at or above `log_level` to `log_file`, appending to it.
///
/// Installs the global logger, so it can only be called once per process.
pub fn setup_file_logging(log_file: &Path, log_level: LevelFilter) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory {}", parent.display())
            })?;
        }
    }

    let file_appender = FileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let mut builder =
        Config::builder().appender(Appender::builder().build("file", Box::new(file_appender)));
    for target in OWN_TARGETS {
        builder = builder.logger(Logger::builder().build(target, log_level));
    }
    let root_level = log_level.min(LevelFilter::Warn);
    let config = builder.build(Root::builder().appender("file").build(root_level))?;

    log4rs::init_config(config)?;

    Ok(())
}
