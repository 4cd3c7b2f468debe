// epsplit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use epsplit_core::config::{
    DEFAULT_LONG_FRACTION, DEFAULT_MAX_DURATION_RETRIES, MAX_DURATION_RETRIES, SplitConfigBuilder,
};
use epsplit_core::SplitConfig;
use std::path::{Path, PathBuf};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "epsplit: Split multi-episode MKV rips by chapter layout",
    long_about = "Detects episode boundaries from chapter timings (via mkvinfo) and splits the file with mkvmerge."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debugging (more output)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Log to FILE instead of the terminal
    #[arg(long, global = true, value_name = "FILE")]
    pub logfile: Option<PathBuf>,

    /// Emit newline-delimited JSON events instead of human-readable output
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detects the episodes of a file and splits it into one file per episode
    Split(SplitArgs),
    /// Prints the chapter table and classification without splitting
    Inspect(InspectArgs),
}

/// Options shared by every command that runs detection.
#[derive(Args, Debug, Clone)]
pub struct DetectionArgs {
    /// Expected length of one episode
    #[arg(long, value_name = "MINUTES", default_value_t = 23, env = "EPSPLIT_DURATION")]
    pub duration: u64,

    /// Minimum spread between chapter durations for a file to count as mixed
    #[arg(long, value_name = "MINUTES", default_value_t = 1, env = "EPSPLIT_DELTA")]
    pub delta: u64,

    /// Fraction of the episode length at which a chapter counts as long
    #[arg(long, value_name = "FRACTION", default_value_t = DEFAULT_LONG_FRACTION)]
    pub long_fraction: f64,

    /// How many alternative episode lengths to try when no shape matches (0 disables)
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_DURATION_RETRIES,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DURATION_RETRIES))
    )]
    pub retries: u32,

    /// mkvinfo executable used to read chapters
    #[arg(long, value_name = "PATH", default_value = "mkvinfo")]
    pub mkvinfo: PathBuf,

    /// Read chapters from a saved mkvinfo dump instead of running mkvinfo
    #[arg(long, value_name = "FILE")]
    pub chapters_from: Option<PathBuf>,
}

impl DetectionArgs {
    /// Builds the core detection config from the command-line values.
    pub fn to_config(&self) -> SplitConfig {
        SplitConfigBuilder::new()
            .show_duration_minutes(self.duration)
            .delta_threshold_minutes(self.delta)
            .long_fraction(self.long_fraction)
            .max_duration_retries(self.retries)
            .build()
    }
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Which file to split
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to save the split files (defaults to the directory of FILE)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// mkvmerge executable used to split
    #[arg(long, value_name = "PATH", default_value = "mkvmerge")]
    pub mkvmerge: PathBuf,

    /// Don't actually do it, just show what would happen
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl SplitArgs {
    /// Output directory, falling back to the directory holding the input.
    pub fn output_dir(&self) -> PathBuf {
        match &self.output {
            Some(dir) => dir.clone(),
            None => self
                .input
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf),
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Which file to inspect
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub detection: DetectionArgs,
}

/// Parses command-line arguments into the Cli structure.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
