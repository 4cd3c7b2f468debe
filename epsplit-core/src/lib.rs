//! Core library for splitting multi-episode MKV rips by chapter layout.
//!
//! This crate reads chapter timings, classifies each chapter as short or long,
//! matches the label stream against known episode shapes, and turns the
//! result into a cut plan that mkvmerge can execute.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use epsplit_core::{SplitConfig, SplitOptions, split_file};
//! use epsplit_core::external::{MkvinfoChapterSource, MkvmergeSplitter};
//! use epsplit_core::reporting::TerminalReporter;
//! use std::path::{Path, PathBuf};
//!
//! let config = SplitConfig::default();
//! config.validate().unwrap();
//!
//! let outcome = split_file(
//!     &MkvinfoChapterSource::new(),
//!     &MkvmergeSplitter::new(),
//!     &TerminalReporter::new(),
//!     &config,
//!     Path::new("/rips/disc1.mkv"),
//!     &SplitOptions { output_dir: PathBuf::from("/episodes"), dry_run: false },
//! ).unwrap();
//! println!("{} episodes", outcome.detection.episode_count());
//! ```

pub mod chapters;
pub mod config;
pub mod detection;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod processing;
pub mod reporting;
pub mod utils;

// Re-exports for public API
pub use chapters::{Chapter, ChapterBoundary, ChapterList};
pub use config::{SplitConfig, SplitConfigBuilder};
pub use detection::{CutPlan, Detection, EpisodeRange, Inspection, detect_episodes, inspect};
pub use error::{CoreError, CoreResult};
pub use external::{ChapterSource, Splitter, check_dependency};
pub use processing::{SplitAction, SplitOptions, SplitOutcome, inspect_file, split_file};
pub use utils::format_ms;
