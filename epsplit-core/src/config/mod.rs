//! Configuration structures and constants for the epsplit-core library.
//!
//! This module provides the tunables of episode detection: the expected
//! episode length, the spread that separates "mixed" from "uniform" files,
//! the fraction of an episode that makes a chapter "long", and the bound on
//! adaptive duration retries.

mod builder;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

pub use builder::SplitConfigBuilder;

// Default constants

/// Default expected length of one episode (23 minutes).
pub const DEFAULT_SHOW_DURATION_MS: u64 = 23 * 60_000;

/// Default maximum spread between the shortest and longest chapter for a file
/// to still count as uniform (1 minute).
pub const DEFAULT_DELTA_THRESHOLD_MS: u64 = 60_000;

/// Default fraction of the show duration at which a chapter counts as long.
/// 20/23 puts the line at 20 minutes for a 23 minute show.
pub const DEFAULT_LONG_FRACTION: f64 = 20.0 / 23.0;

/// Chapters shorter than this are logos, black frames and similar noise.
pub const NOISE_FLOOR_MS: u64 = 5_000;

/// A single unmatched trailing chapter longer than this aborts the run.
pub const TAIL_CEILING_MS: u64 = 120_000;

/// Default number of extra attempts with a perturbed show duration.
pub const DEFAULT_MAX_DURATION_RETRIES: u32 = 10;

/// Upper bound accepted for `max_duration_retries` (half an hour either way
/// at the default step).
pub const MAX_DURATION_RETRIES: u32 = 60;

/// Step by which each retry moves the show duration away from the base.
pub const DURATION_RETRY_STEP_MS: u64 = 60_000;

/// Main configuration structure for episode detection.
///
/// All fields have defaults matching typical 23 minute anime episodes.
///
/// # Examples
///
/// ```rust
/// use epsplit_core::config::SplitConfigBuilder;
///
/// let config = SplitConfigBuilder::new()
///     .show_duration_minutes(24)
///     .delta_threshold_minutes(2)
///     .max_duration_retries(0)
///     .build();
/// assert_eq!(config.show_duration_ms, 24 * 60_000);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitConfig {
    /// Expected length of one episode in milliseconds
    pub show_duration_ms: u64,

    /// Spread (max - min chapter duration) above which a file is "mixed"
    pub delta_threshold_ms: u64,

    /// Fraction of `show_duration_ms` at which a chapter becomes long
    pub long_fraction: f64,

    /// Extra attempts with a perturbed show duration after a shape mismatch
    /// (0 disables adaptive re-estimation)
    pub max_duration_retries: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            show_duration_ms: DEFAULT_SHOW_DURATION_MS,
            delta_threshold_ms: DEFAULT_DELTA_THRESHOLD_MS,
            long_fraction: DEFAULT_LONG_FRACTION,
            max_duration_retries: DEFAULT_MAX_DURATION_RETRIES,
        }
    }
}

impl SplitConfig {
    /// Chapter duration at or above which a chapter is labelled long.
    #[must_use]
    pub fn long_duration_ms(&self) -> u64 {
        long_duration_for(self.show_duration_ms, self.long_fraction)
    }

    /// Checks that the configuration can produce a meaningful classification.
    pub fn validate(&self) -> CoreResult<()> {
        if self.show_duration_ms == 0 {
            return Err(CoreError::Config(
                "show duration must be greater than zero".to_string(),
            ));
        }
        if !self.long_fraction.is_finite() || self.long_fraction <= 0.0 || self.long_fraction > 1.0
        {
            return Err(CoreError::Config(format!(
                "long fraction must be within (0, 1], got {}",
                self.long_fraction
            )));
        }
        if self.max_duration_retries > MAX_DURATION_RETRIES {
            return Err(CoreError::Config(format!(
                "duration retries must be at most {}, got {}",
                MAX_DURATION_RETRIES, self.max_duration_retries
            )));
        }
        if self.long_duration_ms() == 0 {
            return Err(CoreError::Config(
                "show duration is too short to derive a long-chapter threshold".to_string(),
            ));
        }
        Ok(())
    }
}

/// Long-chapter threshold for a given show duration, rounded to the millisecond.
#[must_use]
pub fn long_duration_for(show_duration_ms: u64, long_fraction: f64) -> u64 {
    (show_duration_ms as f64 * long_fraction).round() as u64
}
