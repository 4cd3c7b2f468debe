// ============================================================================
// epsplit-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for SplitConfig
//
// This module implements the builder pattern for the SplitConfig structure,
// providing a fluent API for creating configurations from CLI flags, which
// are expressed in whole minutes, as well as from raw millisecond values.
//
// KEY COMPONENTS:
// - SplitConfigBuilder: Builder struct for creating SplitConfig instances
// - Minute-based setters mirroring the command-line flags

// ---- Internal crate imports ----
use super::SplitConfig;

/// Builder for creating SplitConfig instances.
///
/// # Examples
///
/// ```rust
/// use epsplit_core::config::SplitConfigBuilder;
///
/// let config = SplitConfigBuilder::new()
///     .show_duration_minutes(23)
///     .delta_threshold_minutes(1)
///     .long_fraction(1.0 / 3.0)
///     .build();
/// assert_eq!(config.long_duration_ms(), 460_000);
/// ```
#[derive(Debug, Clone)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl Default for SplitConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: SplitConfig::default(),
        }
    }

    /// Sets the expected episode length in milliseconds.
    pub fn show_duration_ms(mut self, ms: u64) -> Self {
        self.config.show_duration_ms = ms;
        self
    }

    /// Sets the expected episode length in minutes.
    pub fn show_duration_minutes(self, minutes: u64) -> Self {
        self.show_duration_ms(minutes.saturating_mul(60_000))
    }

    /// Sets the uniform/mixed spread threshold in milliseconds.
    pub fn delta_threshold_ms(mut self, ms: u64) -> Self {
        self.config.delta_threshold_ms = ms;
        self
    }

    /// Sets the uniform/mixed spread threshold in minutes.
    pub fn delta_threshold_minutes(self, minutes: u64) -> Self {
        self.delta_threshold_ms(minutes.saturating_mul(60_000))
    }

    /// Sets the fraction of the show duration that makes a chapter long.
    pub fn long_fraction(mut self, fraction: f64) -> Self {
        self.config.long_fraction = fraction;
        self
    }

    /// Sets how many perturbed show durations are tried after a mismatch.
    pub fn max_duration_retries(mut self, retries: u32) -> Self {
        self.config.max_duration_retries = retries;
        self
    }

    /// Builds the SplitConfig. Call `validate()` on the result before use.
    pub fn build(self) -> SplitConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DELTA_THRESHOLD_MS, DEFAULT_MAX_DURATION_RETRIES};

    #[test]
    fn test_builder_defaults_match_config_defaults() {
        assert_eq!(SplitConfigBuilder::new().build(), SplitConfig::default());
    }

    #[test]
    fn test_builder_minute_setters() {
        let config = SplitConfigBuilder::new()
            .show_duration_minutes(45)
            .delta_threshold_minutes(3)
            .build();
        assert_eq!(config.show_duration_ms, 2_700_000);
        assert_eq!(config.delta_threshold_ms, 180_000);
        assert_eq!(config.max_duration_retries, DEFAULT_MAX_DURATION_RETRIES);
    }

    #[test]
    fn test_builder_ms_setters_override() {
        let config = SplitConfigBuilder::new()
            .show_duration_ms(1_000)
            .max_duration_retries(0)
            .build();
        assert_eq!(config.show_duration_ms, 1_000);
        assert_eq!(config.delta_threshold_ms, DEFAULT_DELTA_THRESHOLD_MS);
        assert_eq!(config.max_duration_retries, 0);
    }
}
