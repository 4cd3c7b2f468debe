//! Short/long chapter classification.
//!
//! Every chapter gets a label from one global threshold. Separately, the
//! spread of durations decides whether the file is mixed or uniform, which
//! narrows the shapes the matcher may use.

use std::fmt;

use serde::Serialize;

use crate::chapters::Chapter;
use crate::error::{CoreError, CoreResult};

/// Classification label of one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Short,
    Long,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Short => f.write_str("short"),
            Label::Long => f.write_str("long"),
        }
    }
}

/// How the chapter durations of a file are spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Uniformity {
    /// Durations differ by more than the delta threshold
    Mixed,
    /// Durations are close together and all below the long threshold
    UniformShort,
    /// Durations are close together and the longest reaches the long threshold
    UniformLong,
}

/// Result of classifying a (filtered) chapter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub show_duration_ms: u64,
    pub long_duration_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub delta_ms: u64,
    pub uniformity: Uniformity,
    /// One label per chapter, in chapter order
    pub labels: Vec<Label>,
}

impl Classification {
    /// Whether shapes containing `short` may match.
    #[must_use]
    pub fn has_short(&self) -> bool {
        self.uniformity != Uniformity::UniformLong
    }

    /// Whether shapes containing `long` may match.
    #[must_use]
    pub fn has_long(&self) -> bool {
        self.uniformity != Uniformity::UniformShort
    }

    /// Labels joined with ':' (e.g. "short:long:long").
    #[must_use]
    pub fn layout(&self) -> String {
        join_labels(&self.labels)
    }
}

/// Joins labels with ':' for logs and summaries.
#[must_use]
pub fn join_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(":")
}

/// Labels a single duration against the long threshold.
#[must_use]
pub fn label_for(duration_ms: u64, long_duration_ms: u64) -> Label {
    if duration_ms >= long_duration_ms {
        Label::Long
    } else {
        Label::Short
    }
}

/// Classifies chapters against `long_duration_ms`.
///
/// Uniformity only decides which shapes are eligible; the per-chapter labels
/// always come straight from the threshold.
pub fn classify(
    chapters: &[Chapter],
    show_duration_ms: u64,
    long_duration_ms: u64,
    delta_threshold_ms: u64,
) -> CoreResult<Classification> {
    let min_duration_ms = chapters
        .iter()
        .map(Chapter::duration_ms)
        .min()
        .ok_or(CoreError::EmptyInput)?;
    let max_duration_ms = chapters
        .iter()
        .map(Chapter::duration_ms)
        .max()
        .ok_or(CoreError::EmptyInput)?;
    let delta_ms = max_duration_ms - min_duration_ms;

    let uniformity = if delta_ms > delta_threshold_ms {
        Uniformity::Mixed
    } else if max_duration_ms >= long_duration_ms {
        Uniformity::UniformLong
    } else {
        Uniformity::UniformShort
    };

    let labels = chapters
        .iter()
        .map(|c| label_for(c.duration_ms(), long_duration_ms))
        .collect();

    Ok(Classification {
        show_duration_ms,
        long_duration_ms,
        min_duration_ms,
        max_duration_ms,
        delta_ms,
        uniformity,
        labels,
    })
}
