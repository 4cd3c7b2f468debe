//! Episode shape catalog and greedy longest-prefix matcher.
//!
//! A shape is the short/long layout of one known kind of episode, such as a
//! cold open followed by the main part (`short:long`). The matcher walks the
//! label stream left to right and at each position consumes the longest
//! eligible shape that fits.

use std::fmt;

use serde::Serialize;

use super::classify::{Label, join_labels};
use super::plan::EpisodeRange;
use crate::chapters::Chapter;
use crate::error::{CoreError, CoreResult};

use Label::{Long, Short};

/// One known episode layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape(pub &'static [Label]);

impl Shape {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, label: Label) -> bool {
        self.0.contains(&label)
    }

    /// Whether the shape is a prefix of `labels`.
    #[must_use]
    pub fn is_prefix_of(&self, labels: &[Label]) -> bool {
        labels.starts_with(self.0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_labels(self.0))
    }
}

/// Known layouts in declaration order. Order breaks ties between
/// equal-length matches.
pub const SHAPE_CATALOG: &[Shape] = &[
    Shape(&[Short, Long]),
    Shape(&[Short, Long, Long]),
    Shape(&[Short, Long, Long, Short]),
    Shape(&[Short, Short, Long, Long, Short]),
    Shape(&[Short, Long, Long, Short, Short]),
    Shape(&[Long, Long]),
];

/// Catalog entries compatible with the classification flags.
#[must_use]
pub fn eligible_shapes(has_short: bool, has_long: bool) -> Vec<Shape> {
    SHAPE_CATALOG
        .iter()
        .filter(|shape| has_short || !shape.contains(Short))
        .filter(|shape| has_long || !shape.contains(Long))
        .copied()
        .collect()
}

/// Longest shape that prefixes `labels`; the first declared wins a tie.
#[must_use]
pub fn longest_prefix_match(labels: &[Label], shapes: &[Shape]) -> Option<Shape> {
    let mut best: Option<Shape> = None;
    for shape in shapes {
        if shape.is_prefix_of(labels) && shape.len() > best.map_or(0, |b| b.len()) {
            best = Some(*shape);
        }
    }
    best
}

/// One consumed shape in the match trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchStep {
    /// Position in the filtered chapter list where the shape started
    pub position: usize,
    pub shape: Shape,
    pub episode: EpisodeRange,
}

/// Outcome of running the matcher over a whole label stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub steps: Vec<MatchStep>,
    /// Position of a single unmatched trailing chapter, if one was left
    pub tail_position: Option<usize>,
}

impl MatchOutcome {
    #[must_use]
    pub fn episodes(&self) -> Vec<EpisodeRange> {
        self.steps.iter().map(|step| step.episode).collect()
    }
}

/// Matches `labels` (one per entry of `chapters`) against `shapes`.
///
/// Stops with a one-chapter tail when nothing matches the last chapter, and
/// fails with `ShapeMismatch` when nothing matches two or more chapters.
pub fn match_shapes(
    chapters: &[Chapter],
    labels: &[Label],
    shapes: &[Shape],
) -> CoreResult<MatchOutcome> {
    debug_assert_eq!(chapters.len(), labels.len());

    let mut steps = Vec::new();
    let mut cursor = 0;

    while cursor < labels.len() {
        let remaining = labels.len() - cursor;
        match longest_prefix_match(&labels[cursor..], shapes) {
            Some(shape) => {
                let episode = EpisodeRange {
                    start: chapters[cursor].index,
                    end: chapters[cursor + shape.len() - 1].index,
                };
                steps.push(MatchStep {
                    position: cursor,
                    shape,
                    episode,
                });
                cursor += shape.len();
            }
            None if remaining < 2 => {
                return Ok(MatchOutcome {
                    steps,
                    tail_position: Some(cursor),
                });
            }
            None => {
                return Err(CoreError::ShapeMismatch {
                    chapter: chapters[cursor].index,
                    remaining,
                });
            }
        }
    }

    Ok(MatchOutcome {
        steps,
        tail_position: None,
    })
}
