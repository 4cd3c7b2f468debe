//! Outlier rejection and leftover handling.
//!
//! Sub-floor chapters are removed before classification. After matching, a
//! single leftover chapter is either junk (dropped) or a sign the heuristic
//! went wrong earlier (fatal).

use serde::Serialize;

use super::shapes::MatchOutcome;
use crate::chapters::{Chapter, ChapterList};
use crate::error::{CoreError, CoreResult};

/// Chapters that survived the noise floor, plus what was removed.
///
/// Chapters keep their original `index`; the position in `kept` is the
/// compact counter the matcher works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredChapters {
    pub original_count: usize,
    pub kept: Vec<Chapter>,
    pub removed: Vec<Chapter>,
}

/// Removes every chapter shorter than `noise_floor_ms`.
///
/// Fails with `EmptyInput` when nothing survives.
pub fn reject_outliers(chapters: &ChapterList, noise_floor_ms: u64) -> CoreResult<FilteredChapters> {
    let (kept, removed): (Vec<Chapter>, Vec<Chapter>) = chapters
        .iter()
        .copied()
        .partition(|chapter| chapter.duration_ms() >= noise_floor_ms);

    if kept.is_empty() {
        return Err(CoreError::EmptyInput);
    }

    Ok(FilteredChapters {
        original_count: chapters.len(),
        kept,
        removed,
    })
}

/// What happened to the chapters the matcher could not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TailResolution {
    /// Every chapter belongs to an episode
    Clean,
    /// One short trailing chapter was discarded as junk
    Dropped { chapter: Chapter },
}

/// Decides the fate of the matcher's unmatched tail, if any.
pub fn resolve_tail(
    outcome: &MatchOutcome,
    chapters: &[Chapter],
    ceiling_ms: u64,
) -> CoreResult<TailResolution> {
    let Some(position) = outcome.tail_position else {
        return Ok(TailResolution::Clean);
    };
    let chapter = chapters[position];

    if chapter.duration_ms() > ceiling_ms {
        return Err(CoreError::SuspiciousTail {
            chapter: chapter.index,
            duration_ms: chapter.duration_ms(),
        });
    }
    Ok(TailResolution::Dropped { chapter })
}
