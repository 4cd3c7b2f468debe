//! Episode detection from chapter timings.
//!
//! This module wires the detection stages together:
//!
//! 1. `resolve::reject_outliers` drops sub-floor chapters
//! 2. `classify::classify` labels the rest short/long
//! 3. `shapes::match_shapes` consumes the labels shape by shape
//! 4. `resolve::resolve_tail` deals with a single leftover chapter
//! 5. `plan::build_cut_plan` produces the cut points
//!
//! Steps 2-5 run inside a bounded loop: when the stream cannot be matched at
//! the configured show duration, nearby durations are tried before giving up.
//! Every stage returns a structured value; `Detection` collects them so
//! callers can render or log whatever they need.

pub mod classify;
pub mod plan;
pub mod resolve;
pub mod shapes;

use log::{debug, info, warn};
use serde::Serialize;

use crate::chapters::{Chapter, ChapterList};
use crate::config::{
    DURATION_RETRY_STEP_MS, NOISE_FLOOR_MS, SplitConfig, TAIL_CEILING_MS, long_duration_for,
};
use crate::error::{CoreError, CoreResult};
use crate::utils::format_ms;

pub use classify::{Classification, Label, Uniformity};
pub use plan::{CutPlan, EpisodeRange};
pub use resolve::{FilteredChapters, TailResolution};
pub use shapes::{MatchOutcome, MatchStep, SHAPE_CATALOG, Shape};

/// One classification + matching pass at a given show duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub show_duration_ms: u64,
    pub long_duration_ms: u64,
    /// Number of episodes resolved, when the attempt succeeded
    pub episodes: Option<usize>,
    /// Failure message, when the attempt failed
    pub error: Option<String>,
}

/// Full result of detecting episodes in one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub filtered: FilteredChapters,
    pub classification: Classification,
    pub matched: MatchOutcome,
    pub tail: TailResolution,
    pub plan: CutPlan,
    /// Every pass that was run, the successful one last
    pub attempts: Vec<Attempt>,
    /// Episode count suggested by file duration / show duration
    pub estimated_episode_count: u64,
}

impl Detection {
    #[must_use]
    pub fn episode_count(&self) -> usize {
        self.plan.episodes.len()
    }

    /// Show duration of the attempt that produced this detection.
    #[must_use]
    pub fn show_duration_ms(&self) -> u64 {
        self.classification.show_duration_ms
    }
}

/// Result of the stages that depend on the show duration.
struct Resolution {
    classification: Classification,
    matched: MatchOutcome,
    tail: TailResolution,
    plan: CutPlan,
}

/// Detects the episodes of a file and builds its cut plan.
pub fn detect_episodes(chapters: &ChapterList, config: &SplitConfig) -> CoreResult<Detection> {
    config.validate()?;

    let filtered = resolve::reject_outliers(chapters, NOISE_FLOOR_MS)?;
    for chapter in &filtered.removed {
        debug!(
            "Ignoring chapter {} ({}), below the {} noise floor",
            chapter.index,
            format_ms(chapter.duration_ms()),
            format_ms(NOISE_FLOOR_MS)
        );
    }
    debug!(
        "{} of {} chapters remain after outlier rejection",
        filtered.kept.len(),
        filtered.original_count
    );

    let estimated_episode_count = estimate_episode_count(chapters, config.show_duration_ms);
    debug!(
        "Number of episodes based on file duration and show duration: {}",
        estimated_episode_count
    );

    let schedule = duration_schedule(
        config.show_duration_ms,
        DURATION_RETRY_STEP_MS,
        config.max_duration_retries,
    );
    let mut attempts = Vec::with_capacity(schedule.len());
    let mut first_error: Option<CoreError> = None;

    for (attempt_number, &show_duration_ms) in schedule.iter().enumerate() {
        let long_duration_ms = long_duration_for(show_duration_ms, config.long_fraction);
        if attempt_number > 0 {
            debug!(
                "Retrying with a show duration of {} (long chapters from {})",
                format_ms(show_duration_ms),
                format_ms(long_duration_ms)
            );
        }

        match resolve_at(&filtered, show_duration_ms, long_duration_ms, config.delta_threshold_ms) {
            Ok(resolution) => {
                attempts.push(Attempt {
                    show_duration_ms,
                    long_duration_ms,
                    episodes: Some(resolution.plan.episodes.len()),
                    error: None,
                });
                info!("Found {} episodes", resolution.plan.episodes.len());
                debug!(
                    "Final episode count is {}, compared to {} if using duration as indicator",
                    resolution.plan.episodes.len(),
                    estimated_episode_count
                );
                return Ok(Detection {
                    filtered,
                    classification: resolution.classification,
                    matched: resolution.matched,
                    tail: resolution.tail,
                    plan: resolution.plan,
                    attempts,
                    estimated_episode_count,
                });
            }
            Err(err) => {
                attempts.push(Attempt {
                    show_duration_ms,
                    long_duration_ms,
                    episodes: None,
                    error: Some(err.to_string()),
                });
                match first_error {
                    None if !err.is_retryable() => return Err(err),
                    None => {
                        warn!("{}", err);
                        first_error = Some(err);
                    }
                    Some(_) => debug!("Attempt {} failed: {}", attempt_number, err),
                }
            }
        }
    }

    // The schedule always holds the configured duration, so a failure was recorded
    Err(first_error.unwrap_or(CoreError::EmptyInput))
}

fn resolve_at(
    filtered: &FilteredChapters,
    show_duration_ms: u64,
    long_duration_ms: u64,
    delta_threshold_ms: u64,
) -> CoreResult<Resolution> {
    let chapters = &filtered.kept;
    let classification =
        classify::classify(chapters, show_duration_ms, long_duration_ms, delta_threshold_ms)?;
    debug!(
        "Difference between shortest and longest: {}",
        format_ms(classification.delta_ms)
    );
    debug!("{} is the limit for a long chapter", format_ms(long_duration_ms));
    debug!("Chapter layout: {}", classification.layout());

    let shapes = shapes::eligible_shapes(classification.has_short(), classification.has_long());
    let matched = shapes::match_shapes(chapters, &classification.labels, &shapes)?;
    for step in &matched.steps {
        debug!("Episode layout: {} ({})", step.shape, step.episode);
    }

    let tail = resolve::resolve_tail(&matched, chapters, TAIL_CEILING_MS)?;
    if let TailResolution::Dropped { chapter } = tail {
        warn!(
            "One chapter left and it's only {} long, most likely not an episode",
            format_ms(chapter.duration_ms())
        );
    }

    let episodes = matched.episodes();
    if episodes.is_empty() {
        return Err(CoreError::ShapeMismatch {
            chapter: chapters[0].index,
            remaining: chapters.len(),
        });
    }
    let plan = plan::build_cut_plan(&episodes, filtered.original_count)?;

    Ok(Resolution {
        classification,
        matched,
        tail,
        plan,
    })
}

/// One row of a chapter inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InspectedChapter {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub duration_ms: u64,
    /// Label at the configured show duration; `None` for filtered chapters
    pub label: Option<Label>,
    /// Removed by the noise floor
    pub filtered: bool,
}

/// Chapter table plus classification, without matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub chapters: Vec<InspectedChapter>,
    pub classification: Classification,
    pub estimated_episode_count: u64,
}

/// Classifies the chapters of a file at the configured show duration only.
pub fn inspect(chapters: &ChapterList, config: &SplitConfig) -> CoreResult<Inspection> {
    config.validate()?;
    let filtered = resolve::reject_outliers(chapters, NOISE_FLOOR_MS)?;
    let classification = classify::classify(
        &filtered.kept,
        config.show_duration_ms,
        config.long_duration_ms(),
        config.delta_threshold_ms,
    )?;

    let mut labels = filtered
        .kept
        .iter()
        .map(|c| c.index)
        .zip(classification.labels.iter().copied());
    let mut next_label = labels.next();
    let rows = chapters
        .iter()
        .map(|chapter| {
            let label = match next_label {
                Some((index, label)) if index == chapter.index => {
                    next_label = labels.next();
                    Some(label)
                }
                _ => None,
            };
            InspectedChapter {
                chapter: *chapter,
                duration_ms: chapter.duration_ms(),
                label,
                filtered: label.is_none(),
            }
        })
        .collect();

    Ok(Inspection {
        chapters: rows,
        classification,
        estimated_episode_count: estimate_episode_count(chapters, config.show_duration_ms),
    })
}

/// Show durations to try, in order: the base, then alternately one step
/// below and above it, moving outwards, `retries` extra values in total.
/// Non-positive candidates are skipped.
#[must_use]
pub fn duration_schedule(base_ms: u64, step_ms: u64, retries: u32) -> Vec<u64> {
    let mut schedule = vec![base_ms];
    if step_ms == 0 {
        return schedule;
    }

    let mut distance = step_ms;
    while schedule.len() <= retries as usize {
        if distance < base_ms {
            schedule.push(base_ms - distance);
            if schedule.len() > retries as usize {
                break;
            }
        }
        schedule.push(base_ms + distance);
        distance += step_ms;
    }
    schedule
}

/// Rounded file duration divided by the show duration.
#[must_use]
pub fn estimate_episode_count(chapters: &ChapterList, show_duration_ms: u64) -> u64 {
    if show_duration_ms == 0 {
        return 0;
    }
    (chapters.total_duration_ms() as f64 / show_duration_ms as f64).round() as u64
}
