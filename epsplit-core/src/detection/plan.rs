//! Cut-plan construction.
//!
//! Turns resolved episode ranges into the chapter numbers mkvmerge should cut
//! before, and flags the leading/trailing output files that only hold junk.

use std::fmt;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Inclusive range of original chapter indices that make up one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeRange {
    pub start: usize,
    pub end: usize,
}

impl EpisodeRange {
    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.end - self.start + 1
    }
}

impl fmt::Display for EpisodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "chapter {}", self.start)
        } else {
            write!(f, "chapters {}-{}", self.start, self.end)
        }
    }
}

/// The sole artifact handed to the splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CutPlan {
    /// 1-based chapter numbers; the splitter cuts immediately before each
    pub cuts: Vec<usize>,
    /// The first output file is junk and is removed after splitting
    pub drop_first_segment: bool,
    /// The last output file is junk and is removed after splitting
    pub drop_last_segment: bool,
    /// Episode ranges the plan was built from
    pub episodes: Vec<EpisodeRange>,
}

impl CutPlan {
    /// True when the file already holds exactly one episode and nothing else.
    #[must_use]
    pub fn is_single_episode(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Number of files the splitter produces for this plan.
    #[must_use]
    pub fn output_file_count(&self) -> usize {
        self.cuts.len() + 1
    }

    /// 1-based numbers of output files to delete after the split.
    #[must_use]
    pub fn junk_file_numbers(&self) -> Vec<usize> {
        let mut numbers = Vec::new();
        if self.drop_first_segment {
            numbers.push(1);
        }
        if self.drop_last_segment {
            numbers.push(self.output_file_count());
        }
        numbers
    }

    /// Split specification in mkvmerge form, e.g. `chapters:3,5,7`.
    #[must_use]
    pub fn split_spec(&self) -> String {
        let cuts = self
            .cuts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("chapters:{cuts}")
    }
}

/// Builds the cut plan for `episodes` in a file of `original_chapter_count`
/// chapters (counted before any filtering).
pub fn build_cut_plan(episodes: &[EpisodeRange], original_chapter_count: usize) -> CoreResult<CutPlan> {
    let (Some(first), Some(last)) = (episodes.first(), episodes.last()) else {
        return Err(CoreError::ShapeMismatch {
            chapter: 1,
            remaining: original_chapter_count,
        });
    };

    if episodes.len() == 1 && first.start == 1 && first.end == original_chapter_count {
        return Ok(CutPlan {
            cuts: Vec::new(),
            drop_first_segment: false,
            drop_last_segment: false,
            episodes: episodes.to_vec(),
        });
    }

    let mut cuts: Vec<usize> = episodes
        .iter()
        .filter(|episode| episode.start != 1)
        .map(|episode| episode.start)
        .collect();

    let drop_last_segment = last.end != original_chapter_count;
    if drop_last_segment {
        cuts.push(last.end + 1);
    }
    let drop_first_segment = first.start != 1;

    Ok(CutPlan {
        cuts,
        drop_first_segment,
        drop_last_segment,
        episodes: episodes.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> EpisodeRange {
        EpisodeRange { start, end }
    }

    #[test]
    fn test_single_episode_spanning_file_needs_no_split() {
        let plan = build_cut_plan(&[range(1, 2)], 2).unwrap();
        assert!(plan.is_single_episode());
        assert!(!plan.drop_first_segment && !plan.drop_last_segment);
        assert!(plan.junk_file_numbers().is_empty());
    }

    #[test]
    fn test_interior_cuts() {
        let plan = build_cut_plan(&[range(1, 2), range(3, 4), range(5, 6), range(7, 8)], 8).unwrap();
        assert_eq!(plan.cuts, vec![3, 5, 7]);
        assert!(!plan.drop_first_segment && !plan.drop_last_segment);
        assert_eq!(plan.output_file_count(), 4);
        assert_eq!(plan.split_spec(), "chapters:3,5,7");
    }

    #[test]
    fn test_trailing_junk() {
        let plan = build_cut_plan(&[range(1, 2), range(3, 4)], 5).unwrap();
        assert_eq!(plan.cuts, vec![3, 5]);
        assert!(plan.drop_last_segment);
        assert_eq!(plan.junk_file_numbers(), vec![3]);
    }

    #[test]
    fn test_single_episode_with_trailing_junk_still_splits() {
        let plan = build_cut_plan(&[range(1, 2)], 3).unwrap();
        assert!(!plan.is_single_episode());
        assert_eq!(plan.cuts, vec![3]);
        assert!(plan.drop_last_segment);
    }

    #[test]
    fn test_leading_and_trailing_junk() {
        let plan = build_cut_plan(&[range(2, 3), range(4, 5)], 6).unwrap();
        assert_eq!(plan.cuts, vec![2, 4, 6]);
        assert!(plan.drop_first_segment && plan.drop_last_segment);
        assert_eq!(plan.output_file_count(), 4);
        assert_eq!(plan.junk_file_numbers(), vec![1, 4]);
    }

    #[test]
    fn test_no_episodes_is_a_mismatch() {
        assert!(matches!(
            build_cut_plan(&[], 3),
            Err(CoreError::ShapeMismatch { remaining: 3, .. })
        ));
    }

    #[test]
    fn test_range_display() {
        assert_eq!(range(3, 5).to_string(), "chapters 3-5");
        assert_eq!(range(4, 4).to_string(), "chapter 4");
        assert_eq!(range(3, 5).chapter_count(), 3);
    }
}
