// ============================================================================
// epsplit-core/src/chapters.rs
// ============================================================================
//
// CHAPTER MODEL: Parsed Chapter Records and Chapter Lists
//
// This module turns the ordered Start/End timestamp records reported by a
// chapter source into immutable `Chapter` values with 1-based indices and
// millisecond durations.
//
// KEY COMPONENTS:
// - ChapterBoundary: one raw Start or End record
// - Chapter: one parsed chapter (index, start, end)
// - ChapterList: the full ordered list for one file
// - parse_timestamp: HH:MM:SS.mmm -> milliseconds

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::error::{CoreError, CoreResult};

/// One raw chapter boundary record, in the order the source reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterBoundary {
    Start(String),
    End(String),
}

/// A single chapter of the source container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// 1-based position in the original source order
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Chapter {
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// All chapters of one file, in source order. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterList {
    chapters: Vec<Chapter>,
}

impl ChapterList {
    /// Pairs Start/End records by appearance order and parses their timestamps.
    ///
    /// An `End` without a pending `Start` is ignored. Of two consecutive
    /// `Start`s the later one is used.
    pub fn from_boundaries<I>(boundaries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = ChapterBoundary>,
    {
        let mut chapters = Vec::new();
        let mut pending_start: Option<u64> = None;

        for boundary in boundaries {
            match boundary {
                ChapterBoundary::Start(ts) => {
                    pending_start = Some(parse_timestamp(&ts)?);
                }
                ChapterBoundary::End(ts) => {
                    let end_ms = parse_timestamp(&ts)?;
                    let Some(start_ms) = pending_start.take() else {
                        log::debug!("Ignoring chapter end {} without a start", ts);
                        continue;
                    };
                    let index = chapters.len() + 1;
                    if end_ms < start_ms {
                        return Err(CoreError::Parse(format!(
                            "chapter {index} ends ({ts}) before it starts"
                        )));
                    }
                    chapters.push(Chapter {
                        index,
                        start_ms,
                        end_ms,
                    });
                }
            }
        }

        Self::from_chapters(chapters)
    }

    /// Builds contiguous chapters starting at zero from a list of durations.
    pub fn from_durations(durations_ms: &[u64]) -> CoreResult<Self> {
        let mut start_ms = 0;
        let chapters = durations_ms
            .iter()
            .enumerate()
            .map(|(i, &duration)| {
                let chapter = Chapter {
                    index: i + 1,
                    start_ms,
                    end_ms: start_ms + duration,
                };
                start_ms = chapter.end_ms;
                chapter
            })
            .collect();
        Self::from_chapters(chapters)
    }

    fn from_chapters(chapters: Vec<Chapter>) -> CoreResult<Self> {
        if chapters.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        Ok(Self { chapters })
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// End of the last chapter, used as the file duration.
    #[must_use]
    pub fn total_duration_ms(&self) -> u64 {
        self.chapters.last().map_or(0, |c| c.end_ms)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }
}

impl<'a> IntoIterator for &'a ChapterList {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.chapters.iter()
    }
}

/// Two-digit clock fields, then at least three fractional digits; only the
/// first three are captured.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d{3})\d*$").expect("timestamp pattern is valid")
});

/// Parses `HH:MM:SS.mmm` into milliseconds.
///
/// Extra fractional digits (mkvinfo prints nanoseconds) are accepted and
/// truncated to milliseconds.
pub fn parse_timestamp(input: &str) -> CoreResult<u64> {
    let invalid = || CoreError::Parse(format!("invalid timestamp '{input}', expected HH:MM:SS.mmm"));

    let caps = TIMESTAMP_RE.captures(input.trim()).ok_or_else(invalid)?;
    let field = |i: usize| caps[i].parse::<u64>().map_err(|_| invalid());
    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(ts: &str) -> ChapterBoundary {
        ChapterBoundary::Start(ts.to_string())
    }

    fn end(ts: &str) -> ChapterBoundary {
        ChapterBoundary::End(ts.to_string())
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:00.000").unwrap(), 0);
        assert_eq!(parse_timestamp("00:00:30.000").unwrap(), 30_000);
        assert_eq!(parse_timestamp("01:02:03.004").unwrap(), 3_723_004);
        assert_eq!(parse_timestamp("00:21:50.100000000").unwrap(), 1_310_100);
        assert_eq!(parse_timestamp(" 00:00:01.500 ").unwrap(), 1_500);
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        for bad in [
            "",
            "00:00:00",
            "0:00:00.000",
            "00:00.000",
            "00:00:00.00",
            "00:60:00.000",
            "00:00:60.000",
            "aa:bb:cc.ddd",
            "00:00:00.0x0",
            "00:00:00:00.000",
        ] {
            assert!(
                matches!(parse_timestamp(bad), Err(CoreError::Parse(_))),
                "expected parse error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_from_boundaries_pairs_in_order() {
        let list = ChapterList::from_boundaries(vec![
            start("00:00:00.000"),
            end("00:00:30.000"),
            start("00:00:30.000"),
            end("00:23:50.000"),
        ])
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.chapters()[0].index, 1);
        assert_eq!(list.chapters()[0].duration_ms(), 30_000);
        assert_eq!(list.chapters()[1].index, 2);
        assert_eq!(list.chapters()[1].duration_ms(), 1_400_000);
        assert_eq!(list.total_duration_ms(), 1_430_000);
    }

    #[test]
    fn test_end_without_start_is_ignored() {
        let list = ChapterList::from_boundaries(vec![
            end("00:00:05.000"),
            start("00:00:05.000"),
            end("00:01:05.000"),
            end("00:02:05.000"),
        ])
        .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.chapters()[0].start_ms, 5_000);
        assert_eq!(list.chapters()[0].end_ms, 65_000);
    }

    #[test]
    fn test_later_start_wins() {
        let list = ChapterList::from_boundaries(vec![
            start("00:00:00.000"),
            start("00:00:10.000"),
            end("00:00:20.000"),
        ])
        .unwrap();
        assert_eq!(list.chapters()[0].start_ms, 10_000);
    }

    #[test]
    fn test_empty_and_unpaired_input() {
        assert!(matches!(
            ChapterList::from_boundaries(Vec::new()),
            Err(CoreError::EmptyInput)
        ));
        assert!(matches!(
            ChapterList::from_boundaries(vec![start("00:00:00.000")]),
            Err(CoreError::EmptyInput)
        ));
        assert!(matches!(
            ChapterList::from_durations(&[]),
            Err(CoreError::EmptyInput)
        ));
    }

    #[test]
    fn test_malformed_timestamp_fails() {
        let result = ChapterList::from_boundaries(vec![start("garbage"), end("00:00:01.000")]);
        assert!(matches!(result, Err(CoreError::Parse(_))));
    }

    #[test]
    fn test_end_before_start_fails() {
        let result =
            ChapterList::from_boundaries(vec![start("00:01:00.000"), end("00:00:59.000")]);
        assert!(matches!(result, Err(CoreError::Parse(_))));
    }

    #[test]
    fn test_from_durations_is_contiguous() {
        let list = ChapterList::from_durations(&[30_000, 1_400_000, 8_000]).unwrap();
        let c = list.chapters();
        assert_eq!((c[0].start_ms, c[0].end_ms), (0, 30_000));
        assert_eq!((c[1].start_ms, c[1].end_ms), (30_000, 1_430_000));
        assert_eq!((c[2].index, c[2].duration_ms()), (3, 8_000));
    }
}
