//! Chapter sources backed by mkvinfo.
//!
//! mkvinfo prints the chapter atoms of a Matroska file as an indented tree.
//! Only the chapter time lines matter here; they are turned into boundary
//! records in the order they appear. Older MKVToolNix releases print
//! `ChapterTimeStart:`, current ones `Chapter time start:`.

use crate::chapters::ChapterBoundary;
use crate::error::{CoreResult, command_failed_error, command_start_error};
use crate::external::ChapterSource;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

static CHAPTER_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Chapter ?[Tt]ime ?(Start|End|start|end):\s*([0-9:.]+)")
        .expect("chapter time pattern is valid")
});

/// Extracts chapter boundary records from mkvinfo text output.
///
/// Lines without a chapter time marker are skipped. The timestamp is the run
/// of digits, ':' and '.' following the marker.
#[must_use]
pub fn parse_mkvinfo_output(output: &str) -> Vec<ChapterBoundary> {
    output
        .lines()
        .filter_map(|line| {
            let caps = CHAPTER_TIME_RE.captures(line)?;
            let ts = caps[2].to_string();
            if caps[1].eq_ignore_ascii_case("start") {
                Some(ChapterBoundary::Start(ts))
            } else {
                Some(ChapterBoundary::End(ts))
            }
        })
        .collect()
}

/// Reads chapters by running `mkvinfo <file>`.
#[derive(Debug, Clone)]
pub struct MkvinfoChapterSource {
    program: PathBuf,
}

impl Default for MkvinfoChapterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MkvinfoChapterSource {
    pub fn new() -> Self {
        Self::with_program("mkvinfo")
    }

    /// Uses a specific mkvinfo executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ChapterSource for MkvinfoChapterSource {
    fn read_boundaries(&self, input: &Path) -> CoreResult<Vec<ChapterBoundary>> {
        let program = self.program.to_string_lossy();
        log::debug!("Running {} on {}", program, input.display());

        let output = Command::new(&self.program)
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command_start_error(&program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let details = if stderr.trim().is_empty() { &stdout } else { &stderr };
            log::error!("{} failed on {}", program, input.display());
            return Err(command_failed_error(&program, output.status.code(), details));
        }

        Ok(parse_mkvinfo_output(&stdout))
    }
}

/// Reads chapters from a saved mkvinfo dump instead of the media file.
#[derive(Debug, Clone)]
pub struct TextChapterSource {
    dump: PathBuf,
}

impl TextChapterSource {
    pub fn new(dump: impl Into<PathBuf>) -> Self {
        Self { dump: dump.into() }
    }
}

impl ChapterSource for TextChapterSource {
    fn read_boundaries(&self, input: &Path) -> CoreResult<Vec<ChapterBoundary>> {
        log::debug!(
            "Reading chapters for {} from {}",
            input.display(),
            self.dump.display()
        );
        let text = fs::read_to_string(&self.dump)?;
        Ok(parse_mkvinfo_output(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::io::Write;

    const DUMP: &str = "\
+ EBML head
|+ Chapters
| + Edition entry
|  + Chapter atom
|   + Chapter UID: 1234
|   + ChapterTimeStart: 00:00:00.000000000
|   + ChapterTimeEnd: 00:01:30.000000000
|  + Chapter atom
|   + ChapterTimeStart: 00:01:30.000000000
|   + ChapterTimeEnd: 00:22:10.500000000
";

    #[test]
    fn test_parse_mkvinfo_output_extracts_markers_in_order() {
        let boundaries = parse_mkvinfo_output(DUMP);
        assert_eq!(
            boundaries,
            vec![
                ChapterBoundary::Start("00:00:00.000000000".into()),
                ChapterBoundary::End("00:01:30.000000000".into()),
                ChapterBoundary::Start("00:01:30.000000000".into()),
                ChapterBoundary::End("00:22:10.500000000".into()),
            ]
        );
    }

    // Layout printed by current MKVToolNix releases
    const CURRENT_DUMP: &str = "\
+ EBML head
|+ Segment: size 1456987123
| + Chapters
|  + Edition entry
|   + Chapter atom
|    + Chapter UID: 8811024373649202
|    + Chapter time start: 00:00:00.000000000
|    + Chapter time end: 00:01:30.000000000
|    + Chapter display
|     + Chapter string: Opening
|   + Chapter atom
|    + Chapter UID: 4125011339810055
|    + Chapter time start: 00:01:30.000000000
|    + Chapter time end: 00:22:10.500000000
";

    #[test]
    fn test_parse_mkvinfo_output_current_layout() {
        let boundaries = parse_mkvinfo_output(CURRENT_DUMP);
        assert_eq!(
            boundaries,
            vec![
                ChapterBoundary::Start("00:00:00.000000000".into()),
                ChapterBoundary::End("00:01:30.000000000".into()),
                ChapterBoundary::Start("00:01:30.000000000".into()),
                ChapterBoundary::End("00:22:10.500000000".into()),
            ]
        );

        let chapters = crate::chapters::ChapterList::from_boundaries(boundaries).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters.chapters()[0].duration_ms(), 90_000);
    }

    #[test]
    fn test_parse_mkvinfo_output_ignores_markers_without_time() {
        assert!(parse_mkvinfo_output("| + ChapterTimeStart: n/a\n").is_empty());
        assert!(parse_mkvinfo_output("|  + Chapter time end: n/a\n").is_empty());
        assert!(parse_mkvinfo_output("|  + Chapter UID: 1234\n").is_empty());
        assert!(parse_mkvinfo_output("").is_empty());
    }

    #[test]
    fn test_text_source_reads_dump() {
        let mut dump = tempfile::NamedTempFile::new().unwrap();
        dump.write_all(DUMP.as_bytes()).unwrap();

        let source = TextChapterSource::new(dump.path());
        let chapters = source.read_chapters(Path::new("disc.mkv")).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters.chapters()[1].duration_ms(), 1_240_500);
    }

    #[test]
    fn test_text_source_missing_dump_is_io_error() {
        let source = TextChapterSource::new("/nonexistent/dump.txt");
        assert!(matches!(
            source.read_boundaries(Path::new("disc.mkv")),
            Err(CoreError::Io(_))
        ));
    }

    #[test]
    fn test_mkvinfo_missing_program() {
        let source = MkvinfoChapterSource::with_program("epsplit-no-such-mkvinfo");
        assert!(matches!(
            source.read_boundaries(Path::new("disc.mkv")),
            Err(CoreError::DependencyNotFound(_))
        ));
    }
}
