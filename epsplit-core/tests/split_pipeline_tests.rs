// epsplit-core/tests/split_pipeline_tests.rs

use epsplit_core::external::{SplitProgress, SplitRequest, TextChapterSource};
use epsplit_core::reporting::{NullReporter, Reporter, SplitSummary};
use epsplit_core::{CoreError, CoreResult, SplitAction, SplitConfig, SplitOptions, Splitter, split_file};
use std::cell::RefCell;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

/// Writes an mkvinfo-style dump for contiguous chapters with the given durations.
fn write_dump(dir: &Path, durations_ms: &[u64]) -> PathBuf {
    let mut text = String::from("+ EBML head\n|+ Segment\n| + Chapters\n|  + Edition entry\n");
    let mut start = 0;
    for duration in durations_ms {
        let end = start + duration;
        text.push_str("|   + Chapter atom\n");
        text.push_str(&format!(
            "|    + ChapterTimeStart: {}000000\n",
            epsplit_core::format_ms(start)
        ));
        text.push_str(&format!(
            "|    + ChapterTimeEnd: {}000000\n",
            epsplit_core::format_ms(end)
        ));
        start = end;
    }
    let path = dir.join("chapters.txt");
    fs::write(&path, text).unwrap();
    path
}

/// Splitter that writes one empty file per output and replays fixed progress.
#[derive(Default)]
struct FileWritingSplitter {
    requests: RefCell<Vec<SplitRequest>>,
}

impl Splitter for FileWritingSplitter {
    fn command_line(&self, request: &SplitRequest) -> Vec<String> {
        vec!["fake-merge".into(), request.split_spec.clone()]
    }

    fn split(
        &self,
        request: &SplitRequest,
        on_progress: &mut dyn FnMut(&SplitProgress),
    ) -> CoreResult<()> {
        self.requests.borrow_mut().push(request.clone());
        for (i, path) in request.output_paths().iter().enumerate() {
            File::create(path)?;
            on_progress(&SplitProgress {
                current_file: i + 1,
                total_files: request.file_count,
                percent: (i + 1) as f32 * 100.0 / request.file_count as f32,
            });
        }
        Ok(())
    }
}

/// Reporter counting progress updates and keeping the final summary.
#[derive(Default)]
struct RecordingReporter {
    progress_updates: Mutex<usize>,
    summary: Mutex<Option<SplitSummary>>,
}

impl Reporter for RecordingReporter {
    fn split_progress(&self, _progress: &SplitProgress) {
        *self.progress_updates.lock().unwrap() += 1;
    }

    fn split_complete(&self, summary: &SplitSummary) {
        *self.summary.lock().unwrap() = Some(summary.clone());
    }
}

#[test]
fn test_split_from_dump_removes_trailing_junk() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = tempdir()?;
    let output_dir = scratch.path().join("episodes");
    let input = scratch.path().join("Show Disc 1.mkv");
    File::create(&input)?;

    // Four episodes followed by a 20 second preview
    let dump = write_dump(
        scratch.path(),
        &[30_000, 1_380_000, 30_000, 1_380_000, 30_000, 1_380_000, 30_000, 1_380_000, 20_000],
    );

    let source = TextChapterSource::new(&dump);
    let splitter = FileWritingSplitter::default();
    let reporter = RecordingReporter::default();
    let options = SplitOptions {
        output_dir: output_dir.clone(),
        dry_run: false,
    };

    let outcome = split_file(&source, &splitter, &reporter, &SplitConfig::default(), &input, &options)?;

    assert_eq!(outcome.detection.plan.split_spec(), "chapters:3,5,7,9");
    assert_eq!(splitter.requests.borrow().len(), 1);
    assert_eq!(*reporter.progress_updates.lock().unwrap(), 5);

    let SplitAction::Split(summary) = outcome.action else {
        panic!("expected a split");
    };
    assert_eq!(summary.episode_files.len(), 4);
    assert_eq!(summary.removed_files, vec![output_dir.join("Show Disc 1-05.mkv")]);
    for number in 1..=4 {
        assert!(output_dir.join(format!("Show Disc 1-{number:02}.mkv")).exists());
    }
    assert!(!output_dir.join("Show Disc 1-05.mkv").exists());
    assert!(input.exists(), "source file must never be removed");
    assert_eq!(reporter.summary.lock().unwrap().as_ref(), Some(&summary));
    Ok(())
}

#[test]
fn test_mismatch_never_invokes_splitter() -> Result<(), Box<dyn std::error::Error>> {
    let scratch = tempdir()?;
    let dump = write_dump(scratch.path(), &[30_000, 30_000, 30_000, 1_380_000, 30_000]);
    let splitter = FileWritingSplitter::default();
    let options = SplitOptions {
        output_dir: scratch.path().join("out"),
        dry_run: false,
    };

    let result = split_file(
        &TextChapterSource::new(&dump),
        &splitter,
        &NullReporter,
        &SplitConfig::default(),
        Path::new("disc.mkv"),
        &options,
    );

    assert!(matches!(result, Err(CoreError::ShapeMismatch { .. })));
    assert!(splitter.requests.borrow().is_empty());
    assert!(!scratch.path().join("out").exists());
    Ok(())
}
