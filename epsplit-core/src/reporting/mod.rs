use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::chapters::ChapterList;
use crate::detection::{Detection, Inspection};
use crate::external::{SplitProgress, SplitRequest};
use crate::utils::format_ms;

/// Result of a finished split.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitSummary {
    pub input: PathBuf,
    /// Files holding one episode each, in order
    pub episode_files: Vec<PathBuf>,
    /// Junk files deleted after the split
    pub removed_files: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// High-level warning/error message.
#[derive(Clone, Debug)]
pub struct ReporterError {
    pub title: String,
    pub message: String,
    pub context: Option<String>,
    pub suggestion: Option<String>,
}

/// Reporter interface implemented by both human-readable and JSON reporters.
pub trait Reporter: Send + Sync {
    fn chapters_loaded(&self, _input: &Path, _chapters: &ChapterList) {}
    fn inspection(&self, _inspection: &Inspection) {}
    fn detection_complete(&self, _detection: &Detection) {}
    fn no_split_needed(&self, _input: &Path) {}
    fn dry_run(&self, _command: &[String]) {}
    fn split_started(&self, _request: &SplitRequest) {}
    fn split_progress(&self, _progress: &SplitProgress) {}
    fn split_complete(&self, _summary: &SplitSummary) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _error: &ReporterError) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Human-friendly reporter that prints concise text output.
pub struct TerminalReporter {
    progress: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(None),
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Reporter for TerminalReporter {
    fn chapters_loaded(&self, input: &Path, chapters: &ChapterList) {
        println!("\n{}", style("FILE").bold().cyan());
        println!("  {:<10} {}", style("Input:").bold(), input.display());
        println!("  {:<10} {}", style("Chapters:").bold(), chapters.len());
        println!(
            "  {:<10} {}",
            style("Duration:").bold(),
            format_ms(chapters.total_duration_ms())
        );
    }

    fn inspection(&self, inspection: &Inspection) {
        let classification = &inspection.classification;
        println!("\n{}", style("CHAPTERS").bold().cyan());
        println!(
            "  {:>3}  {:<12}  {:<12}  {:<12}  {}",
            style("#").bold(),
            style("Start").bold(),
            style("End").bold(),
            style("Duration").bold(),
            style("Label").bold()
        );
        for row in &inspection.chapters {
            let label = match row.label {
                Some(label) => label.to_string(),
                None => style("ignored").dim().to_string(),
            };
            println!(
                "  {:>3}  {}  {}  {}  {}",
                row.chapter.index,
                format_ms(row.chapter.start_ms),
                format_ms(row.chapter.end_ms),
                format_ms(row.duration_ms),
                label
            );
        }

        println!("\n{}", style("CLASSIFICATION").bold().cyan());
        println!(
            "  {:<11} {:?}",
            style("Spread:").bold(),
            classification.uniformity
        );
        println!(
            "  {:<11} {} (shortest {}, longest {})",
            style("Delta:").bold(),
            format_ms(classification.delta_ms),
            format_ms(classification.min_duration_ms),
            format_ms(classification.max_duration_ms)
        );
        println!(
            "  {:<11} {}",
            style("Long from:").bold(),
            format_ms(classification.long_duration_ms)
        );
        println!(
            "  {:<11} {}",
            style("Estimate:").bold(),
            inspection.estimated_episode_count
        );
    }

    fn detection_complete(&self, detection: &Detection) {
        let plan = &detection.plan;
        println!("\n{}", style("DETECTION").bold().cyan());
        println!(
            "  {:<11} {}",
            style("Layout:").bold(),
            detection.classification.layout()
        );
        if detection.attempts.len() > 1 {
            println!(
                "  {:<11} {} after {} attempts",
                style("Duration:").bold(),
                format_ms(detection.show_duration_ms()),
                detection.attempts.len()
            );
        }
        println!(
            "  {:<11} {} (estimate {})",
            style("Episodes:").bold(),
            style(detection.episode_count()).bold(),
            detection.estimated_episode_count
        );
        for (number, step) in detection.matched.steps.iter().enumerate() {
            println!("  {}. {} ({})", number + 1, step.episode, step.shape);
        }
        if !plan.is_single_episode() {
            println!("  {:<11} {}", style("Split:").bold(), plan.split_spec());
        }
        let junk = plan.junk_file_numbers();
        if !junk.is_empty() {
            let files: Vec<String> = junk.iter().map(|n| format!("{n:02}")).collect();
            println!(
                "  {:<11} {}",
                style("Junk:").bold(),
                style(files.join(", ")).dim()
            );
        }
    }

    fn no_split_needed(&self, input: &Path) {
        println!(
            "\n{} {}",
            style("✓").green().bold(),
            style(format!(
                "{} holds one episode, no need to split",
                input.display()
            ))
            .bold()
        );
    }

    fn dry_run(&self, command: &[String]) {
        println!("\n{}", style("DRY RUN").bold().cyan());
        println!("  Would execute:");
        println!("  {}", command.join(" "));
    }

    fn split_started(&self, request: &SplitRequest) {
        self.finish_progress();
        let pb = ProgressBar::new(100);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("{msg} [{bar:40}] {percent:>3}%")
        {
            pb.set_style(bar_style.progress_chars("=> "));
        }
        pb.set_message(format!("File 0 of {}", request.file_count));
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut guard) = self.progress.lock() {
            *guard = Some(pb);
        }
    }

    fn split_progress(&self, progress: &SplitProgress) {
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_position(progress.percent.clamp(0.0, 100.0) as u64);
                pb.set_message(format!(
                    "File {} of {}",
                    progress.current_file, progress.total_files
                ));
            }
        }
    }

    fn split_complete(&self, summary: &SplitSummary) {
        self.finish_progress();
        println!("\n{}", style("RESULTS").bold().cyan());
        for path in &summary.episode_files {
            println!("  {}", style(path.display()).green());
        }
        for path in &summary.removed_files {
            println!("  {} {}", style("removed").dim(), path.display());
        }
        println!(
            "  Time: {}",
            format_ms(summary.elapsed.as_millis() as u64)
        );
    }

    fn warning(&self, message: &str) {
        println!("\n{}", style(format!("WARN: {}", message)).yellow().bold());
    }

    fn error(&self, error: &ReporterError) {
        self.finish_progress();
        eprintln!(
            "\n{} {}",
            style("ERROR").red().bold(),
            style(&error.title).red().bold()
        );
        eprintln!("  {}", error.message);
        if let Some(ctx) = &error.context {
            eprintln!("  Context: {}", ctx);
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  Suggestion: {}", suggestion);
        }
    }
}

/// Reporter writing newline-delimited JSON events.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
    last_progress_bucket: Mutex<i32>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            last_progress_bucket: Mutex::new(-1),
        }
    }

    fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_value(&self, value: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}

impl Reporter for JsonReporter {
    fn chapters_loaded(&self, input: &Path, chapters: &ChapterList) {
        self.write_value(json!({
            "type": "chapters_loaded",
            "input_file": input.display().to_string(),
            "chapter_count": chapters.len(),
            "duration_ms": chapters.total_duration_ms(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn inspection(&self, inspection: &Inspection) {
        self.write_value(json!({
            "type": "inspection",
            "chapters": inspection.chapters,
            "classification": inspection.classification,
            "estimated_episode_count": inspection.estimated_episode_count,
            "timestamp": Self::timestamp(),
        }));
    }

    fn detection_complete(&self, detection: &Detection) {
        self.write_value(json!({
            "type": "detection_complete",
            "episode_count": detection.episode_count(),
            "split_spec": detection.plan.split_spec(),
            "plan": detection.plan,
            "attempts": detection.attempts,
            "removed_chapters": detection.filtered.removed,
            "tail": detection.tail,
            "layout": detection.classification.layout(),
            "estimated_episode_count": detection.estimated_episode_count,
            "timestamp": Self::timestamp(),
        }));
    }

    fn no_split_needed(&self, input: &Path) {
        self.write_value(json!({
            "type": "no_split_needed",
            "input_file": input.display().to_string(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn dry_run(&self, command: &[String]) {
        self.write_value(json!({
            "type": "dry_run",
            "command": command,
            "timestamp": Self::timestamp(),
        }));
    }

    fn split_started(&self, request: &SplitRequest) {
        if let Ok(mut bucket) = self.last_progress_bucket.lock() {
            *bucket = -1;
        }
        self.write_value(json!({
            "type": "split_started",
            "input_file": request.input.display().to_string(),
            "output_files": request.output_paths(),
            "split_spec": request.split_spec,
            "timestamp": Self::timestamp(),
        }));
    }

    fn split_progress(&self, progress: &SplitProgress) {
        let bucket = (progress.percent as i32) / 5;
        if let Ok(mut guard) = self.last_progress_bucket.lock() {
            if bucket <= *guard && progress.percent < 99.0 {
                return;
            }
            *guard = bucket;
        }
        self.write_value(json!({
            "type": "split_progress",
            "current_file": progress.current_file,
            "total_files": progress.total_files,
            "percent": progress.percent,
            "timestamp": Self::timestamp(),
        }));
    }

    fn split_complete(&self, summary: &SplitSummary) {
        self.write_value(json!({
            "type": "split_complete",
            "input_file": summary.input.display().to_string(),
            "episode_files": summary.episode_files,
            "removed_files": summary.removed_files,
            "duration_seconds": summary.elapsed.as_secs(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn warning(&self, message: &str) {
        self.write_value(json!({
            "type": "warning",
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn error(&self, error: &ReporterError) {
        self.write_value(json!({
            "type": "error",
            "title": error.title,
            "message": error.message,
            "context": error.context,
            "suggestion": error.suggestion,
            "timestamp": Self::timestamp(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitConfig;
    use crate::detection::detect_episodes;
    use std::sync::Arc;

    /// Writer that keeps everything in a shared buffer.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<serde_json::Value> {
            let data = self.0.lock().unwrap();
            String::from_utf8_lossy(&data)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_json_detection_event() {
        let buffer = SharedBuffer::default();
        let reporter = JsonReporter::with_writer(Box::new(buffer.clone()));

        let list = ChapterList::from_durations(&[30_000, 1_400_000, 30_000, 1_400_000, 8_000])
            .unwrap();
        let detection = detect_episodes(&list, &SplitConfig::default()).unwrap();
        reporter.detection_complete(&detection);

        let events = buffer.lines();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "detection_complete");
        assert_eq!(events[0]["episode_count"], 2);
        assert_eq!(events[0]["split_spec"], "chapters:3,5");
        assert_eq!(events[0]["plan"]["drop_last_segment"], true);
        assert_eq!(events[0]["tail"]["kind"], "dropped");
    }

    #[test]
    fn test_json_progress_is_throttled() {
        let buffer = SharedBuffer::default();
        let reporter = JsonReporter::with_writer(Box::new(buffer.clone()));

        for percent in [1.0, 2.0, 6.0, 7.0, 99.5] {
            reporter.split_progress(&SplitProgress {
                current_file: 1,
                total_files: 2,
                percent,
            });
        }

        let percents: Vec<f64> = buffer
            .lines()
            .iter()
            .map(|event| event["percent"].as_f64().unwrap())
            .collect();
        assert_eq!(percents, vec![1.0, 6.0, 99.5]);
    }

    #[test]
    fn test_null_reporter_accepts_everything() {
        let reporter = NullReporter;
        reporter.warning("ignored");
        reporter.dry_run(&["mkvmerge".to_string()]);
    }
}
