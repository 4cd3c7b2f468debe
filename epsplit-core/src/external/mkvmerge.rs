//! Splitting with mkvmerge.
//!
//! Runs `mkvmerge -o <template> <input> --split chapters:<cuts>` and follows
//! its output: each "opened for writing" line moves on to the next output
//! file, each "Progress: N%" line updates the percentage.

use crate::error::{CoreResult, command_failed_error, command_start_error};
use crate::external::{SplitProgress, SplitRequest, Splitter};
use log::{debug, warn};
use regex::Regex;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

const OPENED_MARKER: &str = "opened for writing";
const PROGRESS_MARKER: &str = "Progress:";

static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Progress:\s*([0-9]+(?:\.[0-9]+)?)\s*%").expect("progress pattern is valid")
});

/// Extracts the percentage from a mkvmerge "Progress: N%" line.
#[must_use]
pub fn parse_progress_percent(line: &str) -> Option<f32> {
    let caps = PROGRESS_RE.captures(line)?;
    caps[1].parse::<f32>().ok().map(|p| p.clamp(0.0, 100.0))
}

/// Splitter driving the mkvmerge executable.
#[derive(Debug, Clone)]
pub struct MkvmergeSplitter {
    program: PathBuf,
}

impl Default for MkvmergeSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl MkvmergeSplitter {
    pub fn new() -> Self {
        Self::with_program("mkvmerge")
    }

    /// Uses a specific mkvmerge executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn args(request: &SplitRequest) -> Vec<String> {
        vec![
            "-o".to_string(),
            request.output_template.to_string_lossy().into_owned(),
            request.input.to_string_lossy().into_owned(),
            "--split".to_string(),
            request.split_spec.clone(),
        ]
    }
}

/// Tracks the output file counter and percentage across mkvmerge lines.
#[derive(Debug)]
struct ProgressTracker {
    progress: SplitProgress,
}

impl ProgressTracker {
    fn new(total_files: usize) -> Self {
        Self {
            progress: SplitProgress {
                current_file: 0,
                total_files,
                percent: 0.0,
            },
        }
    }

    /// Feeds one line; returns the new state when it changed.
    fn feed(&mut self, line: &str) -> Option<SplitProgress> {
        if line.contains(OPENED_MARKER) {
            if self.progress.current_file < self.progress.total_files {
                self.progress.current_file += 1;
            }
            return Some(self.progress);
        }
        let percent = parse_progress_percent(line)?;
        self.progress.percent = percent;
        Some(self.progress)
    }
}

impl Splitter for MkvmergeSplitter {
    fn command_line(&self, request: &SplitRequest) -> Vec<String> {
        let mut command = vec![self.program.to_string_lossy().into_owned()];
        command.extend(Self::args(request));
        command
    }

    fn split(
        &self,
        request: &SplitRequest,
        on_progress: &mut dyn FnMut(&SplitProgress),
    ) -> CoreResult<()> {
        let program = self.program.to_string_lossy().into_owned();
        debug!("Executing: {}", self.command_line(request).join(" "));

        let mut child = Command::new(&self.program)
            .args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(&program, e))?;

        let stderr_handle = child.stderr.take().map(|stderr| {
            std::thread::spawn(move || {
                let mut collected = String::new();
                let _ = BufReader::new(stderr).read_to_string(&mut collected);
                collected
            })
        });

        let mut tracker = ProgressTracker::new(request.file_count);
        let mut tail: Vec<String> = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                // mkvmerge redraws progress with carriage returns
                for part in line.split('\r').map(str::trim).filter(|p| !p.is_empty()) {
                    debug!("mkvmerge: {}", part);
                    if let Some(progress) = tracker.feed(part) {
                        on_progress(&progress);
                    }
                    if !part.starts_with(PROGRESS_MARKER) {
                        tail.push(part.to_string());
                    }
                }
            }
        }

        let status = child.wait()?;
        let stderr = stderr_handle
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        match status.code() {
            Some(0) => Ok(()),
            Some(1) => {
                warn!("{} finished with warnings", program);
                for line in tail.iter().filter(|l| l.starts_with("Warning")) {
                    warn!("{}", line);
                }
                Ok(())
            }
            code => {
                let details = if stderr.trim().is_empty() {
                    tail.join("\n")
                } else {
                    stderr
                };
                Err(command_failed_error(&program, code, &details))
            }
        }
    }
}
