//! Utility functions for formatting and path handling.
//!
//! These are small helpers shared by the detection report, the reporters and
//! the external tool adapters.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Checks if the given path is an existing .mkv file (case-insensitive).
#[must_use]
pub fn is_valid_video_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext_str| ext_str.eq_ignore_ascii_case("mkv"))
}

/// Formats milliseconds as HH:MM:SS.mmm (e.g., 83_456 -> "00:01:23.456").
#[must_use]
pub fn format_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Extracts the file stem of a path, or an error if it has none.
pub fn get_file_stem_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_stem()
        .ok_or_else(|| {
            CoreError::PathError(format!("Failed to get file name for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// Output name template handed to mkvmerge: `<output_dir>/<stem>-%02d.mkv`.
pub fn output_template(input: &Path, output_dir: &Path) -> CoreResult<PathBuf> {
    let stem = get_file_stem_safe(input)?;
    Ok(output_dir.join(format!("{stem}-%02d.mkv")))
}

/// Path of the `number`-th file (1-based) mkvmerge writes for a template.
#[must_use]
pub fn numbered_output(template: &Path, number: usize) -> PathBuf {
    let rendered = template
        .to_string_lossy()
        .replace("%02d", &format!("{number:02}"));
    PathBuf::from(rendered)
}
