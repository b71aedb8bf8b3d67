// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text: file helpers plus the line and word transformations behind the
// text operations. Transformations are pure so they can be tested without a
// filesystem.

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{debug, instrument};
use uft_core::error::{Result, UftError};

// -- File helpers -------------------------------------------------------------

/// Read a UTF-8 text file.
pub fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| UftError::io_at(path, e))
}

/// Create or truncate `path` with `contents`.
pub fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| UftError::io_at(path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "Text written");
    Ok(())
}

/// Append `contents` to `path`, creating it if needed.
pub fn append(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| UftError::io_at(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| UftError::io_at(path, e))?;
    Ok(())
}

// -- Counting -----------------------------------------------------------------

/// Whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lines, counting a final line without a terminator.
pub fn line_count(text: &str) -> usize {
    text.lines().count()
}

// -- Transformations ----------------------------------------------------------

/// Target case for [`convert_case`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

impl Case {
    pub const OPTIONS: &'static [&'static str] = &["Upper", "Lower"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "upper" => Some(Self::Upper),
            "lower" => Some(Self::Lower),
            _ => None,
        }
    }
}

pub fn convert_case(text: &str, case: Case) -> String {
    match case {
        Case::Upper => text.to_uppercase(),
        Case::Lower => text.to_lowercase(),
    }
}

/// Join lines back together, terminating every line.
fn join_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines.into_iter().fold(String::new(), |mut out, line| {
        out.push_str(line);
        out.push('\n');
        out
    })
}

pub fn sort_lines(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    lines.sort_unstable();
    join_lines(lines)
}

/// Reverse the order of lines (not characters).
pub fn reverse_lines(text: &str) -> String {
    join_lines(text.lines().rev())
}

/// Distinct lines, sorted.
pub fn dedupe_lines(text: &str) -> String {
    join_lines(text.lines().collect::<BTreeSet<_>>())
}

/// Lines containing `keyword` (case-sensitive), in file order.
pub fn lines_containing(text: &str, keyword: &str) -> String {
    join_lines(text.lines().filter(|line| line.contains(keyword)))
}

/// Chunks of at most `lines_per_part` lines. Empty input gives no parts.
pub fn split_lines(text: &str, lines_per_part: usize) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .chunks(lines_per_part.max(1))
        .map(|chunk| join_lines(chunk.iter().copied()))
        .collect()
}

/// Concatenate file contents, each followed by a newline.
#[instrument(skip_all, fields(parts = contents.len()))]
pub fn merge(contents: &[String]) -> String {
    contents.iter().fold(String::new(), |mut out, part| {
        out.push_str(part);
        out.push('\n');
        out
    })
}
