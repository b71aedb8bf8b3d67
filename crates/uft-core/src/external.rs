// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Running external command-line tools (ffmpeg, ffprobe, pdftoppm).

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{Result, UftError};

/// Run `program` with `args` and wait for it.
///
/// A program that cannot be started maps to [`UftError::ToolUnavailable`];
/// a non-zero exit maps to [`UftError::ExternalTool`] carrying the last
/// lines of stderr.
pub fn run_tool<I, S>(program: &Path, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = tool_name(program);
    let mut cmd = Command::new(program);
    cmd.args(args);
    debug!(command = ?cmd, "Running external tool");

    let output = cmd.output().map_err(|e| UftError::ToolUnavailable {
        tool: tool.clone(),
        reason: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(UftError::ExternalTool {
            tool,
            exit_code: output.status.code().unwrap_or(-1),
            message: stderr_tail(&output.stderr, 5),
        });
    }
    Ok(output)
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

/// Last `lines` non-empty lines of a tool's stderr.
fn stderr_tail(stderr: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let tail: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    tail[tail.len().saturating_sub(lines)..].join("\n")
}
