// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Invoking ffmpeg and ffprobe.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use uft_core::config::ToolConfig;
use uft_core::error::{Result, UftError};
use uft_core::external::run_tool;

/// Locations of the ffmpeg binaries.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl FfmpegTools {
    pub fn from_config(config: &ToolConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            ffprobe: config.ffprobe.clone(),
        }
    }

    /// Container duration in seconds.
    #[instrument(skip(self))]
    pub fn probe_duration(&self, input: &Path) -> Result<f64> {
        require_input(input)?;
        let output = run_tool(
            &self.ffprobe,
            [
                OsString::from("-v"),
                "error".into(),
                "-show_entries".into(),
                "format=duration".into(),
                "-of".into(),
                "default=noprint_wrappers=1:nokey=1".into(),
                input.as_os_str().to_owned(),
            ],
        )?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration(&stdout).ok_or_else(|| UftError::ExternalTool {
            tool: "ffprobe".into(),
            exit_code: 0,
            message: format!("unexpected duration output: {:?}", stdout.trim()),
        })?;
        debug!(duration, "Duration probed");
        Ok(duration)
    }

    /// Run ffmpeg reading `inputs` and writing `output`, overwriting it.
    /// `args` go between the inputs and the output.
    #[instrument(skip(self, args), fields(output = %output.display()))]
    pub fn run(&self, inputs: &[&Path], args: Vec<OsString>, output: &Path) -> Result<PathBuf> {
        for input in inputs {
            require_input(input)?;
        }
        let mut command: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y"]
            .iter()
            .map(OsString::from)
            .collect();
        for input in inputs {
            command.push("-i".into());
            command.push(input.as_os_str().to_owned());
        }
        command.extend(args);
        command.push(output.as_os_str().to_owned());
        run_tool(&self.ffmpeg, command)?;
        info!("ffmpeg finished");
        Ok(output.to_path_buf())
    }
}

fn require_input(input: &Path) -> Result<()> {
    if input.exists() {
        Ok(())
    } else {
        Err(UftError::NotFound(input.to_path_buf()))
    }
}

/// First line of ffprobe output as seconds.
fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_output() {
        assert_eq!(parse_duration("12.480000\n"), Some(12.48));
        assert_eq!(parse_duration("N/A\n"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn missing_input_is_not_found_before_spawning() {
        let tools = FfmpegTools::from_config(&ToolConfig::default());
        let err = tools.probe_duration(Path::new("/no/such/clip.mp4")).unwrap_err();
        assert!(matches!(err, UftError::NotFound(_)));
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&clip, b"not really a video").unwrap();
        let tools = FfmpegTools {
            ffmpeg: "/nonexistent/ffmpeg".into(),
            ffprobe: "/nonexistent/ffprobe".into(),
        };
        let err = tools.probe_duration(&clip).unwrap_err();
        assert!(matches!(err, UftError::ToolUnavailable { ref tool, .. } if tool == "ffprobe"));
        let err = tools
            .run(&[&clip], Vec::new(), &dir.path().join("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, UftError::ToolUnavailable { ref tool, .. } if tool == "ffmpeg"));
    }
}
