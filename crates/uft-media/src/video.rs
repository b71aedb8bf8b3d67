// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Video operations. Each call produces one new file and leaves its inputs
// untouched.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use uft_core::error::{Result, UftError, ValidationReason};

use crate::ffmpeg::FfmpegTools;
use crate::filters::{self, Fade};

fn args<const N: usize>(items: [&str; N]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

fn invalid(parameter: &str, reason: ValidationReason) -> UftError {
    UftError::Validation {
        parameter: parameter.to_string(),
        reason,
    }
}

/// Audio track as MP3.
#[instrument(skip(tools))]
pub fn extract_audio(tools: &FfmpegTools, input: &Path, output: &Path) -> Result<PathBuf> {
    tools.run(
        &[input],
        args(["-vn", "-acodec", "libmp3lame", "-q:a", "2"]),
        output,
    )
}

/// Join clips end to end, re-encoding so differing sources still combine.
#[instrument(skip(tools))]
pub fn concatenate(tools: &FfmpegTools, inputs: &[PathBuf], output: &Path) -> Result<PathBuf> {
    let mut list = tempfile::Builder::new()
        .prefix("uft-concat-")
        .suffix(".txt")
        .tempfile()?;
    for input in inputs {
        if !input.exists() {
            return Err(UftError::NotFound(input.clone()));
        }
        let absolute = std::path::absolute(input).map_err(|e| UftError::io_at(input, e))?;
        list.write_all(filters::concat_entry(&absolute.to_string_lossy()).as_bytes())?;
    }
    list.flush()?;

    let mut extra = args(["-f", "concat", "-safe", "0", "-i"]);
    extra.push(list.path().as_os_str().to_owned());
    extra.extend(args(["-c:v", "libx264", "-c:a", "aac"]));
    let written = tools.run(&[], extra, output)?;
    info!(clips = inputs.len(), "Clips concatenated");
    Ok(written)
}

#[instrument(skip(tools))]
pub fn resize(
    tools: &FfmpegTools,
    input: &Path,
    width: i64,
    height: i64,
    output: &Path,
) -> Result<PathBuf> {
    tools.run(&[input], args(["-vf", &filters::scale(width, height)]), output)
}

#[instrument(skip(tools))]
pub fn add_text(
    tools: &FfmpegTools,
    input: &Path,
    text: &str,
    font_size: i64,
    color: &str,
    output: &Path,
) -> Result<PathBuf> {
    let filter = filters::drawtext(text, font_size, color);
    tools.run(&[input], args(["-vf", &filter, "-c:a", "copy"]), output)
}

/// Play back `factor` times faster; audio tempo follows.
#[instrument(skip(tools))]
pub fn change_speed(
    tools: &FfmpegTools,
    input: &Path,
    factor: f64,
    output: &Path,
) -> Result<PathBuf> {
    if factor <= 0.0 {
        return Err(invalid("factor", ValidationReason::OutOfRange));
    }
    tools.run(
        &[input],
        args([
            "-vf",
            &filters::setpts(factor),
            "-af",
            &filters::atempo_chain(factor),
        ]),
        output,
    )
}

#[instrument(skip(tools))]
pub fn fade_in(tools: &FfmpegTools, input: &Path, seconds: f64, output: &Path) -> Result<PathBuf> {
    let (video, audio) = filters::fade(Fade::In, 0.0, seconds);
    tools.run(&[input], args(["-vf", &video, "-af", &audio]), output)
}

/// Fade to black over the last `seconds`; needs the clip duration.
#[instrument(skip(tools))]
pub fn fade_out(
    tools: &FfmpegTools,
    input: &Path,
    seconds: f64,
    output: &Path,
) -> Result<PathBuf> {
    let duration = tools.probe_duration(input)?;
    let start = (duration - seconds).max(0.0);
    let (video, audio) = filters::fade(Fade::Out, start, seconds);
    tools.run(&[input], args(["-vf", &video, "-af", &audio]), output)
}

/// Replace the soundtrack with `music`, cut to the shorter of the two.
#[instrument(skip(tools))]
pub fn add_music(
    tools: &FfmpegTools,
    input: &Path,
    music: &Path,
    output: &Path,
) -> Result<PathBuf> {
    tools.run(
        &[input, music],
        args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-shortest",
        ]),
        output,
    )
}

#[instrument(skip(tools))]
pub fn trim(
    tools: &FfmpegTools,
    input: &Path,
    start: f64,
    end: f64,
    output: &Path,
) -> Result<PathBuf> {
    if end <= start {
        return Err(invalid("end", ValidationReason::OutOfRange));
    }
    let start_arg = start.to_string();
    let end_arg = end.to_string();
    tools.run(&[input], args(["-ss", &start_arg, "-to", &end_arg]), output)
}

/// Rotate counter-clockwise by 90, 180 or 270 degrees.
#[instrument(skip(tools))]
pub fn rotate(tools: &FfmpegTools, input: &Path, degrees: i64, output: &Path) -> Result<PathBuf> {
    let filter = filters::rotate_ccw(degrees)
        .ok_or_else(|| invalid("angle", ValidationReason::NotAnOption))?;
    tools.run(&[input], args(["-vf", filter, "-c:a", "copy"]), output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> FfmpegTools {
        FfmpegTools {
            ffmpeg: "/nonexistent/ffmpeg".into(),
            ffprobe: "/nonexistent/ffprobe".into(),
        }
    }

    #[test]
    fn trim_requires_end_after_start() {
        let err = trim(&tools(), Path::new("a.mp4"), 5.0, 5.0, Path::new("b.mp4")).unwrap_err();
        assert!(matches!(
            err,
            UftError::Validation { ref parameter, reason: ValidationReason::OutOfRange } if parameter == "end"
        ));
    }

    #[test]
    fn speed_must_be_positive() {
        let err = change_speed(&tools(), Path::new("a.mp4"), 0.0, Path::new("b.mp4")).unwrap_err();
        assert!(matches!(err, UftError::Validation { .. }));
    }

    #[test]
    fn rotate_rejects_other_angles() {
        let err = rotate(&tools(), Path::new("a.mp4"), 45, Path::new("b.mp4")).unwrap_err();
        assert!(matches!(err, UftError::Validation { reason: ValidationReason::NotAnOption, .. }));
    }

    #[test]
    fn concatenate_reports_missing_clip() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.mp4");
        std::fs::write(&present, b"x").unwrap();
        let missing = dir.path().join("b.mp4");
        let err = concatenate(&tools(), &[present, missing.clone()], &dir.path().join("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, UftError::NotFound(ref p) if *p == missing));
    }
}
