// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Video operations. Everything here runs ffmpeg or ffprobe.

use std::path::PathBuf;

use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result, UftError};
use uft_media::{FfmpegTools, video};

const ANGLES: &[&str] = &["90", "180", "270"];

const CONCATENATE: &[ParameterSpec] =
    &[ParameterSpec::path_list("paths", "Clips to join, in order")];
const RESIZE: &[ParameterSpec] = &[
    ParameterSpec::int("width", "New width in pixels").range(2.0, 16_384.0),
    ParameterSpec::int("height", "New height in pixels").range(2.0, 16_384.0),
];
const ADD_TEXT: &[ParameterSpec] = &[
    ParameterSpec::text("text", "Caption").non_empty(),
    ParameterSpec::int("fontSize", "Font size").range(1.0, 1_000.0),
    ParameterSpec::text("color", "Font color").or_default("white"),
];
const CHANGE_SPEED: &[ParameterSpec] =
    &[ParameterSpec::float("factor", "Speed factor (2.0 = twice as fast)").range(0.01, 100.0)];
const FADE: &[ParameterSpec] =
    &[ParameterSpec::float("seconds", "Fade length in seconds").range(0.0, 86_400.0)];
const ADD_MUSIC: &[ParameterSpec] = &[ParameterSpec::path("musicPath", "Audio file")];
const TRIM: &[ParameterSpec] = &[
    ParameterSpec::float("start", "Start time in seconds").range(0.0, 1.0e9),
    ParameterSpec::float("end", "End time in seconds").range(0.0, 1.0e9),
];
const ROTATE: &[ParameterSpec] = &[ParameterSpec::choice(
    "angle",
    ANGLES,
    "Counter-clockwise rotation in degrees",
)];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Video, "duration", "Show duration", &[], duration),
    Operation::new(Category::Video, "extractAudio", "Extract audio", &[], extract_audio),
    Operation::new(Category::Video, "concatenate", "Join clips", CONCATENATE, concatenate),
    Operation::new(Category::Video, "resize", "Resize", RESIZE, resize),
    Operation::new(Category::Video, "addText", "Add text", ADD_TEXT, add_text),
    Operation::new(Category::Video, "changeSpeed", "Change speed", CHANGE_SPEED, change_speed),
    Operation::new(Category::Video, "fadeIn", "Fade in", FADE, fade_in),
    Operation::new(Category::Video, "addMusic", "Add music", ADD_MUSIC, add_music),
    Operation::new(Category::Video, "trim", "Trim", TRIM, trim),
    Operation::new(Category::Video, "rotate", "Rotate", ROTATE, rotate),
    Operation::new(Category::Video, "fadeOut", "Fade out", FADE, fade_out),
];

fn tools(inv: &Invocation<'_>) -> FfmpegTools {
    FfmpegTools::from_config(inv.config)
}

fn output(inv: &Invocation<'_>, suffix: &str) -> PathBuf {
    paths::derived(inv.path(), suffix, "mp4")
}

fn duration(inv: &Invocation<'_>) -> Result<Outcome> {
    let seconds = tools(inv).probe_duration(inv.path())?;
    Ok(Outcome::report(format!("Duration: {seconds:.2} seconds")))
}

fn extract_audio(inv: &Invocation<'_>) -> Result<Outcome> {
    let target = paths::derived(inv.path(), "_audio", "mp3");
    let written = video::extract_audio(&tools(inv), inv.path(), &target)?;
    Ok(Outcome::written(written, "Audio extracted"))
}

fn concatenate(inv: &Invocation<'_>) -> Result<Outcome> {
    let clips = inv.args.path_list("paths")?;
    let target = paths::sibling(inv.path(), "concatenated_video.mp4");
    let written = video::concatenate(&tools(inv), clips, &target)?;
    Ok(Outcome::written(written, format!("Joined {} clips", clips.len())))
}

fn resize(inv: &Invocation<'_>) -> Result<Outcome> {
    let width = inv.args.int("width")?;
    let height = inv.args.int("height")?;
    let written = video::resize(
        &tools(inv),
        inv.path(),
        width,
        height,
        &output(inv, "_resized"),
    )?;
    Ok(Outcome::written(written, format!("Resized to {width}x{height}")))
}

fn add_text(inv: &Invocation<'_>) -> Result<Outcome> {
    let written = video::add_text(
        &tools(inv),
        inv.path(),
        inv.args.text("text")?,
        inv.args.int("fontSize")?,
        inv.args.text("color")?,
        &output(inv, "_text_added"),
    )?;
    Ok(Outcome::written(written, "Text added"))
}

fn change_speed(inv: &Invocation<'_>) -> Result<Outcome> {
    let factor = inv.args.float("factor")?;
    let written = video::change_speed(
        &tools(inv),
        inv.path(),
        factor,
        &output(inv, "_speed_changed"),
    )?;
    Ok(Outcome::written(written, format!("Speed changed by {factor}x")))
}

fn fade_in(inv: &Invocation<'_>) -> Result<Outcome> {
    let seconds = inv.args.float("seconds")?;
    let written = video::fade_in(&tools(inv), inv.path(), seconds, &output(inv, "_fade_in"))?;
    Ok(Outcome::written(written, format!("Faded in over {seconds}s")))
}

fn fade_out(inv: &Invocation<'_>) -> Result<Outcome> {
    let seconds = inv.args.float("seconds")?;
    let written = video::fade_out(&tools(inv), inv.path(), seconds, &output(inv, "_fade_out"))?;
    Ok(Outcome::written(written, format!("Faded out over {seconds}s")))
}

fn add_music(inv: &Invocation<'_>) -> Result<Outcome> {
    let music = inv.args.path("musicPath")?;
    let written = video::add_music(
        &tools(inv),
        inv.path(),
        music,
        &output(inv, "_with_music"),
    )?;
    Ok(Outcome::written(written, "Soundtrack replaced"))
}

fn trim(inv: &Invocation<'_>) -> Result<Outcome> {
    let start = inv.args.float("start")?;
    let end = inv.args.float("end")?;
    let written = video::trim(&tools(inv), inv.path(), start, end, &output(inv, "_trimmed"))?;
    Ok(Outcome::written(written, format!("Trimmed to {start}s-{end}s")))
}

fn rotate(inv: &Invocation<'_>) -> Result<Outcome> {
    let angle: i64 = inv
        .args
        .choice("angle")?
        .parse()
        .map_err(|_| UftError::Other("angle option is not numeric".into()))?;
    let written = video::rotate(&tools(inv), inv.path(), angle, &output(inv, "_rotated"))?;
    Ok(Outcome::written(written, format!("Rotated by {angle} degrees")))
}
