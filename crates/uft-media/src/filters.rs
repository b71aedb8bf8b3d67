// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ffmpeg filter expressions. Pure string builders, kept apart from process
// handling so they can be checked without ffmpeg installed.

/// `atempo` accepts 0.5..=2.0 on older ffmpeg builds, so larger or smaller
/// factors are expressed as a chain.
pub fn atempo_chain(factor: f64) -> String {
    let mut remaining = factor;
    let mut stages = Vec::new();
    while remaining > 2.0 {
        stages.push(2.0);
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        stages.push(0.5);
        remaining /= 0.5;
    }
    stages.push(remaining);
    stages
        .iter()
        .map(|stage| format!("atempo={}", number(*stage)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Presentation timestamp rescale for a playback speed `factor`.
pub fn setpts(factor: f64) -> String {
    format!("setpts=PTS/{}", number(factor))
}

/// Counter-clockwise rotation by a multiple of 90 degrees.
pub fn rotate_ccw(degrees: i64) -> Option<&'static str> {
    match degrees.rem_euclid(360) {
        90 => Some("transpose=2"),
        180 => Some("transpose=1,transpose=1"),
        270 => Some("transpose=1"),
        _ => None,
    }
}

pub fn scale(width: i64, height: i64) -> String {
    format!("scale={width}:{height}")
}

/// Fade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

impl Fade {
    fn keyword(self) -> &'static str {
        match self {
            Fade::In => "in",
            Fade::Out => "out",
        }
    }
}

/// Video and audio fade filters starting at `start` and lasting `seconds`.
pub fn fade(direction: Fade, start: f64, seconds: f64) -> (String, String) {
    let params = format!(
        "t={}:st={}:d={}",
        direction.keyword(),
        number(start),
        number(seconds)
    );
    (format!("fade={params}"), format!("afade={params}"))
}

/// Centred caption. `color` is any ffmpeg colour name or `#RRGGBB`.
pub fn drawtext(text: &str, font_size: i64, color: &str) -> String {
    format!(
        "drawtext=expansion=none:text={}:fontsize={font_size}:fontcolor={}:x=(w-text_w)/2:y=(h-text_h)/2",
        escape_value(text),
        escape_value(color)
    )
}

/// Escape a filter option value for use inside a `-vf` filtergraph: once
/// for the option parser, then again for the graph parser.
pub fn escape_value(value: &str) -> String {
    let option_level = escape_chars(value, &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Line of an ffmpeg concat-demuxer list naming `path`.
pub fn concat_entry(path: &str) -> String {
    format!("file '{}'\n", path.replace('\'', "'\\''"))
}

/// Shortest decimal form: `2` rather than `2.0`.
fn number(value: f64) -> String {
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atempo_stays_within_limits() {
        assert_eq!(atempo_chain(1.5), "atempo=1.5");
        assert_eq!(atempo_chain(4.0), "atempo=2,atempo=2");
        assert_eq!(atempo_chain(0.25), "atempo=0.5,atempo=0.5");
        assert_eq!(atempo_chain(3.0), "atempo=2,atempo=1.5");
    }

    #[test]
    fn setpts_divides_by_factor() {
        assert_eq!(setpts(2.0), "setpts=PTS/2");
        assert_eq!(setpts(0.5), "setpts=PTS/0.5");
    }

    #[test]
    fn rotations_are_counter_clockwise() {
        assert_eq!(rotate_ccw(90), Some("transpose=2"));
        assert_eq!(rotate_ccw(180), Some("transpose=1,transpose=1"));
        assert_eq!(rotate_ccw(270), Some("transpose=1"));
        assert_eq!(rotate_ccw(-90), Some("transpose=1"));
        assert_eq!(rotate_ccw(45), None);
    }

    #[test]
    fn fades_cover_video_and_audio() {
        let (video, audio) = fade(Fade::Out, 8.5, 1.5);
        assert_eq!(video, "fade=t=out:st=8.5:d=1.5");
        assert_eq!(audio, "afade=t=out:st=8.5:d=1.5");
    }

    #[test]
    fn escapes_text_for_filtergraph() {
        let text = "this is a 'string': may contain one, or more, special characters";
        assert_eq!(
            escape_value(text),
            r"this is a \\\'string\\\'\\: may contain one\, or more\, special characters"
        );
    }

    #[test]
    fn drawtext_centres_caption() {
        assert_eq!(
            drawtext("Hi", 24, "white"),
            "drawtext=expansion=none:text=Hi:fontsize=24:fontcolor=white:x=(w-text_w)/2:y=(h-text_h)/2"
        );
    }

    #[test]
    fn concat_entries_quote_paths() {
        assert_eq!(concat_entry("/v/a.mp4"), "file '/v/a.mp4'\n");
        assert_eq!(concat_entry("/v/it's.mp4"), "file '/v/it'\\''s.mp4'\n");
    }
}
