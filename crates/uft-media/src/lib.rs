// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// uft-media: video operations.
//
// Nothing here decodes video itself. Every operation builds an ffmpeg
// command line (filters in `filters`, process handling in `ffmpeg`) and lets
// the external tool do the work.

pub mod ffmpeg;
pub mod filters;
pub mod video;

pub use ffmpeg::FfmpegTools;
