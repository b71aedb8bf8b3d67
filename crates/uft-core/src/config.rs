// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How operations that modify their input treat the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteMode {
    /// Overwrite (or append to) the input file. No backup is kept.
    InPlace,
    /// Leave the input untouched and write `<stem>_modified.<ext>` instead.
    Derived,
}

/// Per-invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Destructive in-place writes unless the user opts out.
    pub write_mode: WriteMode,
    /// Program used for video transformations.
    pub ffmpeg: PathBuf,
    /// Program used to read video metadata.
    pub ffprobe: PathBuf,
    /// Program used to rasterise PDF pages.
    pub pdftoppm: PathBuf,
    /// Number of lines shown by markdown preview.
    pub preview_lines: usize,
    /// Bounding box (pixels, square) for image thumbnails.
    pub thumbnail_size: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            write_mode: WriteMode::InPlace,
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            pdftoppm: PathBuf::from("pdftoppm"),
            preview_lines: 20,
            thumbnail_size: 128,
        }
    }
}
