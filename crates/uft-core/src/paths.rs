// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output path naming shared by every handler.

use std::path::{Path, PathBuf};

/// `<dir>/<stem><suffix>.<ext>` next to `input`.
///
/// ```
/// use std::path::{Path, PathBuf};
/// assert_eq!(
///     uft_core::paths::derived(Path::new("docs/report.pdf"), "_page_2", "pdf"),
///     PathBuf::from("docs/report_page_2.pdf"),
/// );
/// ```
pub fn derived(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.{}", stem, suffix, ext))
}

/// Like [`derived`] but keeps the input's own extension.
pub fn derived_same_ext(input: &Path, suffix: &str) -> PathBuf {
    let ext = extension_of(input);
    derived(input, suffix, &ext)
}

/// A fixed file name placed in the same directory as `input`.
pub fn sibling(input: &Path, file_name: &str) -> PathBuf {
    input.with_file_name(file_name)
}

/// Lower-cased extension without the dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_keeps_directory() {
        assert_eq!(
            derived(Path::new("/tmp/a/notes.txt"), "_encrypted", "txt"),
            PathBuf::from("/tmp/a/notes_encrypted.txt")
        );
    }

    #[test]
    fn derived_same_ext_preserves_case_insensitive_extension() {
        assert_eq!(
            derived_same_ext(Path::new("photo.JPG"), "_modified"),
            PathBuf::from("photo_modified.jpg")
        );
    }

    #[test]
    fn sibling_replaces_file_name() {
        assert_eq!(
            sibling(Path::new("data/a.json"), "merged_output.json"),
            PathBuf::from("data/merged_output.json")
        );
    }

    #[test]
    fn bare_file_name_has_empty_parent() {
        assert_eq!(derived(Path::new("clip.mp4"), "_audio", "mp3"), PathBuf::from("clip_audio.mp3"));
    }
}
