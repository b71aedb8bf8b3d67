// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Category resolution: map a path to its operation menu by extension.

use std::path::Path;

use crate::error::{Result, UftError};
use crate::types::Category;

/// Maps file paths to categories. Pure: only the extension is consulted.
pub struct CategoryResolver;

impl CategoryResolver {
    /// Resolve `path` to a [`Category`], case-insensitively.
    ///
    /// Fails with [`UftError::UnsupportedFileType`] when the extension is
    /// missing or not in the table. The caller decides whether that is fatal.
    pub fn resolve(path: &Path) -> Result<Category> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| UftError::UnsupportedFileType(describe(path)))?;
        Category::from_extension(ext).ok_or_else(|| UftError::UnsupportedFileType(describe(path)))
    }
}

fn describe(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!(".{} ({})", ext, path.display()),
        None => format!("no extension ({})", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TABLE: &[(&str, Category)] = &[
        ("jpg", Category::Image),
        ("jpeg", Category::Image),
        ("png", Category::Image),
        ("bmp", Category::Image),
        ("gif", Category::Image),
        ("pdf", Category::Pdf),
        ("txt", Category::Text),
        ("md", Category::Markdown),
        ("mp4", Category::Video),
        ("avi", Category::Video),
        ("mov", Category::Video),
        ("mkv", Category::Video),
        ("csv", Category::Csv),
        ("json", Category::Json),
    ];

    #[test]
    fn every_supported_extension_resolves() {
        for (ext, expected) in TABLE {
            let lower = format!("dir/file.{}", ext);
            let upper = format!("dir/file.{}", ext.to_ascii_uppercase());
            assert_eq!(CategoryResolver::resolve(Path::new(&lower)).unwrap(), *expected);
            assert_eq!(CategoryResolver::resolve(Path::new(&upper)).unwrap(), *expected);
        }
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let err = CategoryResolver::resolve(Path::new("setup.exe")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFileType);
        assert!(err.to_string().contains(".exe"));
    }

    #[test]
    fn missing_extension_is_reported() {
        let err = CategoryResolver::resolve(Path::new("Makefile")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFileType);
    }
}
