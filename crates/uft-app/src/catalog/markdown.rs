// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markdown operations.

use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result};
use uft_document::{markdown, text};

const CREATE: &[ParameterSpec] = &[
    ParameterSpec::path("path", "New markdown file"),
    ParameterSpec::text("content", "Content"),
];
const APPEND: &[ParameterSpec] = &[ParameterSpec::text("content", "Content to append")];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Markdown, "toHtml", "Convert to HTML", &[], to_html),
    Operation::new(Category::Markdown, "extractText", "Extract plain text", &[], extract_text),
    Operation::new(Category::Markdown, "create", "Create a markdown file", CREATE, create),
    Operation::new(Category::Markdown, "preview", "Preview", &[], preview),
    Operation::new(Category::Markdown, "countWords", "Count words", &[], count_words),
    Operation::new(Category::Markdown, "listHeadings", "List headings", &[], list_headings),
    Operation::new(Category::Markdown, "append", "Append content", APPEND, append),
];

fn to_html(inv: &Invocation<'_>) -> Result<Outcome> {
    let html = markdown::to_html(&text::read(inv.path())?);
    let output = paths::derived(inv.path(), "", "html");
    text::write(&output, &html)?;
    Ok(Outcome::written(output, "Markdown converted to HTML"))
}

fn extract_text(inv: &Invocation<'_>) -> Result<Outcome> {
    let plain = markdown::extract_text(&text::read(inv.path())?);
    let output = paths::derived(inv.path(), "_extracted", "txt");
    text::write(&output, &plain)?;
    Ok(Outcome::written(output, "Plain text extracted"))
}

/// Writes the given path, not the target file.
fn create(inv: &Invocation<'_>) -> Result<Outcome> {
    let path = inv.args.path("path")?;
    text::write(path, inv.args.text("content")?)?;
    Ok(Outcome::written(path, "Markdown file created"))
}

fn preview(inv: &Invocation<'_>) -> Result<Outcome> {
    let source = text::read(inv.path())?;
    let limit = inv.config.preview_lines;
    let lines: Vec<String> = markdown::preview(&source, limit)
        .into_iter()
        .map(str::to_string)
        .collect();
    let total = text::line_count(&source);
    let summary = if total > limit {
        format!("First {limit} of {total} lines")
    } else {
        format!("{total} lines")
    };
    Ok(Outcome::report(summary).with_details(lines))
}

fn count_words(inv: &Invocation<'_>) -> Result<Outcome> {
    let count = text::word_count(&text::read(inv.path())?);
    Ok(Outcome::report(format!("Word count: {count}")))
}

fn list_headings(inv: &Invocation<'_>) -> Result<Outcome> {
    let source = text::read(inv.path())?;
    let headings: Vec<String> = markdown::headings(&source)
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Outcome::report(format!("{} headings", headings.len())).with_details(headings))
}

fn append(inv: &Invocation<'_>) -> Result<Outcome> {
    let content = inv.args.text("content")?;
    let output = inv.prepare_append()?;
    text::append(&output, &markdown::appendix(content))?;
    Ok(Outcome::written(output, "Content appended"))
}

#[cfg(test)]
mod tests {
    use super::super::tests::{fixture_dir, run};
    use uft_core::{Category, MapSource};

    fn sample(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("readme.md");
        std::fs::write(&path, "# Title\n\nIntro text.\n\n## Usage\n\nRun it.").unwrap();
        path
    }

    #[test]
    fn to_html_writes_sibling() {
        let dir = fixture_dir();
        let path = sample(dir.path());
        let report = run(Category::Markdown, "toHtml", &path, MapSource::new());
        assert!(report.success, "{report:?}");
        let html = std::fs::read_to_string(dir.path().join("readme.html")).unwrap();
        assert!(html.contains("<h2>Usage</h2>"));
    }

    #[test]
    fn lists_headings() {
        let dir = fixture_dir();
        let path = sample(dir.path());
        let report = run(Category::Markdown, "listHeadings", &path, MapSource::new());
        assert_eq!(report.details, vec!["# Title", "## Usage"]);
    }

    #[test]
    fn append_starts_on_new_line() {
        let dir = fixture_dir();
        let path = sample(dir.path());
        let report = run(
            Category::Markdown,
            "append",
            &path,
            MapSource::new().with("content", "More."),
        );
        assert!(report.success, "{report:?}");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("Run it.\nMore."));
    }

    #[test]
    fn create_writes_named_file() {
        let dir = fixture_dir();
        let path = sample(dir.path());
        let target = dir.path().join("new.md");
        let report = run(
            Category::Markdown,
            "create",
            &path,
            MapSource::new()
                .with("path", target.to_string_lossy())
                .with("content", "# New"),
        );
        assert_eq!(report.outputs, vec![target.clone()]);
        assert_eq!(std::fs::read_to_string(target).unwrap(), "# New");
    }
}
