// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markdown rendering and inspection using `pulldown-cmark`.

use pulldown_cmark::{Event, Options, Parser, TagEnd, html};
use tracing::{debug, instrument};

/// Extensions enabled for every parse: tables, footnotes, strikethrough and
/// task lists.
fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render markdown to an HTML fragment.
#[instrument(skip_all, fields(len = markdown.len()))]
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options()));
    debug!(html_len = out.len(), "Markdown rendered");
    out
}

/// Plain text with all markup removed. Block elements end with a newline.
pub fn extract_text(markdown: &str) -> String {
    let mut out = String::new();
    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableRow
                | TagEnd::TableHead,
            ) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::TableCell) => out.push('\t'),
            _ => {}
        }
    }
    out
}

/// Lines that start with `#`, as written.
pub fn headings(markdown: &str) -> Vec<&str> {
    markdown
        .lines()
        .filter(|line| line.starts_with('#'))
        .collect()
}

/// The first `lines` lines of the source.
pub fn preview(markdown: &str, lines: usize) -> Vec<&str> {
    markdown.lines().take(lines).collect()
}

/// Text appended to a markdown file: always starts on a new line.
pub fn appendix(content: &str) -> String {
    format!("\n{content}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Title\n\nSome *emphasis* and `code`.\n\n## Section\n\n- one\n- two\n";

    #[test]
    fn renders_html() {
        let html = to_html(SAMPLE);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn renders_tables() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn extracts_plain_text() {
        let text = extract_text(SAMPLE);
        assert_eq!(text, "Title\nSome emphasis and code.\nSection\none\ntwo\n");
    }

    #[test]
    fn lists_headings_and_preview() {
        assert_eq!(headings(SAMPLE), ["# Title", "## Section"]);
        assert_eq!(preview(SAMPLE, 2), ["# Title", ""]);
    }

    #[test]
    fn appendix_starts_new_line() {
        assert_eq!(appendix("more"), "\nmore");
    }
}
