// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterisation through poppler's `pdftoppm`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use uft_core::error::Result;
use uft_core::external::run_tool;
use uft_core::paths;

/// Resolution used for rendered pages.
pub const RENDER_DPI: u32 = 150;

/// Arguments rendering one page of `pdf` to `<prefix>.png`.
fn page_args(pdf: &Path, page: u32, prefix: &Path) -> Vec<OsString> {
    let page = page.to_string();
    let dpi = RENDER_DPI.to_string();
    let flags: [&str; 8] = ["-png", "-r", &dpi, "-f", &page, "-l", &page, "-singlefile"];
    let mut args: Vec<OsString> = flags.iter().map(OsString::from).collect();
    args.push(pdf.as_os_str().to_owned());
    args.push(prefix.as_os_str().to_owned());
    args
}

/// Render every page to `<stem>_page_N.png` next to `pdf`.
#[instrument(skip(pdftoppm))]
pub fn render_pages(pdftoppm: &Path, pdf: &Path, page_count: usize) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::with_capacity(page_count);
    for page in 1..=page_count as u32 {
        let output = paths::derived(pdf, &format!("_page_{page}"), "png");
        // pdftoppm appends the extension itself.
        let prefix = output.with_extension("");
        run_tool(pdftoppm, page_args(pdf, page, &prefix))?;
        outputs.push(output);
    }
    info!(pages = outputs.len(), "Pages rendered");
    Ok(outputs)
}
