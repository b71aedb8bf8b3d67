// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF operations. Every written PDF is assembled fresh from the source pages.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::info;
use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result, UftError};
use uft_document::pdf::raster;
use uft_document::{PdfAssembler, PdfReader};

const ANGLES: &[&str] = &["90", "180", "270"];

const MERGE: &[ParameterSpec] = &[
    ParameterSpec::path("outputPath", "Merged PDF to write"),
    ParameterSpec::path_list("inputPaths", "PDFs to merge, in order"),
];
const EXTRACT_PAGES: &[ParameterSpec] = &[ParameterSpec::int_list(
    "pages",
    "Page numbers to keep, in order",
)
.range(1.0, 1_000_000.0)];
const ROTATE_PAGES: &[ParameterSpec] = &[
    ParameterSpec::int_list("pages", "Page numbers to rotate").range(1.0, 1_000_000.0),
    ParameterSpec::choice("angle", ANGLES, "Clockwise rotation in degrees"),
];
const WATERMARK: &[ParameterSpec] = &[
    ParameterSpec::path("watermarkPath", "PDF whose first page is the watermark"),
    ParameterSpec::path("outputPath", "Watermarked PDF to write"),
];
const SEARCH: &[ParameterSpec] = &[ParameterSpec::text("query", "Text to search for").non_empty()];
const MERGE_WITH_PASSWORD: &[ParameterSpec] = &[
    ParameterSpec::path("outputPath", "Encrypted PDF to write"),
    ParameterSpec::text("password", "Password").non_empty(),
    ParameterSpec::path_list("inputPaths", "PDFs to merge, in order"),
];
const REMOVE_PASSWORD: &[ParameterSpec] = &[ParameterSpec::text("password", "Current password")];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Pdf, "toText", "Extract text", &[], to_text),
    Operation::new(Category::Pdf, "merge", "Merge PDFs", MERGE, merge),
    Operation::new(Category::Pdf, "split", "Split into single pages", &[], split),
    Operation::new(Category::Pdf, "extractPages", "Extract pages", EXTRACT_PAGES, extract_pages),
    Operation::new(Category::Pdf, "rotatePages", "Rotate pages", ROTATE_PAGES, rotate_pages),
    Operation::new(Category::Pdf, "compress", "Compress PDF", &[], compress),
    Operation::new(Category::Pdf, "watermark", "Add watermark", WATERMARK, watermark),
    Operation::new(Category::Pdf, "searchText", "Search text", SEARCH, search_text),
    Operation::new(Category::Pdf, "extractImages", "Extract images", &[], extract_images),
    Operation::new(Category::Pdf, "toImages", "Render pages as images", &[], to_images),
    Operation::new(
        Category::Pdf,
        "mergeWithPassword",
        "Merge PDFs and protect with a password",
        MERGE_WITH_PASSWORD,
        merge_with_password,
    ),
    Operation::new(
        Category::Pdf,
        "removePassword",
        "Remove password protection",
        REMOVE_PASSWORD,
        remove_password,
    ),
];

// -- Helpers ------------------------------------------------------------------

fn page_numbers(values: &[i64]) -> Vec<u32> {
    values
        .iter()
        .map(|&v| u32::try_from(v).unwrap_or(0))
        .collect()
}

/// Concatenate every page of `inputs` into one assembler.
fn merged(inputs: &[PathBuf]) -> Result<PdfAssembler> {
    let mut assembler = PdfAssembler::new();
    for input in inputs {
        let reader = PdfReader::open(input)?;
        assembler.append_all(reader.document())?;
    }
    info!(files = inputs.len(), pages = assembler.page_count(), "PDFs merged");
    Ok(assembler)
}

// -- Handlers -----------------------------------------------------------------

fn to_text(inv: &Invocation<'_>) -> Result<Outcome> {
    let text = PdfReader::open(inv.path())?.text()?;
    let output = paths::derived(inv.path(), "", "txt");
    std::fs::write(&output, &text).map_err(|e| UftError::io_at(&output, e))?;
    Ok(Outcome::written(output, format!("Extracted {} characters of text", text.chars().count())))
}

fn merge(inv: &Invocation<'_>) -> Result<Outcome> {
    let output = inv.args.path("outputPath")?.to_path_buf();
    let inputs = inv.args.path_list("inputPaths")?;
    let assembler = merged(inputs)?;
    let pages = assembler.page_count();
    assembler.save(&output)?;
    Ok(Outcome::written(output, format!("Merged {} files ({pages} pages)", inputs.len())))
}

fn split(inv: &Invocation<'_>) -> Result<Outcome> {
    let parts = PdfReader::open(inv.path())?.split()?;
    let mut outputs = Vec::with_capacity(parts.len());
    for (index, part) in parts.into_iter().enumerate() {
        let output = paths::derived(inv.path(), &format!("_page_{}", index + 1), "pdf");
        part.save(&output)?;
        outputs.push(output);
    }
    let summary = format!("Split into {} files", outputs.len());
    Ok(Outcome::written_many(outputs, summary))
}

fn extract_pages(inv: &Invocation<'_>) -> Result<Outcome> {
    let pages = page_numbers(inv.args.int_list("pages")?);
    let extracted = PdfReader::open(inv.path())?.extract_pages(&pages)?;
    let output = paths::derived(inv.path(), "_extracted", "pdf");
    extracted.save(&output)?;
    Ok(Outcome::written(output, format!("Extracted {} pages", pages.len())))
}

fn rotate_pages(inv: &Invocation<'_>) -> Result<Outcome> {
    let pages = page_numbers(inv.args.int_list("pages")?);
    let angle: i64 = inv
        .args
        .choice("angle")?
        .parse()
        .map_err(|_| UftError::Other("angle option is not numeric".into()))?;
    let mut assembler = PdfReader::open(inv.path())?.to_assembler()?;
    assembler.rotate_pages(&pages, angle)?;
    let output = paths::derived(inv.path(), "_rotated", "pdf");
    assembler.save(&output)?;
    Ok(Outcome::written(output, format!("Rotated {} pages by {angle} degrees", pages.len())))
}

fn compress(inv: &Invocation<'_>) -> Result<Outcome> {
    let before = file_size(inv.path());
    let mut assembler = PdfReader::open(inv.path())?.to_assembler()?;
    assembler.compress();
    let output = paths::derived(inv.path(), "_compressed", "pdf");
    assembler.save(&output)?;
    let after = file_size(&output);
    Ok(Outcome::written(output, "PDF compressed").detail(format!("{before} -> {after} bytes")))
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn watermark(inv: &Invocation<'_>) -> Result<Outcome> {
    let stamp = PdfReader::open(inv.args.path("watermarkPath")?)?;
    let output = inv.args.path("outputPath")?.to_path_buf();
    let mut assembler = PdfReader::open(inv.path())?.to_assembler()?;
    assembler.stamp_all(stamp.document())?;
    let pages = assembler.page_count();
    assembler.save(&output)?;
    Ok(Outcome::written(output, format!("Watermarked {pages} pages")))
}

fn search_text(inv: &Invocation<'_>) -> Result<Outcome> {
    let query = inv.args.text("query")?;
    let hits = PdfReader::open(inv.path())?.search(query)?;
    if hits.is_empty() {
        return Ok(Outcome::report(format!("'{query}' not found")));
    }
    let pages = hits.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    Ok(Outcome::report(format!("'{query}' found on {} pages", hits.len()))
        .detail(format!("pages: {pages}")))
}

fn extract_images(inv: &Invocation<'_>) -> Result<Outcome> {
    let images = PdfReader::open(inv.path())?.images();
    let mut outputs = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let output = paths::derived(inv.path(), &format!("_image_{}", index + 1), "png");
        image
            .save_with_format(&output, ImageFormat::Png)
            .map_err(|e| UftError::ImageError(format!("{}: {e}", output.display())))?;
        outputs.push(output);
    }
    let summary = format!("Extracted {} images", outputs.len());
    Ok(Outcome::written_many(outputs, summary))
}

fn to_images(inv: &Invocation<'_>) -> Result<Outcome> {
    let pages = PdfReader::open(inv.path())?.page_count();
    let outputs = raster::render_pages(&inv.config.pdftoppm, inv.path(), pages)?;
    let summary = format!("Rendered {} pages", outputs.len());
    Ok(Outcome::written_many(outputs, summary))
}

fn merge_with_password(inv: &Invocation<'_>) -> Result<Outcome> {
    let output = inv.args.path("outputPath")?.to_path_buf();
    let password = inv.args.text("password")?;
    let inputs = inv.args.path_list("inputPaths")?;
    let mut assembler = merged(inputs)?;
    assembler.encrypt(password)?;
    assembler.save(&output)?;
    Ok(Outcome::written(output, format!("Merged {} files with password protection", inputs.len())))
}

fn remove_password(inv: &Invocation<'_>) -> Result<Outcome> {
    let password = inv.args.text("password")?;
    let (reader, was_encrypted) = PdfReader::open_with_password(inv.path(), password)?;
    let output = paths::derived(inv.path(), "_unlocked", "pdf");
    reader.to_assembler()?.save(&output)?;
    let outcome = Outcome::written(output, "Password removed");
    Ok(if was_encrypted {
        outcome
    } else {
        outcome.detail("the file was not password-protected")
    })
}
