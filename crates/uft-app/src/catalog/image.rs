// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image operations.

use image::ImageFormat;
use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result, UftError};
use uft_document::{ImageProcessor, PdfAssembler, PdfReader, PdfWriter};

const FORMATS: &[&str] = &["JPEG", "PNG", "BMP", "GIF"];
const AXES: &[&str] = &["H", "V"];

const RESIZE: &[ParameterSpec] = &[
    ParameterSpec::int("width", "New width in pixels").range(1.0, 65_535.0),
    ParameterSpec::int("height", "New height in pixels").range(1.0, 65_535.0),
];
const CONVERT: &[ParameterSpec] = &[ParameterSpec::choice("format", FORMATS, "Target format")];
const ROTATE: &[ParameterSpec] =
    &[ParameterSpec::int("angle", "Degrees to rotate counter-clockwise")];
const FLIP: &[ParameterSpec] = &[ParameterSpec::choice(
    "axis",
    AXES,
    "Mirror horizontally (H) or vertically (V)",
)];
const CROP: &[ParameterSpec] = &[
    ParameterSpec::int("left", "Left edge").range(0.0, 65_535.0),
    ParameterSpec::int("top", "Top edge").range(0.0, 65_535.0),
    ParameterSpec::int("right", "Right edge").range(0.0, 65_535.0),
    ParameterSpec::int("bottom", "Bottom edge").range(0.0, 65_535.0),
];
const COMPRESS: &[ParameterSpec] =
    &[ParameterSpec::int("quality", "JPEG quality (1-100)").range(1.0, 100.0)];
const BRIGHTNESS: &[ParameterSpec] = &[ParameterSpec::float(
    "factor",
    "Brightness factor (1.0 = unchanged)",
)
.range(0.0, 100.0)];
const CONTRAST: &[ParameterSpec] = &[ParameterSpec::float(
    "factor",
    "Contrast factor (1.0 = unchanged)",
)
.range(0.0, 100.0)];
const BORDER: &[ParameterSpec] =
    &[ParameterSpec::int("size", "Border width in pixels").range(1.0, 10_000.0)];
const OVERLAY_TEXT: &[ParameterSpec] = &[
    ParameterSpec::text("text", "Text to draw").non_empty(),
    ParameterSpec::int("fontSize", "Font size in pixels").range(1.0, 1_000.0),
];
const ADD_TO_PDF: &[ParameterSpec] =
    &[ParameterSpec::path("pdfPath", "PDF to add the image to")];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Image, "resize", "Resize image", RESIZE, resize),
    Operation::new(Category::Image, "convert", "Convert image format", CONVERT, convert),
    Operation::new(Category::Image, "rotate", "Rotate image", ROTATE, rotate),
    Operation::new(Category::Image, "flip", "Flip image", FLIP, flip),
    Operation::new(Category::Image, "grayscale", "Convert to grayscale", &[], grayscale),
    Operation::new(Category::Image, "crop", "Crop image", CROP, crop),
    Operation::new(Category::Image, "compress", "Compress image", COMPRESS, compress),
    Operation::new(Category::Image, "brightness", "Adjust brightness", BRIGHTNESS, brightness),
    Operation::new(Category::Image, "contrast", "Adjust contrast", CONTRAST, contrast),
    Operation::new(Category::Image, "border", "Add border", BORDER, border),
    Operation::new(Category::Image, "thumbnail", "Create thumbnail", &[], thumbnail),
    Operation::new(Category::Image, "overlayText", "Overlay text", OVERLAY_TEXT, overlay_text),
    Operation::new(Category::Image, "addToPdf", "Add image to a PDF", ADD_TO_PDF, add_to_pdf),
];

// -- Handlers -----------------------------------------------------------------

/// Load the target, transform it and write it back (or to the derived path).
fn rewrite(
    inv: &Invocation<'_>,
    summary: &str,
    transform: impl FnOnce(ImageProcessor) -> Result<ImageProcessor>,
) -> Result<Outcome> {
    let processor = transform(ImageProcessor::open(inv.path())?)?;
    let output = inv.in_place_output();
    processor.save(&output)?;
    Ok(Outcome::written(output, summary))
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn resize(inv: &Invocation<'_>) -> Result<Outcome> {
    let width = to_u32(inv.args.int("width")?);
    let height = to_u32(inv.args.int("height")?);
    rewrite(inv, &format!("Image resized to {width}x{height}"), |p| {
        Ok(p.resize_exact(width, height))
    })
}

fn convert(inv: &Invocation<'_>) -> Result<Outcome> {
    let (format, ext) = match inv.args.choice("format")? {
        "JPEG" => (ImageFormat::Jpeg, "jpg"),
        "PNG" => (ImageFormat::Png, "png"),
        "BMP" => (ImageFormat::Bmp, "bmp"),
        _ => (ImageFormat::Gif, "gif"),
    };
    let output = paths::derived(inv.path(), "", ext);
    ImageProcessor::open(inv.path())?.save_as(&output, format)?;
    Ok(Outcome::written(output, format!("Image converted to {ext}")))
}

fn rotate(inv: &Invocation<'_>) -> Result<Outcome> {
    let angle = inv.args.int("angle")?;
    rewrite(inv, &format!("Image rotated {angle} degrees"), |p| {
        Ok(p.rotate_ccw(angle as f32))
    })
}

fn flip(inv: &Invocation<'_>) -> Result<Outcome> {
    let horizontal = inv.args.choice("axis")? == "H";
    rewrite(inv, "Image flipped", |p| {
        Ok(if horizontal {
            p.flip_horizontal()
        } else {
            p.flip_vertical()
        })
    })
}

fn grayscale(inv: &Invocation<'_>) -> Result<Outcome> {
    rewrite(inv, "Image converted to grayscale", |p| Ok(p.grayscale()))
}

fn crop(inv: &Invocation<'_>) -> Result<Outcome> {
    let [left, top, right, bottom] =
        ["left", "top", "right", "bottom"].map(|name| inv.args.int(name).map(to_u32));
    let (left, top, right, bottom) = (left?, top?, right?, bottom?);
    rewrite(inv, "Image cropped", |p| p.crop_box(left, top, right, bottom))
}

fn compress(inv: &Invocation<'_>) -> Result<Outcome> {
    let quality = u8::try_from(inv.args.int("quality")?.clamp(1, 100)).unwrap_or(100);
    let processor = ImageProcessor::open(inv.path())?;
    let output = inv.in_place_output();
    processor.save_compressed(&output, quality)?;
    Ok(Outcome::written(output, format!("Image compressed at quality {quality}")))
}

fn brightness(inv: &Invocation<'_>) -> Result<Outcome> {
    let factor = inv.args.float("factor")? as f32;
    rewrite(inv, "Brightness adjusted", |p| Ok(p.brighten(factor)))
}

fn contrast(inv: &Invocation<'_>) -> Result<Outcome> {
    let factor = inv.args.float("factor")? as f32;
    rewrite(inv, "Contrast adjusted", |p| Ok(p.contrast(factor)))
}

fn border(inv: &Invocation<'_>) -> Result<Outcome> {
    let size = to_u32(inv.args.int("size")?);
    rewrite(inv, &format!("Added a {size}px border"), |p| Ok(p.add_border(size)))
}

fn thumbnail(inv: &Invocation<'_>) -> Result<Outcome> {
    let size = inv.config.thumbnail_size;
    let output = paths::derived(inv.path(), "_thumbnail", "jpg");
    ImageProcessor::open(inv.path())?
        .fit(size)
        .save_as(&output, ImageFormat::Jpeg)?;
    Ok(Outcome::written(output, format!("Thumbnail created (max {size}px)")))
}

fn overlay_text(inv: &Invocation<'_>) -> Result<Outcome> {
    let text = inv.args.text("text")?.to_string();
    let font_size = to_u32(inv.args.int("fontSize")?);
    rewrite(inv, "Text drawn on image", |p| Ok(p.overlay_text(&text, font_size)))
}

/// Append the image as a new last page of the given PDF.
fn add_to_pdf(inv: &Invocation<'_>) -> Result<Outcome> {
    let pdf_path = inv.args.path("pdfPath")?;
    let image_bytes = std::fs::read(inv.path()).map_err(|e| UftError::io_at(inv.path(), e))?;
    let image_pdf = PdfWriter::default().create_from_image(&image_bytes)?;
    let image_doc = lopdf::Document::load_mem(&image_pdf)
        .map_err(|e| UftError::PdfError(format!("generated image page is unreadable: {e}")))?;

    let reader = PdfReader::open(pdf_path)?;
    let mut assembler: PdfAssembler = reader.to_assembler()?;
    assembler.append_all(&image_doc)?;
    let output = paths::derived(pdf_path, "_with_image", "pdf");
    assembler.save(&output)?;
    Ok(Outcome::written(output, "Image added as the last page"))
}
