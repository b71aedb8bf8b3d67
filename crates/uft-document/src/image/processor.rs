// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: resize, rotate, flip, crop, grayscale, brightness/contrast,
// borders and captions. Operates on in-memory images using the `image` and
// `imageproc` crates; encoding is chosen from the output path.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ColorType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{self, Interpolation};
use tracing::{debug, info, instrument};
use uft_core::error::{Result, UftError};

use super::glyphs;

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns the transformed processor,
/// so calls chain:
///
/// ```ignore
/// ImageProcessor::open("photo.jpg")?
///     .resize_exact(800, 600)
///     .grayscale()
///     .save("photo.jpg")?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(UftError::NotFound(path.to_path_buf()));
        }
        let img = image::open(path).map_err(|err| {
            UftError::ImageError(format!("failed to open {}: {}", path.display(), err))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Resize to exactly `width` x `height`, ignoring aspect ratio.
    #[instrument(skip(self))]
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            "Resizing image"
        );
        Self {
            image: self
                .image
                .resize_exact(width, height, image::imageops::FilterType::Lanczos3),
        }
    }

    /// Shrink to fit within a `max` x `max` box, preserving aspect ratio.
    /// Never upscales.
    #[instrument(skip(self))]
    pub fn fit(self, max: u32) -> Self {
        if self.image.width() <= max && self.image.height() <= max {
            return self;
        }
        let fitted = self.image.thumbnail(max, max);
        debug!(new_w = fitted.width(), new_h = fitted.height(), "Fit complete");
        Self { image: fitted }
    }

    /// Rotate counter-clockwise by `degrees`.
    ///
    /// Multiples of 90 are lossless and swap dimensions as needed. Other
    /// angles rotate about the centre on an unchanged canvas with bilinear
    /// interpolation; uncovered corners become transparent.
    #[instrument(skip(self))]
    pub fn rotate_ccw(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        info!(normalised, "Rotating image");

        let near = |target: f32| (normalised - target).abs() < 0.01;
        if near(0.0) || near(360.0) {
            return self;
        }
        if near(90.0) {
            return Self {
                image: self.image.rotate270(),
            };
        }
        if near(180.0) {
            return Self {
                image: self.image.rotate180(),
            };
        }
        if near(270.0) {
            return Self {
                image: self.image.rotate90(),
            };
        }

        // imageproc rotates clockwise for positive angles.
        let rgba = self.image.to_rgba8();
        let rotated: RgbaImage = geometric_transformations::rotate_about_center(
            &rgba,
            -normalised.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );
        debug!("General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(rotated),
        }
    }

    /// Mirror left-to-right.
    pub fn flip_horizontal(self) -> Self {
        Self {
            image: self.image.fliph(),
        }
    }

    /// Mirror top-to-bottom.
    pub fn flip_vertical(self) -> Self {
        Self {
            image: self.image.flipv(),
        }
    }

    /// Crop to the box `left..right` x `top..bottom`.
    ///
    /// Fails if the box is empty or extends past the image.
    #[instrument(skip(self))]
    pub fn crop_box(self, left: u32, top: u32, right: u32, bottom: u32) -> Result<Self> {
        let (img_w, img_h) = (self.image.width(), self.image.height());
        if right <= left || bottom <= top || right > img_w || bottom > img_h {
            return Err(UftError::ImageError(format!(
                "crop box ({left}, {top}, {right}, {bottom}) is empty or outside the {img_w}x{img_h} image"
            )));
        }
        info!("Cropping image");
        Ok(Self {
            image: self.image.crop_imm(left, top, right - left, bottom - top),
        })
    }

    /// Convert to single-channel luma (alpha kept if present).
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Scale every colour channel by `factor` (0.0 = black, 1.0 = unchanged).
    #[instrument(skip(self))]
    pub fn brighten(self, factor: f32) -> Self {
        info!("Adjusting brightness");
        let mut rgba = self.image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                *channel = (*channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
            }
        }
        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    /// Stretch colours away from (factor > 1) or towards (factor < 1) the mean
    /// luminance. 0.0 yields a flat grey image, 1.0 is a no-op.
    #[instrument(skip(self))]
    pub fn contrast(self, factor: f32) -> Self {
        let luma = self.image.to_luma8();
        let pixels = (luma.width() as u64 * luma.height() as u64).max(1);
        let mean = luma.pixels().map(|p| p.0[0] as u64).sum::<u64>() as f32 / pixels as f32;
        info!(mean, "Adjusting contrast");

        let mut rgba = self.image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                let value = mean + factor * (*channel as f32 - mean);
                *channel = value.round().clamp(0.0, 255.0) as u8;
            }
        }
        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    /// Pad every side with `size` pixels of opaque black.
    #[instrument(skip(self))]
    pub fn add_border(self, size: u32) -> Self {
        let rgba = self.image.to_rgba8();
        let mut canvas = RgbaImage::from_pixel(
            rgba.width() + 2 * size,
            rgba.height() + 2 * size,
            Rgba([0, 0, 0, 255]),
        );
        image::imageops::replace(&mut canvas, &rgba, size as i64, size as i64);
        Self {
            image: DynamicImage::ImageRgba8(canvas),
        }
    }

    /// Draw `text` centred on the image in white, using the built-in bitmap
    /// font with a cap height of roughly `font_size` pixels.
    #[instrument(skip(self))]
    pub fn overlay_text(self, text: &str, font_size: u32) -> Self {
        let mut rgba = self.image.to_rgba8();
        let scale = glyphs::scale_for(font_size);
        let (text_w, text_h) = glyphs::measure(text, scale);
        let x = (rgba.width() as i64 - text_w as i64) / 2;
        let y = (rgba.height() as i64 - text_h as i64) / 2;
        glyphs::draw_text(
            &mut rgba,
            x as i32,
            y as i32,
            text,
            Rgba([255, 255, 255, 255]),
            scale,
        );
        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image, inferring the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|err| {
            UftError::ImageError(format!("cannot infer format of {}: {}", path.display(), err))
        })?;
        self.save_as(path, format)
    }

    /// Write the image in an explicit format.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn save_as(&self, path: &Path, format: ImageFormat) -> Result<()> {
        let encodable = encodable_for(&self.image, format);
        encodable
            .save_with_format(path, format)
            .map_err(|err| save_error(path, err))?;
        info!(?format, "Image saved");
        Ok(())
    }

    /// Re-encode as JPEG at `quality` (1-100).
    pub fn save_jpeg(&self, path: &Path, quality: u8) -> Result<()> {
        let writer = BufWriter::new(File::create(path).map_err(|e| UftError::io_at(path, e))?);
        let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
        encodable_for(&self.image, ImageFormat::Jpeg)
            .write_with_encoder(encoder)
            .map_err(|err| save_error(path, err))
    }

    /// Re-encode with smaller output: JPEG at `quality`, PNG at maximum
    /// lossless compression, anything else with default settings.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn save_compressed(&self, path: &Path, quality: u8) -> Result<()> {
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Jpeg) => self.save_jpeg(path, quality),
            Ok(ImageFormat::Png) => {
                let writer =
                    BufWriter::new(File::create(path).map_err(|e| UftError::io_at(path, e))?);
                let encoder =
                    PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
                self.image
                    .write_with_encoder(encoder)
                    .map_err(|err| save_error(path, err))
            }
            _ => self.save(path),
        }
    }
}

/// JPEG has no alpha channel; drop it before encoding.
fn encodable_for(image: &DynamicImage, format: ImageFormat) -> std::borrow::Cow<'_, DynamicImage> {
    use std::borrow::Cow;
    if format != ImageFormat::Jpeg || !image.color().has_alpha() {
        return Cow::Borrowed(image);
    }
    if image.color().has_color() {
        Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
    } else {
        Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
    }
}

fn save_error(path: &Path, err: image::ImageError) -> UftError {
    match err {
        image::ImageError::IoError(io) => UftError::io_at(path, io),
        other => UftError::ImageError(format!(
            "failed to save image to {}: {}",
            path.display(),
            other
        )),
    }
}
