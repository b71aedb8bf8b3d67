// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open, inspect, search and take apart existing PDF documents
// using the `lopdf` crate. Anything that produces a new file goes through
// `PdfAssembler`.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Document, Object, Stream};
use tracing::{debug, info, instrument};
use uft_core::error::{Result, UftError};

use super::assemble::{PdfAssembler, pdf_err};

/// Reads and takes apart existing PDF files.
pub struct PdfReader {
    document: Document,
    source_path: PathBuf,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open an unprotected PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = load(path)?;
        if document.is_encrypted() {
            return Err(UftError::PasswordProtected(path.to_path_buf()));
        }
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self {
            document,
            source_path: path.to_path_buf(),
        })
    }

    /// Open a PDF, decrypting it with `password` if it is protected.
    ///
    /// Returns the reader and whether a password was actually needed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open_with_password(path: impl AsRef<Path>, password: &str) -> Result<(Self, bool)> {
        let path = path.as_ref();
        let document = load(path)?;
        let was_encrypted = document.is_encrypted();
        let document = if was_encrypted {
            let document = load_protected(path, password)?;
            info!("PDF decrypted");
            document
        } else {
            document
        };
        if document.get_pages().is_empty() {
            return Err(UftError::PdfError(format!(
                "{} has no readable pages",
                path.display()
            )));
        }
        Ok((
            Self {
                document,
                source_path: path.to_path_buf(),
            },
            was_encrypted,
        ))
    }

    /// Wrap an in-memory document.
    pub fn from_document(document: Document, source_path: impl Into<PathBuf>) -> Self {
        Self {
            document,
            source_path: source_path.into(),
        }
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page numbers in order, 1-based.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().keys().copied().collect()
    }

    /// Text of a single page.
    pub fn page_text(&self, page_number: u32) -> Result<String> {
        self.document
            .extract_text(&[page_number])
            .map_err(|e| pdf_err(&format!("cannot extract text of page {page_number}"), e))
    }

    /// Text of every page, in order.
    #[instrument(skip(self))]
    pub fn text(&self) -> Result<String> {
        let mut text = String::new();
        for number in self.page_numbers() {
            text.push_str(&self.page_text(number)?);
        }
        debug!(chars = text.len(), "Text extracted");
        Ok(text)
    }

    /// Pages whose text contains `query`, ignoring case.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str) -> Result<Vec<u32>> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        for number in self.page_numbers() {
            if self.page_text(number)?.to_lowercase().contains(&needle) {
                hits.push(number);
            }
        }
        Ok(hits)
    }

    // -- Restructuring ----------------------------------------------------------

    /// A new document with every page, ready for further edits.
    pub fn to_assembler(&self) -> Result<PdfAssembler> {
        let mut assembler = PdfAssembler::new();
        assembler.append_all(&self.document)?;
        assembler.copy_info(&self.document);
        Ok(assembler)
    }

    /// A new document made of the listed pages, in the given order.
    pub fn extract_pages(&self, page_numbers: &[u32]) -> Result<PdfAssembler> {
        let mut assembler = PdfAssembler::new();
        assembler.append_pages(&self.document, page_numbers)?;
        Ok(assembler)
    }

    /// One single-page document per page.
    #[instrument(skip(self))]
    pub fn split(&self) -> Result<Vec<PdfAssembler>> {
        let parts = self
            .page_numbers()
            .into_iter()
            .map(|number| self.extract_pages(&[number]))
            .collect::<Result<Vec<_>>>()?;
        info!(parts = parts.len(), "PDF split");
        Ok(parts)
    }

    // -- Images -----------------------------------------------------------------

    /// Decode every embedded raster image this crate understands: JPEG
    /// (DCTDecode) streams and 8-bit RGB or grayscale samples, raw or
    /// Flate-compressed. Other encodings are skipped.
    #[instrument(skip(self))]
    pub fn images(&self) -> Vec<DynamicImage> {
        let mut images = Vec::new();
        let mut skipped = 0usize;
        for (id, object) in &self.document.objects {
            let Object::Stream(stream) = object else {
                continue;
            };
            if !has_name(stream, b"Subtype", b"Image") {
                continue;
            }
            match decode_image(stream) {
                Some(image) => images.push(image),
                None => {
                    skipped += 1;
                    debug!(?id, "Unsupported image encoding skipped");
                }
            }
        }
        info!(found = images.len(), skipped, "Images extracted");
        images
    }
}

fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(UftError::NotFound(path.to_path_buf()));
    }
    Document::load(path).map_err(|err| pdf_err(&format!("failed to open {}", path.display()), err))
}

/// lopdf only parses the body of an encrypted file when its user password
/// is empty. The trailer's `/Encrypt` key is renamed for the initial parse,
/// which leaves every object as stored, then restored before decrypting.
fn load_protected(path: &Path, password: &str) -> Result<Document> {
    const KEY: &[u8] = b"/Encrypt";
    const HIDDEN: &[u8] = b"/Encryp_";

    let mut bytes = std::fs::read(path).map_err(|e| UftError::io_at(path, e))?;
    let at = bytes
        .windows(KEY.len() + 1)
        .rposition(|w| w.starts_with(KEY) && !w[KEY.len()].is_ascii_alphanumeric())
        .ok_or_else(|| UftError::PdfError(format!("{} has no trailer /Encrypt", path.display())))?;
    bytes[at..at + KEY.len()].copy_from_slice(HIDDEN);

    let mut document = Document::load_mem(&bytes)
        .map_err(|err| pdf_err(&format!("failed to open {}", path.display()), err))?;
    let encrypt = document
        .trailer
        .remove(&HIDDEN[1..])
        .ok_or_else(|| UftError::PdfError(format!("{} has no trailer /Encrypt", path.display())))?;
    document.trailer.set("Encrypt", encrypt);
    document
        .decrypt(password)
        .map_err(|_| UftError::WrongPassword(path.to_path_buf()))?;
    Ok(document)
}

fn has_name(stream: &Stream, key: &[u8], expected: &[u8]) -> bool {
    stream
        .dict
        .get(key)
        .and_then(Object::as_name)
        .map(|name| name == expected)
        .unwrap_or(false)
}

/// Filter names applied to a stream, in order.
fn filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_image(stream: &Stream) -> Option<DynamicImage> {
    let filters = filters(stream);
    match filters.as_slice() {
        [dct] if dct.as_slice() == b"DCTDecode" => {
            image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg).ok()
        }
        [] => decode_samples(stream, stream.content.clone()),
        [flate] if flate.as_slice() == b"FlateDecode" => {
            decode_samples(stream, stream.decompressed_content().ok()?)
        }
        _ => None,
    }
}

fn decode_samples(stream: &Stream, samples: Vec<u8>) -> Option<DynamicImage> {
    let dict = &stream.dict;
    let width = u32::try_from(dict.get(b"Width").and_then(Object::as_i64).ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").and_then(Object::as_i64).ok()?).ok()?;
    let bits = dict.get(b"BitsPerComponent").and_then(Object::as_i64).ok()?;
    if bits != 8 {
        return None;
    }
    if has_name(stream, b"ColorSpace", b"DeviceRGB") {
        RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8)
    } else if has_name(stream, b"ColorSpace", b"DeviceGray") {
        GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::assemble::tests::sample_document;
    use lopdf::dictionary;

    fn reader(pages: u32) -> PdfReader {
        PdfReader::from_document(sample_document(pages), "sample.pdf")
    }

    #[test]
    fn search_is_case_insensitive() {
        let reader = reader(3);
        assert_eq!(reader.search("page 2").unwrap(), vec![2]);
        assert_eq!(reader.search("PAGE").unwrap(), vec![1, 2, 3]);
        assert!(reader.search("absent").unwrap().is_empty());
    }

    #[test]
    fn split_yields_one_document_per_page() {
        let parts = reader(3).split().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.page_count() == 1));
    }

    #[test]
    fn extracts_raw_rgb_and_gray_images() {
        let mut doc = sample_document(1);
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![255, 0, 0, 0, 255, 0],
        ));
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![128],
        ));
        doc.add_object(Stream::new(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceCMYK",
                "BitsPerComponent" => 8,
            },
            vec![0, 0, 0, 0],
        ));
        let images = PdfReader::from_document(doc, "x.pdf").images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].to_rgb8().get_pixel(1, 0).0, [0, 255, 0]);
    }

    #[test]
    fn encrypted_file_reopens_only_with_its_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.pdf");
        let mut assembler = PdfAssembler::new();
        assembler.append_all(&sample_document(3)).unwrap();
        assembler.encrypt("s3cret").unwrap();
        assembler.save(&path).unwrap();

        assert!(matches!(
            PdfReader::open(&path),
            Err(UftError::PasswordProtected(_))
        ));
        assert!(matches!(
            PdfReader::open_with_password(&path, "nope"),
            Err(UftError::WrongPassword(_))
        ));

        let (reader, was_encrypted) = PdfReader::open_with_password(&path, "s3cret").unwrap();
        assert!(was_encrypted);
        assert_eq!(reader.page_count(), 3);
        assert_eq!(reader.search("page 3").unwrap(), vec![3]);
    }

    #[test]
    fn document_without_pages_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        sample_document(0).save(&path).unwrap();

        let err = PdfReader::open_with_password(&path, "").err().unwrap();
        assert!(matches!(err, UftError::PdfError(ref msg) if msg.contains("no readable pages")));
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let err = PdfReader::open("/no/such/file.pdf").err().unwrap();
        assert!(matches!(err, UftError::NotFound(_)));
    }
}
