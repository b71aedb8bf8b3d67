// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// uft-document: the file formats uft works on directly.
//
// Images (resize, rotate, crop, tone adjustments, text overlay, re-encoding),
// PDFs (text extraction, page assembly, watermarking, encryption, creation
// from text or images), plain text, markdown, CSV and JSON.

pub mod image;
pub mod json;
pub mod markdown;
pub mod pdf;
pub mod tabular;
pub mod text;

// Re-export the primary structs so callers can use `uft_document::PdfReader` etc.
pub use image::processor::ImageProcessor;
pub use pdf::assemble::PdfAssembler;
pub use pdf::reader::PdfReader;
pub use pdf::writer::{PageSize, PdfWriter};
