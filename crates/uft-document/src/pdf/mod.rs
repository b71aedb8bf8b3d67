// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: reading, assembling, encrypting, rasterising and creating PDFs.

pub mod assemble;
pub mod raster;
pub mod reader;
pub mod writer;

pub use assemble::PdfAssembler;
pub use reader::PdfReader;
pub use writer::{PageSize, PdfWriter};
