// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembly: build a fresh document out of pages copied from others, then
// optionally stamp, encrypt and save it. Used by every PDF operation that
// writes a new file.

use std::collections::HashMap;
use std::path::Path;

use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat, dictionary,
};
use lopdf::xref::XrefType;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use uft_core::error::{Result, UftError};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed, cyclic /Parent chains.
const MAX_TREE_DEPTH: usize = 32;

/// Resource name under which the watermark form is registered on each page.
const WATERMARK_NAME: &str = "UftWatermark";

/// Letter size, used when a watermark page declares no MediaBox.
const DEFAULT_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

pub(crate) fn pdf_err(context: &str, err: impl std::fmt::Display) -> UftError {
    UftError::PdfError(format!("{context}: {err}"))
}

/// A new single-level page tree that pages are appended to.
pub struct PdfAssembler {
    document: Document,
    pages_id: ObjectId,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfAssembler {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0i64,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        Self {
            document,
            pages_id,
        }
    }

    /// Copy the listed pages (1-based, duplicates allowed) of `source`, in
    /// the given order. Resources shared between those pages are copied once.
    #[instrument(skip(self, source))]
    pub fn append_pages(&mut self, source: &Document, page_numbers: &[u32]) -> Result<Vec<ObjectId>> {
        let pages = source.get_pages();
        let mut importer = Importer::new(source);
        let mut added = Vec::with_capacity(page_numbers.len());
        for &number in page_numbers {
            let page_id = *pages.get(&number).ok_or_else(|| {
                UftError::PdfError(format!(
                    "page {} out of range (document has {} pages)",
                    number,
                    pages.len()
                ))
            })?;
            let new_id = importer.import_page(&mut self.document, page_id)?;
            self.attach(new_id)?;
            added.push(new_id);
        }
        debug!(pages = added.len(), "Pages appended");
        Ok(added)
    }

    /// Copy every page of `source`.
    pub fn append_all(&mut self, source: &Document) -> Result<Vec<ObjectId>> {
        let numbers: Vec<u32> = source.get_pages().keys().copied().collect();
        self.append_pages(source, &numbers)
    }

    /// Carry over the document information dictionary (title, author...).
    pub fn copy_info(&mut self, source: &Document) {
        if let Ok(info) = source.trailer.get(b"Info") {
            let info = Importer::new(source).import_object(&mut self.document, info);
            if !matches!(info, Object::Null) {
                self.document.trailer.set("Info", info);
            }
        }
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().values().copied().collect()
    }

    /// Add `degrees` (clockwise, multiple of 90) to the listed pages' /Rotate.
    pub fn rotate_pages(&mut self, page_numbers: &[u32], degrees: i64) -> Result<()> {
        let pages = self.document.get_pages();
        for &number in page_numbers {
            let page_id = *pages.get(&number).ok_or_else(|| {
                UftError::PdfError(format!(
                    "page {} out of range (document has {} pages)",
                    number,
                    pages.len()
                ))
            })?;
            let page = self
                .document
                .get_dictionary_mut(page_id)
                .map_err(|e| pdf_err("cannot read page", e))?;
            let existing = page.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);
            let rotation = (existing + degrees).rem_euclid(360);
            page.set("Rotate", rotation);
            debug!(number, existing, rotation, "Page rotated");
        }
        Ok(())
    }

    /// Draw page 1 of `stamp_source` over every page as a Form XObject.
    #[instrument(skip_all)]
    pub fn stamp_all(&mut self, stamp_source: &Document) -> Result<()> {
        let stamp_pages = stamp_source.get_pages();
        let stamp_page_id = *stamp_pages
            .values()
            .next()
            .ok_or_else(|| UftError::PdfError("watermark PDF has no pages".into()))?;
        let stamp_page = stamp_source
            .get_dictionary(stamp_page_id)
            .map_err(|e| pdf_err("cannot read watermark page", e))?;
        let content = stamp_source
            .get_page_content(stamp_page_id)
            .map_err(|e| pdf_err("cannot read watermark content", e))?;

        let mut importer = Importer::new(stamp_source);
        let media_box = page_attribute(stamp_source, stamp_page, b"MediaBox")
            .map(|mb| importer.import_object(&mut self.document, &mb))
            .unwrap_or_else(|| {
                Object::Array(DEFAULT_MEDIA_BOX.iter().map(|&v| Object::Integer(v)).collect())
            });
        let mut form = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => media_box,
        };
        if let Some(resources) = page_attribute(stamp_source, stamp_page, b"Resources") {
            form.set("Resources", importer.import_object(&mut self.document, &resources));
        }
        let form_id = self.document.add_object(Stream::new(form, content));

        for page_id in self.page_ids() {
            self.stamp_page(page_id, form_id)?;
        }
        info!(pages = self.page_count(), "Watermark applied");
        Ok(())
    }

    fn stamp_page(&mut self, page_id: ObjectId, form_id: ObjectId) -> Result<()> {
        let (mut resources, existing_contents) = {
            let page = self
                .document
                .get_dictionary(page_id)
                .map_err(|e| pdf_err("cannot read page", e))?;
            let resources = self.resolve_dictionary(page.get(b"Resources").ok())?;
            let contents = match page.get(b"Contents") {
                Ok(Object::Array(items)) => items.clone(),
                Ok(other) => vec![other.clone()],
                Err(_) => Vec::new(),
            };
            (resources, contents)
        };
        let mut xobjects = self.resolve_dictionary(resources.get(b"XObject").ok())?;
        xobjects.set(WATERMARK_NAME, form_id);
        resources.set("XObject", xobjects);

        // The page content runs inside its own graphics state so the stamp
        // is drawn untransformed on top.
        let open = self
            .document
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let close = self.document.add_object(Stream::new(
            Dictionary::new(),
            format!("\nQ\nq /{WATERMARK_NAME} Do Q\n").into_bytes(),
        ));
        let mut contents: Vec<Object> = Vec::with_capacity(existing_contents.len() + 2);
        contents.push(open.into());
        contents.extend(existing_contents);
        contents.push(close.into());

        let page = self
            .document
            .get_dictionary_mut(page_id)
            .map_err(|e| pdf_err("cannot update page", e))?;
        page.set("Resources", resources);
        page.set("Contents", contents);
        Ok(())
    }

    /// Owned copy of a dictionary given directly or by reference.
    fn resolve_dictionary(&self, object: Option<&Object>) -> Result<Dictionary> {
        match object {
            Some(Object::Dictionary(dict)) => Ok(dict.clone()),
            Some(Object::Reference(id)) => self
                .document
                .get_dictionary(*id)
                .cloned()
                .map_err(|e| pdf_err("cannot resolve dictionary", e)),
            _ => Ok(Dictionary::new()),
        }
    }

    /// Compress streams and drop anything unreachable.
    pub fn compress(&mut self) {
        let pruned = self.document.prune_objects();
        self.document.delete_zero_length_streams();
        self.document.compress();
        self.document.renumber_objects();
        debug!(pruned = pruned.len(), "Document compressed");
    }

    /// Protect the document with the standard security handler (RC4, 128-bit).
    /// The same password opens and administers the file.
    ///
    /// Encrypted output is written with a classic xref table so the trailer,
    /// `/Encrypt` included, stays plain text for `PdfReader::open_with_password`.
    #[instrument(skip_all)]
    pub fn encrypt(&mut self, password: &str) -> Result<()> {
        self.document.reference_table.cross_reference_type = XrefType::CrossReferenceTable;
        self.ensure_file_id()?;
        let version = EncryptionVersion::V2 {
            document: &self.document,
            owner_password: password,
            user_password: password,
            key_length: 128,
            permissions: Permissions::all(),
        };
        let state = EncryptionState::try_from(version)
            .map_err(|e| UftError::Encryption(e.to_string()))?;
        self.document
            .encrypt(&state)
            .map_err(|e| UftError::Encryption(e.to_string()))?;
        info!("Document encrypted");
        Ok(())
    }

    /// The standard security handler keys off the trailer /ID.
    fn ensure_file_id(&mut self) -> Result<()> {
        if self.document.trailer.has(b"ID") {
            return Ok(());
        }
        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| pdf_err("cannot serialise document", e))?;
        let id = Sha256::digest(&bytes)[..16].to_vec();
        self.document.trailer.set(
            "ID",
            vec![
                Object::String(id.clone(), StringFormat::Hexadecimal),
                Object::String(id, StringFormat::Hexadecimal),
            ],
        );
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Serialise to `path`.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn save(mut self, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| pdf_err("cannot serialise document", e))?;
        std::fs::write(path, &bytes).map_err(|e| UftError::io_at(path, e))?;
        info!(bytes = bytes.len(), "PDF written");
        Ok(())
    }

    fn attach(&mut self, page_id: ObjectId) -> Result<()> {
        let pages_id = self.pages_id;
        self.document
            .get_dictionary_mut(page_id)
            .map_err(|e| pdf_err("cannot update page", e))?
            .set("Parent", pages_id);
        let pages = self
            .document
            .get_dictionary_mut(pages_id)
            .map_err(|e| pdf_err("cannot update page tree", e))?;
        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        if let Ok(Object::Array(kids)) = pages.get_mut(b"Kids") {
            kids.push(page_id.into());
        }
        pages.set("Count", count + 1);
        Ok(())
    }
}

/// A page attribute, looked up on the page itself and then its ancestors.
pub(crate) fn page_attribute(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    if let Ok(value) = page.get(key) {
        return Some(value.clone());
    }
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = source.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Deep-copies objects from one document into another, following references.
///
/// Each source object is copied at most once, so shared resources stay shared
/// and reference cycles terminate.
struct Importer<'a> {
    source: &'a Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> Importer<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    fn import_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let page = source
            .get_dictionary(page_id)
            .map_err(|e| pdf_err("cannot read page", e))?;
        let new_id = self.reserve(target, page_id);

        let mut copy = Dictionary::new();
        for (key, value) in page.iter() {
            // The parent is re-pointed at the new page tree by the caller.
            if key.as_slice() == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.import_object(target, value));
        }
        for key in INHERITABLE {
            if !copy.has(key)
                && let Some(value) = page_attribute(source, page, key)
            {
                copy.set(key.to_vec(), self.import_object(target, &value));
            }
        }
        target.objects.insert(new_id, Object::Dictionary(copy));
        Ok(new_id)
    }

    fn reserve(&mut self, target: &mut Document, source_id: ObjectId) -> ObjectId {
        let new_id = target.new_object_id();
        self.copied.insert(source_id, new_id);
        new_id
    }

    fn import_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.import_reference(target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.import_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.import_dictionary(target, &stream.dict);
                Object::Stream(Stream::new(dict, stream.content.clone()))
            }
            other => other.clone(),
        }
    }

    fn import_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.import_object(target, value));
        }
        copy
    }

    fn import_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(&copied) = self.copied.get(&id) {
            return Object::Reference(copied);
        }
        let source = self.source;
        let object = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                return Object::Null;
            }
        };
        // Never drag in another document's page tree (e.g. via an
        // annotation's /P or /Parent); it would copy every page.
        if is_page_tree_node(object) {
            return Object::Null;
        }
        let new_id = self.reserve(target, id);
        let copy = self.import_object(target, object);
        target.objects.insert(new_id, copy);
        Object::Reference(new_id)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => dict
            .get(b"Type")
            .and_then(Object::as_name)
            .map(|name| name == b"Pages")
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};

    /// A document whose pages inherit MediaBox and Resources from the tree
    /// root and each show "Page N" in Helvetica.
    pub(crate) fn sample_document(pages: u32) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let mut kids = Vec::new();
        for n in 1..=pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {n}"))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn appended_pages_keep_inherited_attributes() {
        let source = sample_document(3);
        let mut assembler = PdfAssembler::new();
        assembler.append_pages(&source, &[3, 1]).unwrap();
        assert_eq!(assembler.page_count(), 2);

        let doc = assembler.into_document();
        for page_id in doc.get_pages().values() {
            let page = doc.get_dictionary(*page_id).unwrap();
            assert!(page.has(b"MediaBox"));
            assert!(page.has(b"Resources"));
        }
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Page 3"), "{text}");
    }

    #[test]
    fn shared_resources_are_copied_once() {
        let source = sample_document(4);
        let mut assembler = PdfAssembler::new();
        assembler.append_all(&source).unwrap();
        let fonts = assembler
            .document()
            .objects
            .values()
            .filter(|obj| {
                obj.as_dict()
                    .ok()
                    .and_then(|d| d.get(b"Type").ok())
                    .and_then(|t| t.as_name().ok())
                    == Some(b"Font".as_slice())
            })
            .count();
        assert_eq!(fonts, 1);
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let source = sample_document(2);
        let err = PdfAssembler::new().append_pages(&source, &[5]).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn cyclic_references_terminate() {
        let mut source = sample_document(1);
        let page_id = *source.get_pages().get(&1).unwrap();
        // Annotation pointing back at its page, as real files do.
        let annot_id = source.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Text",
            "P" => page_id,
        });
        source
            .get_dictionary_mut(page_id)
            .unwrap()
            .set("Annots", vec![Object::from(annot_id)]);

        let mut assembler = PdfAssembler::new();
        assembler.append_all(&source).unwrap();
        assert_eq!(assembler.page_count(), 1);
    }

    #[test]
    fn rotation_accumulates() {
        let source = sample_document(2);
        let mut assembler = PdfAssembler::new();
        assembler.append_all(&source).unwrap();
        assembler.rotate_pages(&[2], 270).unwrap();
        assembler.rotate_pages(&[2], 180).unwrap();
        let doc = assembler.into_document();
        let page2 = doc.get_dictionary(doc.get_pages()[&2]).unwrap();
        assert_eq!(page2.get(b"Rotate").unwrap().as_i64().unwrap(), 90);
    }

    #[test]
    fn stamp_adds_form_to_every_page() {
        let source = sample_document(2);
        let stamp = sample_document(1);
        let mut assembler = PdfAssembler::new();
        assembler.append_all(&source).unwrap();
        assembler.stamp_all(&stamp).unwrap();
        let doc = assembler.into_document();
        for page_id in doc.get_pages().values() {
            let page = doc.get_dictionary(*page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            assert!(xobjects.has(WATERMARK_NAME.as_bytes()));
            assert_eq!(page.get(b"Contents").unwrap().as_array().unwrap().len(), 3);
        }
    }
}
