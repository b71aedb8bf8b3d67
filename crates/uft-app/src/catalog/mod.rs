// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The operation catalog: every handler the binary knows, by category.

pub mod csv;
pub mod image;
pub mod json;
pub mod markdown;
pub mod pdf;
pub mod text;
pub mod video;

use uft_core::{Registry, Result};

/// Build the registry once at start-up. Fails only on a duplicate id.
pub fn build_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    for operations in [
        image::OPERATIONS,
        pdf::OPERATIONS,
        text::OPERATIONS,
        markdown::OPERATIONS,
        video::OPERATIONS,
        csv::OPERATIONS,
        json::OPERATIONS,
    ] {
        registry.register_all(operations)?;
    }
    Ok(registry)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::{Path, PathBuf};

    use lopdf::content::{Content, Operation as PdfOp};
    use lopdf::{Dictionary, Document, Object, Stream, dictionary};
    use uft_core::{
        Category, Dispatcher, ErrorKind, ExecutionReport, FileTarget, MapSource, ToolConfig,
    };

    use super::build_registry;

    pub(crate) fn fixture_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    pub(crate) fn run(
        category: Category,
        op: &str,
        path: &Path,
        source: MapSource,
    ) -> ExecutionReport {
        run_with(ToolConfig::default(), category, op, path, source)
    }

    pub(crate) fn run_with(
        config: ToolConfig,
        category: Category,
        op: &str,
        path: &Path,
        mut source: MapSource,
    ) -> ExecutionReport {
        let registry = build_registry().unwrap();
        let target = FileTarget::new(path).unwrap();
        Dispatcher::new(&registry, config).execute(category, op, &target, &mut source)
    }

    /// A letter-size PDF whose page N shows "Page N" in Helvetica.
    pub(crate) fn sample_pdf(dir: &Path, name: &str, pages: u32) -> PathBuf {
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
        let kids: Vec<Object> = (1..=pages)
            .map(|n| {
                let content = Content {
                    operations: vec![
                        PdfOp::new("BT", vec![]),
                        PdfOp::new("Tf", vec!["F1".into(), 24.into()]),
                        PdfOp::new("Td", vec![72.into(), 700.into()]),
                        PdfOp::new("Tj", vec![Object::string_literal(format!("Page {n}"))]),
                        PdfOp::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();
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
        let path = dir.join(name);
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn registry_has_every_category() {
        let registry = build_registry().unwrap();
        for category in [
            Category::Image,
            Category::Pdf,
            Category::Text,
            Category::Markdown,
            Category::Video,
            Category::Csv,
            Category::Json,
        ] {
            assert!(!registry.list_operations(category).is_empty(), "{category}");
        }
        assert_eq!(registry.list_operations(Category::Video).len(), 11);
        assert_eq!(registry.list_operations(Category::Text).len(), 15);
    }

    #[test]
    fn lookups_are_stable() {
        let registry = build_registry().unwrap();
        let first = &registry.find(Category::Pdf, "merge").unwrap().descriptor;
        let second = &registry.find(Category::Pdf, "merge").unwrap().descriptor;
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_id_is_reported() {
        let dir = fixture_dir();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let report = run(Category::Text, "sharpen", &path, MapSource::new());
        assert_eq!(report.error_kind, Some(ErrorKind::UnknownOperation));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
