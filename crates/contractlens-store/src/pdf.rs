//! PDF page text extraction via lopdf.

use std::path::Path;

use contractlens_core::{DocumentError, PageSource};
use lopdf::Document;
use tracing::{debug, warn};

/// Reads per-page text from PDF files.
///
/// A page whose content stream cannot be decoded comes back as `None` rather
/// than failing the document; only an unloadable file or a PDF without pages
/// is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReader;

impl PdfReader {
    pub fn new() -> Self {
        Self
    }
}

impl PageSource for PdfReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<Option<String>>, DocumentError> {
        let doc = Document::load(path).map_err(|e| DocumentError::Unreadable(e.to_string()))?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DocumentError::NoPages);
        }

        let texts: Vec<Option<String>> = pages
            .keys()
            .map(|&page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(path = %path.display(), page = page_num, error = %e, "page text unreadable");
                    None
                }
            })
            .collect();

        debug!(
            path = %path.display(),
            pages = texts.len(),
            readable = texts.iter().filter(|t| t.is_some()).count(),
            "extracted pdf pages"
        );
        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Write a minimal PDF with one text line per page.
    fn write_pdf(path: &Path, lines: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn reads_pages_in_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("msa.pdf");
        write_pdf(&path, &["1. Services", "2. Termination"]);

        let pages = PdfReader::new().read_pages(&path).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].as_deref().unwrap().contains("Services"));
        assert!(pages[1].as_deref().unwrap().contains("Termination"));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = PdfReader::new()
            .read_pages(Path::new("/nonexistent/contract.pdf"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable(_)));
    }

    #[test]
    fn corrupt_file_is_unreadable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("corrupt.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let err = PdfReader::new().read_pages(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable(_)));
    }
}
