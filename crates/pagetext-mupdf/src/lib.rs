use std::path::Path;

use mupdf::{Document, TextPageFlags};

use pagetext_core::{BackendError, PdfBackend, PdfDocument};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the core pipeline and the pure-Rust backend
/// do not transitively depend on it.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

/// An open MuPDF document with its page count resolved.
pub struct MupdfDocument {
    document: Document,
    page_count: usize,
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        // MuPDF also opens images, text, EPUB, XPS and CBZ; only PDFs are accepted
        if !document.is_pdf() {
            return Err(BackendError::OpenError("not a PDF document".into()));
        }

        if document
            .needs_password()
            .map_err(|e| BackendError::OpenError(e.to_string()))?
        {
            return Err(BackendError::Encrypted);
        }

        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        let page_count = usize::try_from(page_count)
            .map_err(|_| BackendError::OpenError(format!("invalid page count {page_count}")))?;

        tracing::trace!(path = path_str, page_count, "mupdf opened document");
        Ok(Box::new(MupdfDocument {
            document,
            page_count,
        }))
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page_err = |e: mupdf::Error| BackendError::ExtractionError {
            page: index,
            message: e.to_string(),
        };

        let page_no = i32::try_from(index).map_err(|_| BackendError::ExtractionError {
            page: index,
            message: "page index out of range".into(),
        })?;
        let page = self.document.load_page(page_no).map_err(page_err)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(page_err)?;

        // Block/line iteration keeps reading order close to MuPDF's own text output
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }

        Ok(page_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = MupdfBackend::new().open(&path);
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let result = MupdfBackend::new().open(&dir.path().join("absent.pdf"));
        assert!(result.is_err());
    }
}
