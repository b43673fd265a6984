//! Pure-Rust backend built on [`pdf_extract`].
//!
//! `pdf_extract` works on the whole document at once, so [`PdfExtractBackend::open`]
//! extracts every page up front and the returned document serves them from
//! memory. The library can panic on malformed input rather than returning an
//! error; those panics are caught and reported as [`BackendError::OpenError`].

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use pagetext_core::{BackendError, PdfBackend, PdfDocument};

#[derive(Debug, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }

    /// Open a document already loaded into memory.
    pub fn open_bytes(&self, data: &[u8]) -> Result<PagesDocument, BackendError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }));
        match result {
            Ok(Ok(pages)) => Ok(PagesDocument { pages }),
            Ok(Err(e)) => Err(classify(e.to_string())),
            Err(_) => Err(BackendError::OpenError(
                "PDF parser panicked (malformed document)".into(),
            )),
        }
    }
}

/// pdf-extract reports encryption only through its error text.
fn classify(message: String) -> BackendError {
    if message.to_ascii_lowercase().contains("encrypt") {
        BackendError::Encrypted
    } else {
        BackendError::OpenError(message)
    }
}

/// Every page's text, extracted when the document was opened.
#[derive(Debug, Clone)]
pub struct PagesDocument {
    pages: Vec<String>,
}

impl PdfBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let data = std::fs::read(path)?;
        tracing::trace!(path = %path.display(), bytes = data.len(), "read document bytes");
        let document = self.open_bytes(&data)?;
        Ok(Box::new(document))
    }
}

impl PdfDocument for PagesDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| BackendError::ExtractionError {
                page: index,
                message: format!("document has only {} pages", self.pages.len()),
            })
    }
}
