use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("document is encrypted and no password was supplied")]
    Encrypted,
    #[error("failed to extract text from page {}: {message}", .page + 1)]
    ExtractionError { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors only open documents and hand out per-page text; page
/// ordering, headers and the final write live in
/// [`crate::extractor::Extractor`].
pub trait PdfBackend: Send + Sync {
    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Open and parse the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An opened document. Dropping it releases the underlying file.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Plain text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;
}
