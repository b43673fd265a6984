use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod extractor;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use extractor::Extractor;

/// Text of a single page, tagged with its zero-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub index: usize,
    pub text: String,
}

/// Ordered page texts of one document, as produced by the [`Extractor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub pages: Vec<PageText>,
}

impl ExtractedText {
    /// Serialize to the output format: every page is preceded by a blank
    /// line and a 1-indexed `--- Page N ---` header, and followed by a
    /// newline.
    pub fn render(&self) -> String {
        let capacity = self
            .pages
            .iter()
            .map(|p| p.text.len() + page_header(p.index).len() + 1)
            .sum();
        let mut out = String::with_capacity(capacity);
        for page in &self.pages {
            out.push_str(&page_header(page.index));
            out.push_str(&page.text);
            out.push('\n');
        }
        out
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Header written before the page at zero-based `index`.
pub fn page_header(index: usize) -> String {
    let mut header = String::new();
    let _ = write!(header, "\n--- Page {} ---\n", index + 1);
    header
}

/// Statistics reported after a successful extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub pages: usize,
    /// Length of the rendered text in Unicode scalar values.
    pub chars: usize,
    /// Number of UTF-8 bytes written to the destination.
    pub bytes: usize,
}

impl ExtractionStats {
    pub fn for_rendered(pages: usize, rendered: &str) -> Self {
        Self {
            pages,
            chars: rendered.chars().count(),
            bytes: rendered.len(),
        }
    }
}

/// Progress events emitted while a document is being extracted.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The document was opened and its page count is known.
    Opened { pages: usize },
    /// A page was extracted and appended to the accumulator.
    Page {
        index: usize,
        total: usize,
        chars: usize,
    },
    /// The accumulated text was written to the destination.
    Written {
        path: PathBuf,
        stats: ExtractionStats,
    },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExtractError::NotFound(_))
    }
}

/// Extract every page of `source` with `backend` and write the result to `dest`.
///
/// Pipeline:
/// 1. Fail with [`ExtractError::NotFound`] if `source` does not exist
/// 2. Open the document via `backend` and read its page count
/// 3. Extract each page in order, prefixing it with a page header
/// 4. Write the accumulated text to `dest` in one step
pub fn extract(
    source: &Path,
    dest: &Path,
    backend: &dyn PdfBackend,
) -> Result<ExtractionStats, ExtractError> {
    Extractor::new(backend).extract(source, dest)
}
