use std::path::Path;

use crate::backend::PdfBackend;
use crate::{ExtractError, ExtractedText, ExtractionStats, PageText, ProgressEvent};

/// Runs the open → per-page extraction → single write pipeline over a
/// [`PdfBackend`].
///
/// The extractor holds no state between calls; each call opens its own
/// document and drops it before returning.
pub struct Extractor<'a> {
    backend: &'a dyn PdfBackend,
}

impl<'a> Extractor<'a> {
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extract `source` and write the rendered text to `dest`.
    pub fn extract(&self, source: &Path, dest: &Path) -> Result<ExtractionStats, ExtractError> {
        self.extract_with_progress(source, dest, |_| {})
    }

    /// Same as [`Extractor::extract`], reporting progress through `on_event`.
    ///
    /// Nothing is written unless every page was extracted; `dest` is
    /// created or truncated only at the final step.
    pub fn extract_with_progress<F>(
        &self,
        source: &Path,
        dest: &Path,
        mut on_event: F,
    ) -> Result<ExtractionStats, ExtractError>
    where
        F: FnMut(ProgressEvent),
    {
        let extracted = self.extract_text_with_progress(source, &mut on_event)?;
        let rendered = extracted.render();

        std::fs::write(dest, rendered.as_bytes()).map_err(|source| ExtractError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        let stats = ExtractionStats::for_rendered(extracted.page_count(), &rendered);
        tracing::info!(
            path = %dest.display(),
            pages = stats.pages,
            chars = stats.chars,
            "wrote extracted text"
        );
        on_event(ProgressEvent::Written {
            path: dest.to_path_buf(),
            stats,
        });
        Ok(stats)
    }

    /// Extract every page of `source` without writing anything.
    pub fn extract_text(&self, source: &Path) -> Result<ExtractedText, ExtractError> {
        self.extract_text_with_progress(source, &mut |_| {})
    }

    /// Extract every page of `source`, reporting `Opened` and `Page` events.
    pub fn extract_text_with_progress(
        &self,
        source: &Path,
        on_event: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ExtractedText, ExtractError> {
        if !source.exists() {
            return Err(ExtractError::NotFound(source.to_path_buf()));
        }

        let parse_err = |e| ExtractError::Parse {
            path: source.to_path_buf(),
            source: e,
        };

        let document = self.backend.open(source).map_err(parse_err)?;
        let total = document.page_count();
        tracing::debug!(
            backend = self.backend.name(),
            path = %source.display(),
            pages = total,
            "opened document"
        );
        on_event(ProgressEvent::Opened { pages: total });

        let mut pages = Vec::with_capacity(total);
        for index in 0..total {
            let text = document.page_text(index).map_err(parse_err)?;
            let chars = text.chars().count();
            if text.trim().is_empty() {
                // Scanned or image-only pages come back empty; kept as-is.
                tracing::debug!(page = index + 1, "page has no extractable text");
            } else {
                tracing::trace!(page = index + 1, chars, "extracted page");
            }
            pages.push(PageText { index, text });
            on_event(ProgressEvent::Page {
                index,
                total,
                chars,
            });
        }

        Ok(ExtractedText { pages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, PdfDocument};

    struct FixedBackend(Vec<&'static str>);

    struct FixedDocument(Vec<&'static str>);

    impl PdfBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
            Ok(Box::new(FixedDocument(self.0.clone())))
        }
    }

    impl PdfDocument for FixedDocument {
        fn page_count(&self) -> usize {
            self.0.len()
        }

        fn page_text(&self, index: usize) -> Result<String, BackendError> {
            Ok(self.0[index].to_string())
        }
    }

    #[test]
    fn progress_events_arrive_in_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.pdf");
        let dest = dir.path().join("out.txt");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let backend = FixedBackend(vec!["a", "", "ccc"]);
        let mut events = Vec::new();
        Extractor::new(&backend)
            .extract_with_progress(&source, &dest, |e| events.push(e))
            .unwrap();

        assert!(matches!(events[0], ProgressEvent::Opened { pages: 3 }));
        let page_chars: Vec<(usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Page { index, chars, .. } => Some((*index, *chars)),
                _ => None,
            })
            .collect();
        assert_eq!(page_chars, vec![(0, 1), (1, 0), (2, 3)]);
        assert!(matches!(events.last(), Some(ProgressEvent::Written { .. })));
    }

    #[test]
    fn extract_text_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let backend = FixedBackend(vec!["only page"]);
        let text = Extractor::new(&backend).extract_text(&source).unwrap();

        assert_eq!(text.page_count(), 1);
        assert_eq!(text.pages[0].text, "only page");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_source_is_checked_before_opening() {
        struct PanicBackend;
        impl PdfBackend for PanicBackend {
            fn name(&self) -> &'static str {
                "panic"
            }
            fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
                panic!("backend must not be reached for a missing source");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let err = Extractor::new(&PanicBackend)
            .extract_text(&dir.path().join("nope.pdf"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
