//! The extraction pipeline.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::Result;
use crate::extract::{panic_message, ExtractOptions, ExtractionSelector};
use crate::figures::FigureLocator;
use crate::model::{ContentKind, ExtractionResult};
use crate::parser::MetadataReader;
use crate::tables::TableExtractor;

/// Runs metadata, figure, text, and table extraction over one document.
///
/// The returned [`ExtractionResult`] is unstructured; call
/// [`ExtractionResult::structured`] to build the heading outline.
pub struct Extractor {
    options: ExtractOptions,
    selector: ExtractionSelector,
    tables: TableExtractor,
}

impl Extractor {
    /// Create an extractor with the standard strategies for `options`.
    pub fn new(options: ExtractOptions) -> Self {
        let selector = ExtractionSelector::from_options(&options);
        Self::with_selector(options, selector)
    }

    /// Create an extractor with a custom text selector.
    pub fn with_selector(options: ExtractOptions, selector: ExtractionSelector) -> Self {
        Self {
            options,
            selector,
            tables: TableExtractor::new(),
        }
    }

    /// Extract everything from the document at `path`.
    ///
    /// Only a failure to open the document is returned as an error; every
    /// later stage degrades to an empty contribution.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult> {
        let path = path.as_ref();
        log::debug!("Extracting {}", path.display());

        let metadata = MetadataReader::new().read(path)?;
        let mut result = ExtractionResult::new(metadata);

        if self.options.extract_figures {
            result.figures = self.locate_figures(path);
        }

        match self.selector.select(path) {
            Some(selection) => {
                result.is_scanned = selection.kind == ContentKind::Ocr;
                result.extraction_methods.push(selection.strategy.to_string());
                result.content = selection.pages;

                if self.options.extract_tables {
                    result.tables = self.tables.extract(path);
                }
            }
            None => log::warn!("No text extracted from {}", path.display()),
        }

        log::debug!(
            "Finished {}: {} page(s) of text, {} table(s), {} figure(s)",
            path.display(),
            result.content.len(),
            result.tables.len(),
            result.figures.len()
        );

        Ok(result)
    }

    fn locate_figures(&self, path: &Path) -> Vec<crate::model::FigureRecord> {
        match panic::catch_unwind(AssertUnwindSafe(|| FigureLocator::new().locate(path))) {
            Ok(Ok(figures)) => figures,
            Ok(Err(e)) => {
                log::warn!("Figure location failed: {}", e);
                Vec::new()
            }
            Err(payload) => {
                log::warn!("Figure location panicked: {}", panic_message(payload.as_ref()));
                Vec::new()
            }
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
