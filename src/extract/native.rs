//! Text layer extraction through lopdf.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::PageText;
use crate::parser::LopdfBackend;

use super::TextStrategy;

/// Reads each page's text layer with `lopdf::Document::extract_text`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeTextStrategy;

impl NativeTextStrategy {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl TextStrategy for NativeTextStrategy {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let backend = LopdfBackend::load_file(path)?;
        let doc = backend.raw_doc();

        let mut pages = Vec::new();
        let mut last_error = None;
        for &page_num in doc.get_pages().keys() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => pages.push(PageText::text(page_num, text)),
                Err(e) => {
                    log::debug!("lopdf could not read page {}: {}", page_num, e);
                    last_error = Some(e);
                }
            }
        }

        // Every page failing means the reader itself is broken for this file.
        match last_error {
            Some(e) if pages.is_empty() => Err(Error::TextExtract(e.to_string())),
            _ => Ok(pages),
        }
    }
}
