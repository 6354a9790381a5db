//! Alternate text-layer reader backed by pdf-extract.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::PageText;
use crate::parser::LopdfBackend;

use super::TextStrategy;

/// Extracts per-page text with `pdf_extract`.
///
/// pdf-extract interprets fonts differently from lopdf and often recovers
/// text from documents whose ToUnicode maps lopdf cannot use.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlternateTextStrategy;

impl AlternateTextStrategy {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl TextStrategy for AlternateTextStrategy {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let bytes = std::fs::read(path)?;

        match pdf_extract::extract_text_from_mem_by_pages(&bytes) {
            Ok(pages) => Ok(pages
                .into_iter()
                .enumerate()
                .map(|(i, text)| PageText::text(i as u32 + 1, text))
                .collect()),
            Err(e) if is_encrypted(&bytes) => {
                log::warn!("Encrypted PDF detected: {}", e);
                Err(Error::Encrypted)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Whether lopdf sees an encryption dictionary or cannot decrypt the file.
fn is_encrypted(bytes: &[u8]) -> bool {
    match LopdfBackend::load_bytes(bytes) {
        Ok(backend) => backend.is_encrypted(),
        Err(Error::Encrypted) => true,
        Err(_) => false,
    }
}
