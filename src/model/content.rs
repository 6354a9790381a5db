//! Per-page text records.

use serde::{Deserialize, Serialize};

/// Origin of a page's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// Read from the document's digital text layer
    #[serde(rename = "text")]
    Text,
    /// Recognized from a rasterized page image
    #[serde(rename = "ocr_text")]
    Ocr,
}

impl ContentKind {
    /// Tag used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Ocr => "ocr_text",
        }
    }
}

/// Text extracted from a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page: u32,

    /// Raw page text, possibly spanning multiple lines
    pub content: String,

    /// Whether the text came from the text layer or from OCR
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl PageText {
    /// Create a record for text read from the digital text layer.
    pub fn text(page: u32, content: impl Into<String>) -> Self {
        Self {
            page,
            content: content.into(),
            kind: ContentKind::Text,
        }
    }

    /// Create a record for OCR-derived text.
    pub fn ocr(page: u32, content: impl Into<String>) -> Self {
        Self {
            page,
            content: content.into(),
            kind: ContentKind::Ocr,
        }
    }

    /// Whether the page carries any non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.content.trim().is_empty()
    }
}
