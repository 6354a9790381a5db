//! The per-document extraction aggregate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FigureRecord, PageText, TableRecord};

/// Bucket for body lines that precede the first detected heading.
pub const SENTINEL_HEADER: &str = "Main Content";

/// Heading text to body lines, in first-seen order.
pub type Headers = IndexMap<String, Vec<String>>;

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Descriptive fields from the document info dictionary
    pub metadata: Metadata,

    /// Outline produced by the content structurer
    pub headers: Headers,

    /// Per-page text from the winning strategy
    pub content: Vec<PageText>,

    /// Reserved; never populated
    pub list_items: Vec<String>,

    /// Tables from every table strategy
    pub tables: Vec<TableRecord>,

    /// Image placements
    pub figures: Vec<FigureRecord>,

    /// True when the content came from OCR
    pub is_scanned: bool,

    /// Strategy that produced `content`, if any
    pub extraction_methods: Vec<String>,
}

impl ExtractionResult {
    /// Create an empty result carrying the given metadata.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Build the header outline from `content`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// let result = pdfsift::extract_file("report.pdf")?.structured();
    /// for (heading, lines) in &result.headers {
    ///     println!("{heading}: {} lines", lines.len());
    /// }
    /// # Ok::<(), pdfsift::Error>(())
    /// ```
    pub fn structured(mut self) -> Self {
        self.headers = crate::structure::structure_content(&self.content);
        self
    }
}

/// Document metadata.
///
/// Textual fields are empty strings when the document does not carry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: String,

    /// Document author
    pub author: String,

    /// Creator application
    pub creator: String,

    /// PDF producer
    pub producer: String,

    /// Creation date, RFC 3339 when the source value parses
    pub creation_date: String,

    /// Last modification date, RFC 3339 when the source value parses
    pub modification_date: String,

    /// Total number of pages
    pub page_count: u32,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageText;

    #[test]
    fn test_empty_result_shape() {
        let json = serde_json::to_value(ExtractionResult::default()).unwrap();
        for key in ["metadata", "headers", "content", "list_items", "tables", "figures"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["is_scanned"], false);
        assert_eq!(json["metadata"]["title"], "");
    }

    #[test]
    fn test_structured_fills_headers() {
        let mut result = ExtractionResult::default();
        result.content.push(PageText::text(1, "intro line\nMETHODS\nbody"));

        let result = result.structured();
        assert_eq!(result.headers[SENTINEL_HEADER], vec!["intro line"]);
        assert_eq!(result.headers["METHODS"], vec!["body"]);
    }
}
