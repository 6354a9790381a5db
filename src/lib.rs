//! # pdfsift
//!
//! Text, table, heading, and figure extraction from PDF documents.
//!
//! Text is taken from the first of several readers that produces any: the
//! document's text layer through lopdf, the same layer reflowed by
//! position, pdf-extract, and finally OCR of rendered pages through
//! `pdftoppm` and `tesseract`. Tables are found both from ruling lines and
//! from text alignment.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{extract_file, to_json, JsonFormat};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let result = extract_file("report.pdf")?.structured();
//!
//!     for (heading, lines) in &result.headers {
//!         println!("{heading}: {} lines", lines.len());
//!     }
//!     println!("{}", to_json(&result, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Fallback text extraction**: four readers tried in priority order
//! - **OCR for scanned documents**: opt-out, with configurable executables
//! - **Two table detectors**: lattice (ruling lines) and stream (alignment)
//! - **Heading outline**: regex-based section detection
//! - **Figure placement**: page and bounding box of every drawn image

pub mod detect;
pub mod error;
pub mod extract;
pub mod figures;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod structure;
pub mod tables;

// Re-export commonly used types
pub use detect::{detect_header_from_bytes, detect_header_from_path, is_pdf, PdfHeader};
pub use error::{Error, Result};
pub use extract::{
    ExtractOptions, ExtractionSelector, LayoutOptions, OcrOptions, StrategyOutcome, TextStrategy,
};
pub use model::{
    ContentKind, ExtractionResult, FigureRecord, Headers, Metadata, PageText, TableMethod,
    TableRecord, TableRow, SENTINEL_HEADER,
};
pub use pipeline::Extractor;
pub use render::{to_json, write_json, JsonFormat};
pub use structure::{structure_content, ContentStructurer};
pub use tables::{TableExtractor, TableStrategy};

use std::path::Path;

/// Extract a PDF file with default options.
///
/// The result is not yet structured; call
/// [`ExtractionResult::structured`] to fill `headers`.
///
/// # Example
///
/// ```no_run
/// use pdfsift::extract_file;
///
/// let result = extract_file("document.pdf").unwrap();
/// println!("Pages: {}", result.metadata.page_count);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    Extractor::default().extract(path)
}

/// Extract a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new()
///     .without_ocr()
///     .without_figures();
/// let result = extract_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractionResult> {
    Extractor::new(options).extract(path)
}

/// Extract, structure, and render a PDF file as JSON.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{extract_to_json, JsonFormat};
///
/// let json = extract_to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("output.json", json).unwrap();
/// ```
pub fn extract_to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = extract_file(path)?.structured();
    render::to_json(&result, format)
}
