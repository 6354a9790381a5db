//! Error types for pdfsift.

use std::io;
use thiserror::Error;

/// Result type alias for pdfsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while extracting a document.
///
/// Only metadata errors reach the caller of [`crate::Extractor::extract`].
/// The other variants are produced inside text, table, and figure stages,
/// where they are logged and the stage moves on.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No `%PDF-` header near the start of the file.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// A header was found but its version is malformed.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The object structure could not be parsed.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The document needs a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// A text reader failed on the document.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Rasterization or recognition returned a failure.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// An external executable could not be started.
    #[error("{tool} is unavailable: {reason}")]
    ToolUnavailable {
        /// Executable name or path
        tool: String,
        /// Why it could not be run
        reason: String,
    },

    /// A page number past the end of the document.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// JSON serialization failed.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            other => Error::PdfParse(other.to_string()),
        }
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::TextExtract(err.to_string())
    }
}
