//! Result model for PDF extraction.
//!
//! These types are plain values: the pipeline fills an [`ExtractionResult`]
//! stage by stage and hands it back to the caller, which owns persistence.

mod content;
mod figure;
mod result;
mod table;

pub use content::{ContentKind, PageText};
pub use figure::FigureRecord;
pub use result::{ExtractionResult, Headers, Metadata, SENTINEL_HEADER};
pub use table::{TableMethod, TableRecord, TableRow};
