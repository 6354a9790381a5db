//! PDF access: the lopdf backend seam, page geometry, and metadata.

pub mod backend;
mod layout;
mod metadata;

pub use backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use layout::{ImagePlacement, PageLayout, PageScanner, Ruling, TextSpan};
pub use metadata::MetadataReader;

#[cfg(test)]
pub(crate) use layout::tests as layout_fixtures;
