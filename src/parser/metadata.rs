//! Document info dictionary reader.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate};
use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::detect::detect_header_from_path;
use crate::error::Result;
use crate::model::Metadata;

use super::backend::{decode_text_simple, LopdfBackend};

/// Reads descriptive fields and page count from a PDF.
///
/// Unlike the extraction strategies, a failure here aborts the whole run:
/// a document that cannot be opened has nothing else to offer.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataReader;

impl MetadataReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Verify the header and read metadata from the file at `path`.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Metadata> {
        let path = path.as_ref();
        let header = detect_header_from_path(path)?;
        log::debug!("Detected {} at byte {}", header, header.offset);

        let backend = LopdfBackend::load_file(path)?;
        let metadata = self.read_document(backend.raw_doc());
        log::debug!(
            "Metadata: {} pages, title {:?}",
            metadata.page_count,
            metadata.title
        );
        Ok(metadata)
    }

    /// Read metadata from an already loaded document.
    pub fn read_document(&self, doc: &LopdfDocument) -> Metadata {
        let mut metadata = Metadata {
            page_count: doc.get_pages().len() as u32,
            pdf_version: doc.version.to_string(),
            ..Default::default()
        };

        let info = doc.trailer.get(b"Info").ok().and_then(|info| match info {
            Object::Reference(id) => doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        });

        if let Some(info) = info {
            let field = |key: &[u8]| get_string_from_dict(info, key).unwrap_or_default();
            metadata.title = field(b"Title");
            metadata.author = field(b"Author");
            metadata.creator = field(b"Creator");
            metadata.producer = field(b"Producer");
            metadata.creation_date = normalize_date(&field(b"CreationDate"));
            metadata.modification_date = normalize_date(&field(b"ModDate"));
        }

        metadata
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// RFC 3339 rendering of a PDF date, or the raw value when it does not parse.
fn normalize_date(raw: &str) -> String {
    match parse_pdf_date(raw) {
        Some(date) => date.to_rfc3339(),
        None => raw.to_string(),
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
    if s.len() < 4 || !s.is_char_boundary(4) {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    let offset = parse_offset(s.get(14..).unwrap_or(""))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .and_then(|dt| dt.and_local_timezone(offset).single())
}

/// Parse the `Z`, `+HH'mm'` or `-HH'mm'` suffix of a PDF date.
fn parse_offset(suffix: &str) -> Option<FixedOffset> {
    let sign = match suffix.chars().next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let digits: String = suffix[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(0..2).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minutes: i32 = digits.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
