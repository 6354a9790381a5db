//! PDF backend abstraction layer.
//!
//! The page scanner and the metadata reader only see this trait, so the
//! concrete PDF library (lopdf) stays behind one seam and the geometry code
//! can be tested against hand-written content streams.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter, used when a page carries no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if this operand is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }

    /// Numeric operand at `idx`, if present.
    pub fn number(&self, idx: usize) -> Option<f32> {
        self.operands.get(idx).and_then(PdfValue::as_number)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Base font name for a font resource on the given page.
    fn font_name(&self, page: PageId, resource: &[u8]) -> Option<String>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String;

    /// Page MediaBox `[llx, lly, urx, ury]`, honoring inheritance.
    fn media_box(&self, page: PageId) -> [f32; 4];

    /// Resource names of the image XObjects available to the page.
    fn image_xobjects(&self, page: PageId) -> HashSet<Vec<u8>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
///
/// Each extraction strategy opens its own backend; the underlying document
/// is released when the backend is dropped.
pub struct LopdfBackend {
    doc: LopdfDocument,
    encrypted: bool,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    ///
    /// Encrypted documents are opened with the empty user password. A document
    /// that needs any other password fails with [`Error::Encrypted`].
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| {
            if declares_encryption(data) {
                log::debug!("Encrypted PDF failed to load: {}", e);
                Error::Encrypted
            } else {
                Error::from(e)
            }
        })?;
        Self::unlock(doc)
    }

    fn unlock(mut doc: LopdfDocument) -> Result<Self> {
        let encrypted = doc.is_encrypted();
        if encrypted {
            doc.decrypt("").map_err(|e| {
                log::debug!("Empty user password rejected: {}", e);
                Error::Encrypted
            })?;
        }
        Ok(Self { doc, encrypted })
    }

    /// Direct access to the underlying `lopdf::Document`.
    ///
    /// Escape hatch for the info dictionary and per-page text extraction.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Whether the file carried an encryption dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Look up a page attribute, walking up the page tree for inherited keys.
    fn inherited<'a>(&'a self, page: PageId, key: &[u8]) -> Option<&'a Object> {
        let mut current = self.doc.get_dictionary(page).ok();
        // Bounded walk guards against cyclic Parent links.
        for _ in 0..32 {
            let dict = current?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }
        None
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    fn stream_subtype(&self, id: ObjectId) -> Option<String> {
        match self.doc.get_object(id) {
            Ok(Object::Stream(stream)) => stream
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(|s| s.as_name_str().ok())
                .map(String::from),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without Contents is blank, not broken.
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .or_else(|_| Ok(s.content.clone()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            match s.decompressed_content() {
                                Ok(data) => content.extend_from_slice(&data),
                                Err(_) => content.extend_from_slice(&s.content),
                            }
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn font_name(&self, page: PageId, resource: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font = fonts.get(resource)?;
        font.get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
    }

    fn decode_text(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = fonts.get(font) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn media_box(&self, page: PageId) -> [f32; 4] {
        let values = self
            .inherited(page, b"MediaBox")
            .and_then(|obj| match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| arr.iter().filter_map(get_number).collect::<Vec<f32>>());

        match values {
            Some(v) if v.len() >= 4 => [v[0], v[1], v[2], v[3]],
            _ => DEFAULT_MEDIA_BOX,
        }
    }

    fn image_xobjects(&self, page: PageId) -> HashSet<Vec<u8>> {
        let mut names = HashSet::new();

        let xobjects = self
            .inherited(page, b"Resources")
            .and_then(|res| self.resolve_dict(res))
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|x| self.resolve_dict(x));

        if let Some(xobjects) = xobjects {
            for (name, obj) in xobjects.iter() {
                if let Ok(id) = obj.as_reference() {
                    if self.stream_subtype(id).as_deref() == Some("Image") {
                        names.insert(name.clone());
                    }
                }
            }
        }

        names
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
/// Whether the raw file names an `/Encrypt` dictionary anywhere.
fn declares_encryption(data: &[u8]) -> bool {
    data.windows(b"/Encrypt".len()).any(|w| w == b"/Encrypt")
}

fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
