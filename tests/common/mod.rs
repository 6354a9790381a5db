//! PDF fixtures built with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::encryption;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use md5::{Digest, Md5};
use tempfile::TempDir;

/// Password padding string of the standard security handler.
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];
const FILE_ID: &[u8] = b"pdfsift-fixture0";
const OWNER_PASSWORD: &str = "owner";

/// A fixture written to a temporary directory that lives as long as it does.
pub struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Page content under construction.
#[derive(Default)]
pub struct PageBuilder {
    ops: Vec<Operation>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: &str, x: f32, y: f32, size: f32) -> Self {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
        self
    }

    pub fn line(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.ops.extend([
            Operation::new("m", vec![x0.into(), y0.into()]),
            Operation::new("l", vec![x1.into(), y1.into()]),
            Operation::new("S", vec![]),
        ]);
        self
    }

    /// Grid of ruling lines through the given x and y positions.
    pub fn grid(mut self, xs: &[f32], ys: &[f32]) -> Self {
        let (left, right) = (xs[0], xs[xs.len() - 1]);
        let (low, high) = (
            ys.iter().cloned().fold(f32::INFINITY, f32::min),
            ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max),
        );
        self.ops.push(Operation::new("w", vec![1.into()]));
        for &y in ys {
            self = self.line(left, y, right, y);
        }
        for &x in xs {
            self = self.line(x, low, x, high);
        }
        self
    }

    pub fn image(mut self, name: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        self
    }
}

/// Document builder: Helvetica as /F1 and a small gray image as /Im1.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    kids: Vec<Object>,
    info: Vec<(String, String)>,
    user_password: Option<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0, 255, 255, 0],
        ));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => dictionary! { "Im1" => image_id },
        });

        Self {
            doc,
            pages_id,
            resources_id,
            kids: Vec::new(),
            info: Vec::new(),
            user_password: None,
        }
    }

    /// Encrypt with RC4 40-bit under `user_password` ("" opens without one).
    pub fn encrypted(mut self, user_password: &str) -> Self {
        self.user_password = Some(user_password.to_string());
        self
    }

    pub fn info(mut self, key: &str, value: &str) -> Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    pub fn page(mut self, page: PageBuilder) -> Self {
        let content = Content { operations: page.ops };
        let bytes = content.encode().expect("encode content");
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
        });
        self.kids.push(page_id.into());
        self
    }

    /// Write to `name` inside a fresh temporary directory.
    pub fn write(mut self, name: &str) -> Fixture {
        let count = self.kids.len() as i64;
        // MediaBox and Resources live on the page tree root and are inherited.
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => std::mem::take(&mut self.kids),
            "Count" => count,
            "Resources" => self.resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        if !self.info.is_empty() {
            let mut info = Dictionary::new();
            for (key, value) in &self.info {
                info.set(key.as_str(), Object::string_literal(value.as_str()));
            }
            let info_id = self.doc.add_object(info);
            self.doc.trailer.set("Info", info_id);
        }
        if let Some(password) = self.user_password.take() {
            self.seal(&password);
        }

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        self.doc.save(&path).expect("save pdf");
        Fixture { _dir: dir, path }
    }

    /// Standard security handler, revision 2: adds `/Encrypt` and `/ID`, then
    /// encrypts every string and stream in place.
    fn seal(&mut self, user_password: &str) {
        let mut owner = padded(user_password);
        rc4(&Md5::digest(padded(OWNER_PASSWORD))[..5], &mut owner);
        let encrypt_id = self.doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::String(owner, StringFormat::Hexadecimal),
            "P" => -4,
        });
        let file_id = Object::String(FILE_ID.to_vec(), StringFormat::Hexadecimal);
        self.doc.trailer.set("ID", vec![file_id.clone(), file_id]);
        self.doc.trailer.set("Encrypt", encrypt_id);

        let key = encryption::get_encryption_key(&self.doc, user_password, false)
            .expect("encryption key");
        let mut user = PASSWORD_PAD.to_vec();
        rc4(&key, &mut user);
        if let Ok(Object::Dictionary(dict)) = self.doc.get_object_mut(encrypt_id) {
            dict.set("U", Object::String(user, StringFormat::Hexadecimal));
        }

        // RC4 is symmetric, so lopdf's per-object decryption also encrypts.
        for (&id, object) in self.doc.objects.iter_mut() {
            if id == encrypt_id {
                continue;
            }
            let Ok(sealed) = encryption::decrypt_object(&key, id, &*object) else {
                continue;
            };
            match object {
                Object::Stream(stream) => stream.set_content(sealed),
                Object::String(content, _) => *content = sealed,
                _ => {}
            }
        }
        if let Ok(info_id) = self.doc.trailer.get(b"Info").and_then(Object::as_reference) {
            if let Ok(Object::Dictionary(info)) = self.doc.get_object_mut(info_id) {
                for (_, value) in info.iter_mut() {
                    if let Ok(sealed) = encryption::decrypt_object(&key, info_id, &*value) {
                        *value = Object::String(sealed, StringFormat::Hexadecimal);
                    }
                }
            }
        }
    }
}

fn padded(password: &str) -> Vec<u8> {
    password.bytes().chain(PASSWORD_PAD).take(32).collect()
}

/// RC4 keystream applied in place.
fn rc4(key: &[u8], data: &mut [u8]) {
    let mut state: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    for byte in data.iter_mut() {
        i = i.wrapping_add(1);
        j = j.wrapping_add(state[i as usize]);
        state.swap(i as usize, j as usize);
        *byte ^= state[state[i as usize].wrapping_add(state[j as usize]) as usize];
    }
}

/// Three pages: prose with a heading, a ruled 2x2 table, and a figure.
pub fn report_pdf() -> Fixture {
    PdfBuilder::new()
        .info("Title", "Quarterly Report")
        .info("Author", "Finance Team")
        .info("CreationDate", "D:20240115103045Z")
        .page(
            PageBuilder::new()
                .text("Quarterly Report", 72.0, 720.0, 18.0)
                .text("1. Introduction", 72.0, 680.0, 14.0)
                .text("Revenue grew in every region.", 72.0, 660.0, 11.0),
        )
        .page(
            PageBuilder::new()
                .text("RESULTS", 72.0, 720.0, 14.0)
                .grid(&[100.0, 200.0, 300.0], &[500.0, 480.0, 460.0])
                .text("Item", 105.0, 485.0, 10.0)
                .text("Qty", 205.0, 485.0, 10.0)
                .text("Apples", 105.0, 465.0, 10.0)
                .text("12", 205.0, 465.0, 10.0),
        )
        .page(
            PageBuilder::new()
                .text("Figure 1 shows the trend.", 72.0, 720.0, 11.0)
                .image("Im1", 50.0, 600.0, 200.0, 100.0),
        )
        .write("report.pdf")
}

/// One page carrying only an image: no text layer at all.
pub fn scanned_pdf() -> Fixture {
    PdfBuilder::new()
        .page(PageBuilder::new().image("Im1", 0.0, 0.0, 612.0, 792.0))
        .write("scan.pdf")
}

/// One page of memo text, encrypted under `user_password`.
pub fn encrypted_pdf(user_password: &str) -> Fixture {
    PdfBuilder::new()
        .info("Title", "Sealed Memo")
        .page(PageBuilder::new().text("Sealed memo body", 72.0, 720.0, 12.0))
        .encrypted(user_password)
        .write("sealed.pdf")
}

/// Prose on page 1; an unruled two-column table on page 2 whose last row
/// has no second cell.
pub fn ledger_pdf() -> Fixture {
    PdfBuilder::new()
        .page(PageBuilder::new().text("Regional ledger", 72.0, 720.0, 12.0))
        .page(
            PageBuilder::new()
                .text("Region", 72.0, 600.0, 10.0)
                .text("Units", 200.0, 600.0, 10.0)
                .text("North", 72.0, 585.0, 10.0)
                .text("40", 200.0, 585.0, 10.0)
                .text("South", 72.0, 570.0, 10.0),
        )
        .write("ledger.pdf")
}

/// A caption above an empty ruled 2x2 grid.
pub fn blank_form_pdf() -> Fixture {
    PdfBuilder::new()
        .page(
            PageBuilder::new()
                .text("Order form", 72.0, 720.0, 12.0)
                .grid(&[100.0, 200.0, 300.0], &[500.0, 480.0, 460.0]),
        )
        .write("form.pdf")
}
