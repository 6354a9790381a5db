//! Page geometry from content streams.
//!
//! [`PageScanner`] walks a page's content stream once and records three
//! things: positioned text spans, straight ruling segments from painted
//! paths, and the placement of image XObjects. The layout-aware text
//! strategy, both table detectors, and the figure locator all consume the
//! resulting [`PageLayout`].

use std::collections::HashSet;

use crate::error::{Error, Result};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Width of an average glyph as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// A text span with position and style information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span, estimating its width from the glyph count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * GLYPH_WIDTH_FACTOR;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// A point inside the glyph box, used to place the span in a grid cell.
    pub fn anchor(&self) -> (f32, f32) {
        (self.x + 0.5, self.y + self.font_size * 0.25)
    }
}

/// A straight segment painted on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruling {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Ruling {
    /// Create a segment.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Whether the segment is horizontal within `tolerance` points.
    pub fn is_horizontal(&self, tolerance: f32) -> bool {
        (self.y1 - self.y0).abs() <= tolerance
    }

    /// Whether the segment is vertical within `tolerance` points.
    pub fn is_vertical(&self, tolerance: f32) -> bool {
        (self.x1 - self.x0).abs() <= tolerance
    }

    /// Segment length.
    pub fn length(&self) -> f32 {
        ((self.x1 - self.x0).powi(2) + (self.y1 - self.y0).powi(2)).sqrt()
    }
}

/// Where an image XObject was drawn, in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    /// XObject resource name
    pub name: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Geometry of one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Text spans in content-stream order
    pub spans: Vec<TextSpan>,
    /// Painted straight segments
    pub rulings: Vec<Ruling>,
    /// Drawn images
    pub images: Vec<ImagePlacement>,
}

/// Walks page content streams through a [`PdfBackend`].
pub struct PageScanner<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> PageScanner<'a, B> {
    /// Create a scanner over `backend`.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Scan every page in order.
    pub fn scan_all(&self) -> Result<Vec<PageLayout>> {
        self.backend
            .pages()
            .keys()
            .map(|&page_num| self.scan(page_num))
            .collect()
    }

    /// Scan a single page (1-indexed).
    pub fn scan(&self, page_num: u32) -> Result<PageLayout> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let media_box = self.backend.media_box(page_id);
        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        let images = self.backend.image_xobjects(page_id);

        let mut layout = self.walk(page_id, &ops, &images);
        layout.number = page_num;
        layout.width = (media_box[2] - media_box[0]).abs();
        layout.height = (media_box[3] - media_box[1]).abs();

        log::debug!(
            "Page {}: {} spans, {} rulings, {} images",
            page_num,
            layout.spans.len(),
            layout.rulings.len(),
            layout.images.len()
        );

        Ok(layout)
    }

    fn walk(&self, page_id: PageId, ops: &[ContentOp], images: &HashSet<Vec<u8>>) -> PageLayout {
        let mut layout = PageLayout::default();
        let mut ctm = Matrix::identity();
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut text = TextState::default();
        let mut path = PathBuilder::default();

        for op in ops {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operands(op) {
                        ctm = m.then(&ctm);
                    }
                }

                // Text state
                "BT" => {
                    text.in_block = true;
                    text.matrix = TextMatrix::default();
                }
                "ET" => text.in_block = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        text.font_resource = name.clone();
                        text.font_name = self
                            .backend
                            .font_name(page_id, name)
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    }
                    text.font_size = op.number(1).unwrap_or(12.0);
                }
                "TL" => text.matrix.leading = op.number(0).unwrap_or(0.0),
                "Td" => {
                    let (tx, ty) = (op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                    text.matrix.translate(tx, ty);
                }
                "TD" => {
                    let (tx, ty) = (op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                    text.matrix.leading = -ty;
                    text.matrix.translate(tx, ty);
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(op) {
                        text.matrix.set(m);
                    }
                }
                "T*" => text.matrix.next_line(),
                "Tj" | "TJ" => {
                    if text.in_block {
                        let shown = self.shown_text(page_id, &text, op);
                        self.push_span(&mut layout, &mut text, &ctm, shown);
                    }
                }
                "'" | "\"" => {
                    text.matrix.next_line();
                    if text.in_block {
                        let idx = if op.operator == "\"" { 2 } else { 0 };
                        let shown = match op.operands.get(idx) {
                            Some(PdfValue::Str(bytes)) => {
                                self.backend.decode_text(page_id, &text.font_resource, bytes)
                            }
                            _ => String::new(),
                        };
                        self.push_span(&mut layout, &mut text, &ctm, shown);
                    }
                }

                // Path construction
                "m" => {
                    if let (Some(x), Some(y)) = (op.number(0), op.number(1)) {
                        path.move_to(ctm.apply(x, y));
                    }
                }
                "l" => {
                    if let (Some(x), Some(y)) = (op.number(0), op.number(1)) {
                        path.line_to(ctm.apply(x, y));
                    }
                }
                "c" => {
                    if let (Some(x), Some(y)) = (op.number(4), op.number(5)) {
                        path.jump_to(ctm.apply(x, y));
                    }
                }
                "v" | "y" => {
                    if let (Some(x), Some(y)) = (op.number(2), op.number(3)) {
                        path.jump_to(ctm.apply(x, y));
                    }
                }
                "re" => {
                    if let (Some(x), Some(y), Some(w), Some(h)) =
                        (op.number(0), op.number(1), op.number(2), op.number(3))
                    {
                        path.rect([
                            ctm.apply(x, y),
                            ctm.apply(x + w, y),
                            ctm.apply(x + w, y + h),
                            ctm.apply(x, y + h),
                        ]);
                    }
                }
                "h" => path.close(),

                // Path painting
                "S" => layout.rulings.extend(path.take_stroked()),
                "s" => {
                    path.close();
                    layout.rulings.extend(path.take_stroked());
                }
                "f" | "F" | "f*" => layout.rulings.extend(path.take_filled()),
                "B" | "B*" => layout.rulings.extend(path.take_stroked()),
                "b" | "b*" => {
                    path.close();
                    layout.rulings.extend(path.take_stroked());
                }
                "n" => path.clear(),

                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        if images.contains(name) {
                            layout.images.push(place_image(name, &ctm));
                        }
                    }
                }
                _ => {}
            }
        }

        layout
    }

    /// Decode the string operand(s) of a `Tj` or `TJ` operator.
    fn shown_text(&self, page_id: PageId, text: &TextState, op: &ContentOp) -> String {
        match op.operands.first() {
            Some(PdfValue::Str(bytes)) => {
                self.backend.decode_text(page_id, &text.font_resource, bytes)
            }
            // TJ: strings interleaved with kerning in 1/1000 text space units.
            // Large negative adjustments are word gaps.
            Some(PdfValue::Array(items)) => {
                let space_threshold = 200.0;
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&self.backend.decode_text(
                            page_id,
                            &text.font_resource,
                            bytes,
                        )),
                        other => {
                            let adjustment = -other.as_number().unwrap_or(0.0);
                            if adjustment > space_threshold
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                            {
                                combined.push(' ');
                            }
                        }
                    }
                }
                combined
            }
            _ => String::new(),
        }
    }

    fn push_span(&self, layout: &mut PageLayout, text: &mut TextState, ctm: &Matrix, shown: String) {
        let glyphs = shown.chars().count() as f32;
        if !shown.trim().is_empty() {
            let (tx, ty) = text.matrix.position();
            let (x, y) = ctm.apply(tx, ty);
            let size = text.font_size * text.matrix.scale() * ctm.scale();
            layout
                .spans
                .push(TextSpan::new(shown, x, y, size, text.font_name.clone()));
        }
        // Advance past the shown glyphs so consecutive Tj calls do not stack.
        text.matrix
            .advance(glyphs * text.font_size * GLYPH_WIDTH_FACTOR);
    }
}

fn place_image(name: &[u8], ctm: &Matrix) -> ImagePlacement {
    // Images occupy the unit square mapped through the CTM.
    let corners = [
        ctm.apply(0.0, 0.0),
        ctm.apply(1.0, 0.0),
        ctm.apply(0.0, 1.0),
        ctm.apply(1.0, 1.0),
    ];
    let xs = corners.iter().map(|c| c.0);
    let ys = corners.iter().map(|c| c.1);

    ImagePlacement {
        name: String::from_utf8_lossy(name).to_string(),
        x0: xs.clone().fold(f32::INFINITY, f32::min),
        y0: ys.clone().fold(f32::INFINITY, f32::min),
        x1: xs.fold(f32::NEG_INFINITY, f32::max),
        y1: ys.fold(f32::NEG_INFINITY, f32::max),
    }
}

fn matrix_operands(op: &ContentOp) -> Option<Matrix> {
    Some(Matrix {
        a: op.number(0)?,
        b: op.number(1)?,
        c: op.number(2)?,
        d: op.number(3)?,
        e: op.number(4)?,
        f: op.number(5)?,
    })
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` followed by `next`.
    fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

struct TextState {
    in_block: bool,
    matrix: TextMatrix,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_block: false,
            matrix: TextMatrix::default(),
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
        }
    }
}

/// Text matrix plus the line matrix it resets to on line moves.
struct TextMatrix {
    text: Matrix,
    line: Matrix,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            text: Matrix::identity(),
            line: Matrix::identity(),
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: Matrix) {
        self.text = m;
        self.line = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let shift = Matrix {
            e: tx,
            f: ty,
            ..Matrix::identity()
        };
        self.line = shift.then(&self.line);
        self.text = self.line;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn advance(&mut self, tx: f32) {
        let shift = Matrix {
            e: tx,
            ..Matrix::identity()
        };
        self.text = shift.then(&self.text);
    }

    fn position(&self) -> (f32, f32) {
        (self.text.e, self.text.f)
    }

    fn scale(&self) -> f32 {
        self.text.scale()
    }
}

/// Accumulates the current path as device-space segments.
#[derive(Default)]
struct PathBuilder {
    segments: Vec<Ruling>,
    rects: Vec<[(f32, f32); 4]>,
    current: Option<(f32, f32)>,
    start: Option<(f32, f32)>,
}

impl PathBuilder {
    fn move_to(&mut self, p: (f32, f32)) {
        self.current = Some(p);
        self.start = Some(p);
    }

    fn line_to(&mut self, p: (f32, f32)) {
        if let Some(from) = self.current {
            self.segments.push(Ruling::new(from.0, from.1, p.0, p.1));
        }
        self.current = Some(p);
    }

    /// Move the current point along a curve without recording a segment.
    fn jump_to(&mut self, p: (f32, f32)) {
        self.current = Some(p);
    }

    fn rect(&mut self, corners: [(f32, f32); 4]) {
        for i in 0..4 {
            let (from, to) = (corners[i], corners[(i + 1) % 4]);
            self.segments.push(Ruling::new(from.0, from.1, to.0, to.1));
        }
        self.rects.push(corners);
        self.move_to(corners[0]);
    }

    fn close(&mut self) {
        if let (Some(from), Some(to)) = (self.current, self.start) {
            if from != to {
                self.segments.push(Ruling::new(from.0, from.1, to.0, to.1));
            }
        }
        self.current = self.start;
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.rects.clear();
        self.current = None;
        self.start = None;
    }

    /// Every segment of a stroked path is a visible line.
    fn take_stroked(&mut self) -> Vec<Ruling> {
        let segments = std::mem::take(&mut self.segments);
        self.clear();
        segments
    }

    /// Only hairline rectangles of a filled path read as lines.
    fn take_filled(&mut self) -> Vec<Ruling> {
        let max_thickness = 2.0;
        let lines = self
            .rects
            .iter()
            .filter_map(|corners| {
                let x0 = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
                let x1 = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
                let y0 = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
                let y1 = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);
                if y1 - y0 <= max_thickness && x1 - x0 > max_thickness {
                    let y = (y0 + y1) / 2.0;
                    Some(Ruling::new(x0, y, x1, y))
                } else if x1 - x0 <= max_thickness && y1 - y0 > max_thickness {
                    let x = (x0 + x1) / 2.0;
                    Some(Ruling::new(x, y0, x, y1))
                } else {
                    None
                }
            })
            .collect();
        self.clear();
        lines
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Backend serving one page of pre-decoded operations.
    pub(crate) struct OpsBackend {
        pub ops: Vec<ContentOp>,
        pub images: HashSet<Vec<u8>>,
    }

    impl OpsBackend {
        pub fn new(ops: Vec<ContentOp>) -> Self {
            Self {
                ops,
                images: HashSet::new(),
            }
        }
    }

    impl PdfBackend for OpsBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (3, 0))])
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }
        fn font_name(&self, _page: PageId, _resource: &[u8]) -> Option<String> {
            Some("Helvetica".to_string())
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
        fn media_box(&self, _page: PageId) -> [f32; 4] {
            [0.0, 0.0, 612.0, 792.0]
        }
        fn image_xobjects(&self, _page: PageId) -> HashSet<Vec<u8>> {
            self.images.clone()
        }
    }

    pub(crate) fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    pub(crate) fn text_ops(text: &str, x: f32, y: f32) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(12.0)]),
            ContentOp::new("Td", vec![num(x), num(y)]),
            ContentOp::new("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
            ContentOp::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_span_position_and_font() {
        let backend = OpsBackend::new(text_ops("Hello", 72.0, 700.0));
        let layout = PageScanner::new(&backend).scan(1).unwrap();

        assert_eq!(layout.spans.len(), 1);
        let span = &layout.spans[0];
        assert_eq!(span.text, "Hello");
        assert_eq!((span.x, span.y), (72.0, 700.0));
        assert_eq!(span.font_size, 12.0);
        assert_eq!(span.font_name, "Helvetica");
        assert_eq!((layout.width, layout.height), (612.0, 792.0));
    }

    #[test]
    fn test_tj_array_inserts_word_gap() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str(b"Hello".to_vec()),
                    PdfValue::Integer(-300),
                    PdfValue::Str(b"World".to_vec()),
                    PdfValue::Integer(-20),
                    PdfValue::Str(b"!".to_vec()),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();
        assert_eq!(layout.spans[0].text, "Hello World!");
    }

    #[test]
    fn test_next_line_uses_leading() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("TL", vec![num(14.0)]),
            ContentOp::new("Td", vec![num(50.0), num(500.0)]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"one".to_vec())]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"two".to_vec())]),
            ContentOp::new("ET", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();
        assert_eq!((layout.spans[1].x, layout.spans[1].y), (50.0, 486.0));
    }

    #[test]
    fn test_next_line_without_leading_stays_on_baseline() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Td", vec![num(50.0), num(500.0)]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"one".to_vec())]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"two".to_vec())]),
            ContentOp::new("ET", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();
        assert_eq!((layout.spans[1].x, layout.spans[1].y), (50.0, 500.0));
    }

    #[test]
    fn test_stroked_rect_yields_four_rulings() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("re", vec![num(10.0), num(20.0), num(100.0), num(50.0)]),
            ContentOp::new("S", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();

        assert_eq!(layout.rulings.len(), 4);
        assert_eq!(layout.rulings.iter().filter(|r| r.is_horizontal(0.5)).count(), 2);
        assert_eq!(layout.rulings.iter().filter(|r| r.is_vertical(0.5)).count(), 2);
    }

    #[test]
    fn test_filled_paths_only_keep_hairlines() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("re", vec![num(10.0), num(20.0), num(100.0), num(50.0)]),
            ContentOp::new("re", vec![num(10.0), num(100.0), num(200.0), num(0.5)]),
            ContentOp::new("f", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();

        assert_eq!(layout.rulings.len(), 1);
        let line = layout.rulings[0];
        assert!(line.is_horizontal(0.1));
        assert_eq!(line.length(), 200.0);
    }

    #[test]
    fn test_close_fill_stroke_closes_path() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("m", vec![num(10.0), num(20.0)]),
            ContentOp::new("l", vec![num(110.0), num(20.0)]),
            ContentOp::new("l", vec![num(110.0), num(70.0)]),
            ContentOp::new("l", vec![num(10.0), num(70.0)]),
            ContentOp::new("b", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();

        assert_eq!(layout.rulings.len(), 4);
        assert_eq!(layout.rulings.iter().filter(|r| r.is_vertical(0.5)).count(), 2);
    }

    #[test]
    fn test_discarded_path_is_not_a_ruling() {
        let backend = OpsBackend::new(vec![
            ContentOp::new("m", vec![num(0.0), num(0.0)]),
            ContentOp::new("l", vec![num(100.0), num(0.0)]),
            ContentOp::new("n", vec![]),
        ]);
        let layout = PageScanner::new(&backend).scan(1).unwrap();
        assert!(layout.rulings.is_empty());
    }

    #[test]
    fn test_image_placement_follows_ctm() {
        let mut backend = OpsBackend::new(vec![
            ContentOp::new("q", vec![]),
            ContentOp::new(
                "cm",
                vec![num(200.0), num(0.0), num(0.0), num(100.0), num(50.0), num(600.0)],
            ),
            ContentOp::new("Do", vec![PdfValue::Name(b"Im1".to_vec())]),
            ContentOp::new("Q", vec![]),
            ContentOp::new("Do", vec![PdfValue::Name(b"Fm1".to_vec())]),
        ]);
        backend.images.insert(b"Im1".to_vec());
        let layout = PageScanner::new(&backend).scan(1).unwrap();

        assert_eq!(layout.images.len(), 1);
        let image = &layout.images[0];
        assert_eq!(image.name, "Im1");
        assert_eq!((image.x0, image.y0, image.x1, image.y1), (50.0, 600.0, 250.0, 700.0));
    }

    #[test]
    fn test_ctm_translates_text() {
        let mut ops = vec![ContentOp::new(
            "cm",
            vec![num(1.0), num(0.0), num(0.0), num(1.0), num(10.0), num(20.0)],
        )];
        ops.extend(text_ops("shifted", 100.0, 100.0));
        let backend = OpsBackend::new(ops);
        let layout = PageScanner::new(&backend).scan(1).unwrap();
        assert_eq!((layout.spans[0].x, layout.spans[0].y), (110.0, 120.0));
    }

    #[test]
    fn test_missing_page_is_out_of_range() {
        let backend = OpsBackend::new(vec![]);
        let result = PageScanner::new(&backend).scan(4);
        assert!(matches!(result, Err(Error::PageOutOfRange(4, 1))));
    }
}
