//! Layout-aware text: positioned spans reflowed onto a character grid.
//!
//! Horizontal position becomes leading spaces and vertical gaps become
//! blank lines, so columns and indentation survive in the plain text.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::PageText;
use crate::parser::{LopdfBackend, PageScanner, TextSpan};

use super::{LayoutOptions, TextStrategy};

/// Fraction of the font size within which spans share a line.
const LINE_TOLERANCE_FACTOR: f32 = 0.3;

/// Reflows each page's positioned spans into plain text.
#[derive(Debug, Clone, Copy)]
pub struct LayoutTextStrategy {
    options: LayoutOptions,
}

impl LayoutTextStrategy {
    /// Create the strategy with the given grid.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }
}

impl TextStrategy for LayoutTextStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let backend = LopdfBackend::load_file(path)?;
        let scanner = PageScanner::new(&backend);

        let mut pages = Vec::new();
        let mut last_error = None;
        for &page_num in backend.raw_doc().get_pages().keys() {
            match scanner.scan(page_num) {
                Ok(layout) => {
                    pages.push(PageText::text(page_num, reflow(&layout.spans, &self.options)))
                }
                Err(e) => {
                    log::debug!("Layout scan failed on page {}: {}", page_num, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if pages.is_empty() => Err(Error::TextExtract(e.to_string())),
            _ => Ok(pages),
        }
    }
}

/// Lay `spans` out on a character grid of `options` density.
pub fn reflow(spans: &[TextSpan], options: &LayoutOptions) -> String {
    if spans.is_empty() {
        return String::new();
    }

    let x_density = options.x_density.max(0.1);
    let y_density = options.y_density.max(0.1);
    let min_x = spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);

    let mut output = String::new();
    let mut previous_y: Option<f32> = None;

    for line in group_lines(spans) {
        let y = line[0].y;
        if let Some(prev) = previous_y {
            let blank_lines = ((prev - y) / y_density).round() as i64 - 1;
            output.push('\n');
            for _ in 0..blank_lines.max(0) {
                output.push('\n');
            }
        }
        previous_y = Some(y);

        let mut row = String::new();
        let mut width = 0usize;
        for span in line {
            let column = ((span.x - min_x) / x_density).round().max(0.0) as usize;
            if column > width {
                row.extend(std::iter::repeat(' ').take(column - width));
                width = column;
            } else if width > 0 && !row.ends_with(' ') {
                row.push(' ');
                width += 1;
            }
            row.push_str(&span.text);
            width += span.text.chars().count();
        }
        output.push_str(row.trim_end());
    }

    output
}

/// Group spans into lines, top to bottom, each sorted left to right.
fn group_lines(spans: &[TextSpan]) -> Vec<Vec<&TextSpan>> {
    let mut sorted: Vec<&TextSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<Vec<&TextSpan>> = Vec::new();
    for span in sorted {
        let tolerance = span.font_size * LINE_TOLERANCE_FACTOR;
        match lines.last_mut() {
            Some(line) if (line[0].y - span.y).abs() <= tolerance => line.push(span),
            _ => lines.push(vec![span]),
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    }
    lines
}
