//! Stream-mode table detection from text alignment.
//!
//! Without ruling lines, a table shows up as consecutive rows whose spans
//! start at the same few x positions. Those recurring left edges become
//! column boundaries; runs of rows that line up with them become tables.
//! The first row of each table names its columns.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::Result;
use crate::model::{TableMethod, TableRecord, TableRow};
use crate::parser::TextSpan;

use super::{number_records, scan_document, TableStrategy};

/// Bucket width when grouping left edges into candidate columns.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span's left edge may sit from a column edge and still align.
const ALIGN_TOLERANCE: f32 = 5.0;

/// How far left of its column edge a span may start.
const COLUMN_LEAD: f32 = 10.0;

/// A run of aligned rows found on a page.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first row
    pub top_y: f32,
    /// Baseline of the last row
    pub bottom_y: f32,
    /// Leftmost span edge
    pub left_x: f32,
    /// Rightmost span edge
    pub right_x: f32,
    /// Column left edges, ascending
    pub columns: Vec<f32>,
    /// Rows top to bottom
    pub rows: Vec<TableRowData>,
}

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Mean baseline of the spans
    pub y: f32,
    /// Spans, left to right
    pub spans: Vec<TextSpan>,
}

/// Stream detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Fewest rows, header included, that make a table
    pub min_rows: usize,
    /// Fewest columns that make a table
    pub min_columns: usize,
    /// More columns than this usually means words were split apart
    pub max_columns: usize,
    /// Baseline tolerance for one row, as a fraction of the font size
    pub y_tolerance_factor: f32,
    /// Share of a row's spans that must sit on column edges
    pub min_alignment_ratio: f32,
    /// Edges closer than this (points) merge into one column
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Finds aligned text regions among the spans of one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with a custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Tables among `spans`, top to bottom.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < cfg.min_rows {
            return Vec::new();
        }

        let page_columns = self.detect_columns(&rows);
        log::debug!(
            "Stream: {} rows, page columns at {:?}",
            rows.len(),
            page_columns
        );
        if page_columns.len() < cfg.min_columns {
            return Vec::new();
        }

        self.aligned_runs(&rows, &page_columns)
            .into_iter()
            .filter_map(|run| self.accept(rows[run].to_vec()))
            .collect()
    }

    /// Build a table from a run of rows if it holds up on its own columns.
    fn accept(&self, rows: Vec<TableRowData>) -> Option<DetectedTable> {
        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            return None;
        }
        if columns.len() > self.config.max_columns {
            log::debug!("Stream: rejected region with {} columns", columns.len());
            return None;
        }
        if looks_like_list(&rows, &columns) {
            log::debug!("Stream: rejected region that reads as a list");
            return None;
        }

        let spans = rows.iter().flat_map(|row| row.spans.iter());
        let left_x = spans.clone().map(|s| s.x).fold(f32::INFINITY, f32::min);
        let right_x = spans.map(TextSpan::right).fold(f32::NEG_INFINITY, f32::max);

        Some(DetectedTable {
            top_y: rows[0].y,
            bottom_y: rows[rows.len() - 1].y,
            left_x,
            right_x,
            columns,
            rows,
        })
    }

    /// Rows keyed by the header row's cell texts.
    ///
    /// `None` when the table has no row under its header.
    pub fn to_rows(&self, table: &DetectedTable) -> Option<Vec<TableRow>> {
        let (header, body) = table.rows.split_first()?;
        if body.is_empty() {
            return None;
        }

        let names = header_names(&self.row_cells(header, table));
        let rows: Vec<TableRow> = body
            .iter()
            .map(|row| {
                names
                    .iter()
                    .cloned()
                    .zip(self.row_cells(row, table).into_iter().map(Some))
                    .collect()
            })
            .collect();
        Some(rows)
    }

    /// One string per column; a column with no span is `""`.
    fn row_cells(&self, row: &TableRowData, table: &DetectedTable) -> Vec<String> {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); table.columns.len()];
        for span in &row.spans {
            let col = column_of(span.x, &table.columns, table.right_x);
            if let Some(cell) = cells.get_mut(col) {
                cell.push(span.text.trim());
            }
        }
        cells.into_iter().map(|parts| parts.join(" ")).collect()
    }

    /// Rows top to bottom; spans within a row left to right.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| cmp_f32(b.y, a.y).then(cmp_f32(a.x, b.x)));

        let mut rows: Vec<Vec<TextSpan>> = Vec::new();
        let mut row_y = f32::NAN;
        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match rows.last_mut() {
                Some(row) if (span.y - row_y).abs() <= tolerance => row.push(span),
                _ => {
                    row_y = span.y;
                    rows.push(vec![span]);
                }
            }
        }

        rows.into_iter().map(finish_row).collect()
    }

    /// Left edges that recur across rows, merged when closer than the
    /// column gap.
    ///
    /// Rows holding several spans are the evidence when there are enough of
    /// them; otherwise every row counts.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi: Vec<&TableRowData> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let evidence: Vec<&TableRowData> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };
        if evidence.is_empty() {
            return Vec::new();
        }

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for row in &evidence {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|span| (span.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *counts.entry(bucket).or_default() += 1;
            }
        }

        let needed = ((evidence.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);
        let mut edges: Vec<f32> = counts
            .into_iter()
            .filter(|&(_, count)| count >= needed)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| cmp_f32(*a, *b));

        let mut columns: Vec<f32> = Vec::with_capacity(edges.len());
        for edge in edges {
            if columns
                .last()
                .map_or(true, |&last| edge - last >= self.config.min_column_gap)
            {
                columns.push(edge);
            }
        }
        columns
    }

    /// Index ranges of consecutive rows aligned with `columns`.
    fn aligned_runs(
        &self,
        rows: &[TableRowData],
        columns: &[f32],
    ) -> Vec<std::ops::RangeInclusive<usize>> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = alignment(row, columns) >= self.config.min_alignment_ratio;
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        runs.push(s..=i - 1);
                    }
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                runs.push(s..=rows.len() - 1);
            }
        }

        runs
    }
}

fn cmp_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn finish_row(mut spans: Vec<TextSpan>) -> TableRowData {
    spans.sort_by(|a, b| cmp_f32(a.x, b.x));
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    TableRowData { y, spans }
}

/// Share of the row's spans whose left edge sits on a column edge.
fn alignment(row: &TableRowData, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let on_edge = row
        .spans
        .iter()
        .filter(|span| columns.iter().any(|c| (span.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    on_edge as f32 / row.spans.len() as f32
}

/// Column holding a span that starts at `x`; nearest edge as a fallback.
fn column_of(x: f32, columns: &[f32], right_x: f32) -> usize {
    let ends = columns
        .iter()
        .skip(1)
        .copied()
        .chain(std::iter::once(right_x + 100.0));
    if let Some(col) = columns
        .iter()
        .zip(ends)
        .position(|(&start, end)| x >= start - COLUMN_LEAD && x < end - COLUMN_LEAD)
    {
        return col;
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| cmp_f32((x - **a).abs(), (x - **b).abs()))
        .map_or(0, |(i, _)| i)
}

/// Whether the leftmost spans are mostly list markers.
///
/// Bullets disqualify any layout. Numbers only disqualify two columns,
/// since a numbered first column is common in real tables.
fn looks_like_list(rows: &[TableRowData], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let leaders = rows.iter().filter_map(|row| row.spans.first());
    let (mut bullets, mut numbers) = (0usize, 0usize);
    for span in leaders {
        if is_bullet_marker(&span.text) {
            bullets += 1;
        } else if is_number_marker(&span.text) {
            numbers += 1;
        }
    }

    let total = rows.len() as f32;
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

/// Column names from header cells: blanks become `column_N`, repeats get `.N`.
fn header_names(cells: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = match cell.trim() {
                "" => format!("column_{}", i + 1),
                name => name.to_string(),
            };
            let repeats = seen.entry(base.clone()).or_default();
            *repeats += 1;
            match *repeats {
                1 => base,
                n => format!("{}.{}", base, n - 1),
            }
        })
        .collect()
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□" | "◆" | "◇" | "▶" | "▷" | "➤"
    )
}

/// `3`, `12.`, `4)`, `a.` or `B)`, ignoring whitespace.
fn is_number_marker(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.chars().take_while(char::is_ascii_digit).count();
    let rest = &compact[digits..];

    if digits > 0 {
        return rest.is_empty() || rest == "." || rest == ")";
    }

    let mut chars = compact.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}

/// Stream-mode strategy: runs the detector on every page.
#[derive(Debug, Clone, Default)]
pub struct StreamStrategy {
    detector: TableDetector,
}

impl StreamStrategy {
    /// Create a strategy with a custom detector.
    pub fn with_detector(detector: TableDetector) -> Self {
        Self { detector }
    }
}

impl TableStrategy for StreamStrategy {
    fn method(&self) -> TableMethod {
        TableMethod::Stream
    }

    fn detect(&self, path: &Path) -> Result<Vec<TableRecord>> {
        let layouts = scan_document(path)?;
        let found = layouts.iter().flat_map(|layout| {
            self.detector
                .detect(&layout.spans)
                .into_iter()
                .filter_map(|table| self.detector.to_rows(&table))
                .map(move |rows| (layout.number, rows))
        });
        Ok(number_records(TableMethod::Stream, found))
    }
}
