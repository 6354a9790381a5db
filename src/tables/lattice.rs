//! Lattice table detection from ruling lines.
//!
//! Horizontal and vertical rulings that touch each other are grouped into
//! grids. The distinct x positions of a grid's verticals and the distinct y
//! positions of its horizontals define the cell boundaries; each text span
//! is dropped into the cell that contains its anchor point.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::Result;
use crate::model::{TableMethod, TableRecord, TableRow};
use crate::parser::{PageLayout, Ruling, TextSpan};

use super::{number_records, scan_document, TableStrategy};

/// Lattice detector configuration.
#[derive(Debug, Clone)]
pub struct LatticeConfig {
    /// Maximum deviation from the axis for a ruling to count as straight
    pub axis_tolerance: f32,
    /// Rulings shorter than this are ignored
    pub min_length: f32,
    /// Gap allowed between rulings that should be considered touching
    pub join_tolerance: f32,
    /// Positions closer than this collapse into one grid line
    pub cluster_tolerance: f32,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: 1.0,
            min_length: 5.0,
            join_tolerance: 2.0,
            cluster_tolerance: 2.0,
        }
    }
}

/// Grid-line table detector.
#[derive(Debug, Clone, Default)]
pub struct LatticeStrategy {
    config: LatticeConfig,
}

impl LatticeStrategy {
    /// Create a detector with custom configuration.
    pub fn with_config(config: LatticeConfig) -> Self {
        Self { config }
    }

    /// Tables on one page, top to bottom.
    pub fn tables_on_page(&self, layout: &PageLayout) -> Vec<Vec<TableRow>> {
        let (horizontals, verticals) = self.classify(&layout.rulings);
        if horizontals.len() < 2 || verticals.len() < 2 {
            return Vec::new();
        }

        let mut grids: Vec<Grid> = self
            .components(&horizontals, &verticals)
            .into_iter()
            .filter_map(|(h, v)| self.grid(&h, &v))
            .collect();
        grids.sort_by(|a, b| b.ys[0].partial_cmp(&a.ys[0]).unwrap_or(Ordering::Equal));

        log::debug!("Page {}: {} ruled grid(s)", layout.number, grids.len());

        grids
            .iter()
            .map(|grid| grid.fill(&layout.spans))
            .filter(|rows| !rows.is_empty())
            .collect()
    }

    fn classify(&self, rulings: &[Ruling]) -> (Vec<HLine>, Vec<VLine>) {
        let tol = self.config.axis_tolerance;
        let mut horizontals = Vec::new();
        let mut verticals = Vec::new();

        for r in rulings {
            if r.length() < self.config.min_length {
                continue;
            }
            if r.is_horizontal(tol) {
                horizontals.push(HLine {
                    y: (r.y0 + r.y1) / 2.0,
                    x0: r.x0.min(r.x1),
                    x1: r.x0.max(r.x1),
                });
            } else if r.is_vertical(tol) {
                verticals.push(VLine {
                    x: (r.x0 + r.x1) / 2.0,
                    y0: r.y0.min(r.y1),
                    y1: r.y0.max(r.y1),
                });
            }
        }

        (horizontals, verticals)
    }

    /// Connected sets of intersecting rulings.
    fn components(&self, h: &[HLine], v: &[VLine]) -> Vec<(Vec<HLine>, Vec<VLine>)> {
        let tol = self.config.join_tolerance;
        let mut sets = DisjointSet::new(h.len() + v.len());

        for (i, hl) in h.iter().enumerate() {
            for (j, vl) in v.iter().enumerate() {
                let crosses_x = vl.x >= hl.x0 - tol && vl.x <= hl.x1 + tol;
                let crosses_y = hl.y >= vl.y0 - tol && hl.y <= vl.y1 + tol;
                if crosses_x && crosses_y {
                    sets.union(i, h.len() + j);
                }
            }
        }

        let mut groups: Vec<(usize, Vec<HLine>, Vec<VLine>)> = Vec::new();
        for idx in 0..h.len() + v.len() {
            let root = sets.find(idx);
            let pos = match groups.iter().position(|g| g.0 == root) {
                Some(pos) => pos,
                None => {
                    groups.push((root, Vec::new(), Vec::new()));
                    groups.len() - 1
                }
            };
            if idx < h.len() {
                groups[pos].1.push(h[idx]);
            } else {
                groups[pos].2.push(v[idx - h.len()]);
            }
        }

        groups.into_iter().map(|(_, h, v)| (h, v)).collect()
    }

    fn grid(&self, h: &[HLine], v: &[VLine]) -> Option<Grid> {
        let tol = self.config.cluster_tolerance;
        let xs = cluster(v.iter().map(|l| l.x).collect(), tol);
        let mut ys = cluster(h.iter().map(|l| l.y).collect(), tol);
        ys.reverse();

        if xs.len() < 2 || ys.len() < 2 {
            return None;
        }
        Some(Grid { xs, ys })
    }
}

impl TableStrategy for LatticeStrategy {
    fn method(&self) -> TableMethod {
        TableMethod::Lattice
    }

    fn detect(&self, path: &Path) -> Result<Vec<TableRecord>> {
        let layouts = scan_document(path)?;
        let found = layouts.iter().flat_map(|layout| {
            self.tables_on_page(layout)
                .into_iter()
                .map(move |rows| (layout.number, rows))
        });
        Ok(number_records(TableMethod::Lattice, found))
    }
}

#[derive(Debug, Clone, Copy)]
struct HLine {
    y: f32,
    x0: f32,
    x1: f32,
}

#[derive(Debug, Clone, Copy)]
struct VLine {
    x: f32,
    y0: f32,
    y1: f32,
}

/// Cell boundaries: `xs` left to right, `ys` top to bottom.
struct Grid {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl Grid {
    fn locate(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let col = self.xs.windows(2).position(|w| x >= w[0] && x < w[1])?;
        let row = self.ys.windows(2).position(|w| y <= w[0] && y > w[1])?;
        Some((row, col))
    }

    fn fill(&self, spans: &[TextSpan]) -> Vec<TableRow> {
        let (rows, cols) = (self.ys.len() - 1, self.xs.len() - 1);
        let mut cells: Vec<Vec<Vec<&TextSpan>>> = vec![vec![Vec::new(); cols]; rows];

        for span in spans {
            let (ax, ay) = span.anchor();
            if let Some((row, col)) = self.locate(ax, ay) {
                cells[row][col].push(span);
            }
        }

        cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(col, spans)| (col.to_string(), cell_text(spans)))
                    .collect()
            })
            .collect()
    }
}

/// Text of one cell: spans on a line joined by spaces, lines by newlines.
fn cell_text(mut spans: Vec<&TextSpan>) -> Option<String> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut text = String::new();
    let mut line_y: Option<f32> = None;
    for span in spans {
        let piece = span.text.trim();
        if piece.is_empty() {
            continue;
        }
        match line_y {
            Some(y) if (y - span.y).abs() <= span.font_size * 0.5 => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        line_y = Some(span.y);
        text.push_str(piece);
    }

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Collapse nearby values into their mean, ascending.
fn cluster(mut values: Vec<f32>, tolerance: f32) -> Vec<f32> {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut clusters: Vec<Vec<f32>> = Vec::new();
    for value in values {
        match clusters.last_mut() {
            Some(group) if value - group[group.len() - 1] <= tolerance => group.push(value),
            _ => clusters.push(vec![value]),
        }
    }

    clusters
        .iter()
        .map(|group| group.iter().sum::<f32>() / group.len() as f32)
        .collect()
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}
