//! Figure placement.

use std::path::Path;

use crate::error::Result;
use crate::model::FigureRecord;
use crate::parser::{LopdfBackend, PageLayout, PageScanner};

/// Records where each image XObject is drawn.
///
/// Only the position is captured; image data is never decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FigureLocator;

impl FigureLocator {
    /// Create a locator.
    pub fn new() -> Self {
        Self
    }

    /// Locate figures on every page of the document at `path`.
    pub fn locate(&self, path: &Path) -> Result<Vec<FigureRecord>> {
        let backend = LopdfBackend::load_file(path)?;
        let layouts = PageScanner::new(&backend).scan_all()?;
        Ok(layouts.iter().flat_map(|layout| self.on_page(layout)).collect())
    }

    /// Figures drawn on one page, in drawing order.
    pub fn on_page(&self, layout: &PageLayout) -> Vec<FigureRecord> {
        layout
            .images
            .iter()
            .map(|image| {
                FigureRecord::from_user_space(
                    layout.number,
                    layout.height,
                    image.x0,
                    image.y0,
                    image.x1,
                    image.y1,
                )
            })
            .collect()
    }
}
