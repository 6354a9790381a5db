//! Figure placement records.

use serde::{Deserialize, Serialize};

/// An image drawn on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRecord {
    /// Page number (1-indexed)
    pub page: u32,

    /// Bounding box `[x0, top, x1, bottom]` in points, with `top` and
    /// `bottom` measured downward from the top edge of the page
    pub bbox: [f32; 4],

    /// Rendered width in points
    pub width: f32,

    /// Rendered height in points
    pub height: f32,
}

impl FigureRecord {
    /// Build a record from a box in PDF user space (origin at bottom-left).
    pub fn from_user_space(page: u32, page_height: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (low, high) = (y0.min(y1), y0.max(y1));
        let top = page_height - high;
        let bottom = page_height - low;

        Self {
            page,
            bbox: [left, top, right, bottom],
            width: right - left,
            height: bottom - top,
        }
    }
}
