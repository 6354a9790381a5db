//! Extraction options and configuration.

use std::path::{Path, PathBuf};

/// Options controlling a document extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// OCR fallback settings
    pub ocr: OcrOptions,

    /// Grid used by the layout-aware text strategy
    pub layout: LayoutOptions,

    /// Whether to run the table extractor after text extraction succeeds
    pub extract_tables: bool,

    /// Whether to record image placements
    pub extract_figures: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the OCR candidate entirely.
    pub fn without_ocr(mut self) -> Self {
        self.ocr.enabled = false;
        self
    }

    /// Set the tesseract executable.
    pub fn with_ocr_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.ocr.executable = Some(path.into());
        self
    }

    /// Set the page rasterizer executable.
    pub fn with_rasterizer(mut self, path: impl Into<PathBuf>) -> Self {
        self.ocr.rasterizer = Some(path.into());
        self
    }

    /// Set the rasterization resolution.
    pub fn with_ocr_dpi(mut self, dpi: u32) -> Self {
        self.ocr.dpi = dpi;
        self
    }

    /// Set the tesseract language code (e.g., "eng", "deu+eng").
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr.language = Some(language.into());
        self
    }

    /// Set the layout grid densities in points per character cell.
    pub fn with_layout_density(mut self, x_density: f32, y_density: f32) -> Self {
        self.layout.x_density = x_density;
        self.layout.y_density = y_density;
        self
    }

    /// Skip table extraction.
    pub fn without_tables(mut self) -> Self {
        self.extract_tables = false;
        self
    }

    /// Skip figure location.
    pub fn without_figures(mut self) -> Self {
        self.extract_figures = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ocr: OcrOptions::default(),
            layout: LayoutOptions::default(),
            extract_tables: true,
            extract_figures: true,
        }
    }
}

/// OCR fallback settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOptions {
    /// Whether the OCR candidate runs at all
    pub enabled: bool,

    /// tesseract executable; platform default when `None`
    pub executable: Option<PathBuf>,

    /// pdftoppm executable; `pdftoppm` on `PATH` when `None`
    pub rasterizer: Option<PathBuf>,

    /// Rasterization resolution
    pub dpi: u32,

    /// tesseract `--psm` value
    pub page_segmentation_mode: u8,

    /// tesseract `-l` value; tesseract's own default when `None`
    pub language: Option<String>,
}

impl OcrOptions {
    /// The tesseract executable to run.
    pub fn executable(&self) -> &Path {
        self.executable
            .as_deref()
            .unwrap_or_else(|| Path::new(default_tesseract()))
    }

    /// The rasterizer executable to run.
    pub fn rasterizer(&self) -> &Path {
        self.rasterizer
            .as_deref()
            .unwrap_or_else(|| Path::new("pdftoppm"))
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            executable: None,
            rasterizer: None,
            dpi: 300,
            page_segmentation_mode: 6,
            language: None,
        }
    }
}

fn default_tesseract() -> &'static str {
    if cfg!(windows) {
        r"C:\Program Files\Tesseract-OCR\tesseract.exe"
    } else {
        "tesseract"
    }
}

/// Character grid for layout-aware reflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Horizontal points per character cell
    pub x_density: f32,

    /// Vertical points per blank line
    pub y_density: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            x_density: 3.0,
            y_density: 3.0,
        }
    }
}
