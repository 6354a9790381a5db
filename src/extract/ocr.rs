//! OCR fallback for documents without a usable text layer.
//!
//! Pages are rasterized with `pdftoppm` into a temporary directory, then
//! each image is passed through `tesseract`. Both run as child processes;
//! the directory and every image in it are removed when the strategy
//! returns.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};
use crate::model::{ContentKind, PageText};

use super::{OcrOptions, TextStrategy};

/// Rasterize-then-recognize strategy.
#[derive(Debug, Clone)]
pub struct OcrStrategy {
    options: OcrOptions,
}

impl OcrStrategy {
    /// Create the strategy.
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }

    /// Render every page to PNG under `dir`, returning images in page order.
    fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = dir.join("page");
        run_tool(self.options.rasterizer(), &self.rasterizer_args(pdf, &prefix))?;

        let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort_by_key(|path| page_number(path).unwrap_or(u32::MAX));

        log::debug!("Rasterized {} page(s) at {} DPI", images.len(), self.options.dpi);
        Ok(images)
    }

    fn rasterizer_args(&self, pdf: &Path, prefix: &Path) -> Vec<OsString> {
        vec![
            "-png".into(),
            "-r".into(),
            self.options.dpi.to_string().into(),
            pdf.into(),
            prefix.into(),
        ]
    }

    fn recognizer_args(&self, image: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            image.into(),
            "stdout".into(),
            "--psm".into(),
            self.options.page_segmentation_mode.to_string().into(),
        ];
        if let Some(language) = &self.options.language {
            args.push("-l".into());
            args.push(language.into());
        }
        args
    }
}

impl TextStrategy for OcrStrategy {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Ocr
    }

    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        let dir = tempfile::tempdir()?;
        let images = self.rasterize(path, dir.path())?;
        if images.is_empty() {
            return Err(Error::Ocr("rasterizer produced no images".to_string()));
        }

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let page_num = page_number(image).unwrap_or(i as u32 + 1);
            let output = run_tool(self.options.executable(), &self.recognizer_args(image))?;
            let text = String::from_utf8_lossy(&output.stdout).to_string();
            log::debug!("OCR page {}: {} chars", page_num, text.len());
            pages.push(PageText::ocr(page_num, text));
        }

        Ok(pages)
    }
}

/// Run an external tool, distinguishing "could not start" from "failed".
fn run_tool(program: &Path, args: &[OsString]) -> Result<Output> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::ToolUnavailable {
            tool: program.display().to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::Ocr(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output)
}

/// Page number from a pdftoppm file name such as `page-07.png`.
fn page_number(image: &Path) -> Option<u32> {
    let stem = image.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}
