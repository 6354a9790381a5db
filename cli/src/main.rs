//! pdfsift CLI - PDF text, table, and figure extraction to JSON

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::{ExtractOptions, Extractor, JsonFormat};

#[derive(Parser, Debug)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(about = "Extract text, tables, headings, and figures from a PDF as JSON", long_about = None)]
struct Cli {
    /// Path to input PDF file
    #[arg(value_name = "PDF")]
    pdf_path: PathBuf,

    /// Output JSON file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Never fall back to OCR
    #[arg(long)]
    no_ocr: bool,

    /// tesseract executable
    #[arg(long, value_name = "PATH")]
    tesseract: Option<PathBuf>,

    /// pdftoppm executable
    #[arg(long, value_name = "PATH")]
    pdftoppm: Option<PathBuf>,

    /// tesseract language code (e.g., "eng", "deu+eng")
    #[arg(long, value_name = "LANG")]
    ocr_lang: Option<String>,

    /// Skip heading detection
    #[arg(long)]
    no_structure: bool,
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new();
        if self.no_ocr {
            options = options.without_ocr();
        }
        if let Some(path) = &self.tesseract {
            options = options.with_ocr_executable(path);
        }
        if let Some(path) = &self.pdftoppm {
            options = options.with_rasterizer(path);
        }
        if let Some(lang) = &self.ocr_lang {
            options = options.with_ocr_language(lang);
        }
        options
    }

    fn json_format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}", format!("Error processing PDF: {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let spinner = cli.output.as_ref().map(|_| start_spinner(&cli.pdf_path));

    let extractor = Extractor::new(cli.extract_options());
    let result = extractor.extract(&cli.pdf_path);
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let mut result = result?;
    log::debug!(
        "{} page(s) via {:?}, {} table(s), {} figure(s)",
        result.content.len(),
        result.extraction_methods,
        result.tables.len(),
        result.figures.len()
    );
    if !cli.no_structure {
        result = result.structured();
    }

    match &cli.output {
        Some(path) => {
            pdfsift::write_json(&result, path, cli.json_format())?;
            println!("{} {}", "Results saved to".green(), path.display());
        }
        None => println!("{}", pdfsift::to_json(&result, cli.json_format())?),
    }

    Ok(())
}

fn start_spinner(input: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Extracting {}...", input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
