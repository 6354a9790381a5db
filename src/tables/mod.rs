//! Table extraction.
//!
//! Two independent detectors look at the same pages: [`LatticeStrategy`]
//! follows visible ruling lines, [`StreamStrategy`] infers columns from text
//! alignment. Both always run and their results are concatenated, lattice
//! first.

mod lattice;
mod stream;

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

pub use lattice::{LatticeConfig, LatticeStrategy};
pub use stream::{DetectedTable, StreamStrategy, TableDetector, TableDetectorConfig, TableRowData};

use crate::error::Result;
use crate::extract::panic_message;
use crate::model::{TableMethod, TableRecord};
use crate::parser::{LopdfBackend, PageLayout, PageScanner};

/// One way of finding tables in a document.
pub trait TableStrategy {
    /// Method tag carried by every record.
    fn method(&self) -> TableMethod;

    /// Detect tables on every page of the document at `path`.
    fn detect(&self, path: &Path) -> Result<Vec<TableRecord>>;
}

/// Runs every table strategy and accumulates their records.
pub struct TableExtractor {
    strategies: Vec<Box<dyn TableStrategy>>,
}

impl TableExtractor {
    /// Lattice then stream.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(LatticeStrategy::default()),
                Box::new(StreamStrategy::default()),
            ],
        }
    }

    /// Use an explicit strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn TableStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run all strategies. A failing strategy contributes nothing.
    pub fn extract(&self, path: &Path) -> Vec<TableRecord> {
        let mut tables = Vec::new();

        for strategy in &self.strategies {
            let method = strategy.method();
            match panic::catch_unwind(AssertUnwindSafe(|| strategy.detect(path))) {
                Ok(Ok(found)) => {
                    log::debug!("{} tables: {}", method, found.len());
                    tables.extend(found);
                }
                Ok(Err(e)) => log::warn!("{} table extraction failed: {}", method, e),
                Err(payload) => log::warn!(
                    "{} table extraction panicked: {}",
                    method,
                    panic_message(payload.as_ref())
                ),
            }
        }

        tables
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan every page of the document at `path`.
pub(crate) fn scan_document(path: &Path) -> Result<Vec<PageLayout>> {
    let backend = LopdfBackend::load_file(path)?;
    PageScanner::new(&backend).scan_all()
}

/// Number records 1.. in the order they were found.
pub(crate) fn number_records(
    method: TableMethod,
    found: impl IntoIterator<Item = (u32, Vec<crate::model::TableRow>)>,
) -> Vec<TableRecord> {
    found
        .into_iter()
        .enumerate()
        .map(|(i, (page, data))| TableRecord::new(method, page, i as u32 + 1, data))
        .collect()
}
