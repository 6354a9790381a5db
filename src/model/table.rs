//! Table records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One table row: column name to cell value, in column order.
///
/// `None` serializes as `null` and marks a blank lattice cell.
pub type TableRow = IndexMap<String, Option<String>>;

/// Table-detection strategy that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMethod {
    /// Tables delimited by visible ruling lines
    Lattice,
    /// Tables inferred from text alignment
    Stream,
}

impl TableMethod {
    /// Tag used in serialized output and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableMethod::Lattice => "lattice",
            TableMethod::Stream => "stream",
        }
    }
}

impl std::fmt::Display for TableMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Detection strategy
    pub method: TableMethod,

    /// Source page (1-indexed)
    pub page: u32,

    /// Position of this record among its method's results (1-indexed)
    pub index: u32,

    /// Table rows
    pub data: Vec<TableRow>,
}

impl TableRecord {
    /// Create a record.
    pub fn new(method: TableMethod, page: u32, index: u32, data: Vec<TableRow>) -> Self {
        Self {
            method,
            page,
            index,
            data,
        }
    }
}
