//! JSON rendering for extraction results.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::ExtractionResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an extraction result to JSON.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render `result` and write it to `path` as UTF-8.
pub fn write_json<P: AsRef<Path>>(result: &ExtractionResult, path: P, format: JsonFormat) -> Result<()> {
    let json = to_json(result, format)?;
    fs::write(path, json)?;
    Ok(())
}
