//! JSON ingestion.
//!
//! Supported inputs:
//! - A JSON array: `[{"a":1}, {"a":2}]` becomes a positional collection
//! - A JSON object: `{"x": 1, "y": 2}` becomes a keyed collection
//! - Newline-delimited JSON (NDJSON): one element per non-empty line

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::collection::Collection;
use crate::error::{CollectionError, CollectionResult};
use crate::types::Value;

/// Read a JSON or NDJSON file into a [`Collection`].
pub fn from_json_path(path: impl AsRef<Path>) -> CollectionResult<Collection> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "ingesting json");
    from_json_str(&text)
}

/// Parse JSON or NDJSON text into a [`Collection`].
pub fn from_json_str(input: &str) -> CollectionResult<Collection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CollectionError::invalid_input("json input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Array(_) | Value::Object(_) => Collection::from_value(value),
            _ => Err(CollectionError::invalid_input(
                "json must be an array, an object, or NDJSON",
            )),
        };
    }

    // Fall back to NDJSON.
    let mut values = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(line).map_err(|e| {
            CollectionError::invalid_input(format!("invalid ndjson at line {}: {e}", i + 1))
        })?;
        values.push(value);
    }
    debug!(rows = values.len(), "parsed ndjson");
    Ok(Collection::from_values(values))
}
