//! CSV ingestion.

use std::path::Path;

use tracing::debug;

use crate::collection::Collection;
use crate::error::CollectionResult;
use crate::types::{Map, Value};

/// Read a CSV file into a [`Collection`] of row objects.
///
/// Rules:
///
/// - CSV must have headers; each record becomes an object keyed by header.
/// - Empty cells are `null`.
/// - Cells that parse as integers or floats become numbers; everything else stays a string.
pub fn from_csv_path(path: impl AsRef<Path>) -> CollectionResult<Collection> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    from_csv_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn from_csv_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> CollectionResult<Collection> {
    let headers = rdr.headers()?.clone();

    let mut rows: Vec<Value> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Map<String, Value> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_owned(), parse_cell(record.get(i).unwrap_or(""))))
            .collect();
        rows.push(Value::Object(row));
    }

    debug!(rows = rows.len(), columns = headers.len(), "ingested csv");
    Ok(Collection::from_values(rows))
}

fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(trimmed.to_owned()),
    }
}
