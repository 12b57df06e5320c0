use crate::collection::Collection;
use crate::error::{CollectionError, CollectionResult};
use crate::types::Value;

fn row_values(row: Value, position: usize) -> CollectionResult<Vec<Value>> {
    match row {
        Value::Array(items) => Ok(items),
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        scalar => Err(CollectionError::structural(format!(
            "row {position} is not a collection: {scalar}"
        ))),
    }
}

impl Collection {
    /// Swap rows and columns.
    ///
    /// Rows may be arrays or objects (values in insertion order). An empty collection
    /// transposes to an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Structural`] when a row is a scalar or its length differs
    /// from the first row's.
    pub fn transpose(&self) -> CollectionResult<Collection> {
        let rows = self
            .to_list()
            .into_iter()
            .enumerate()
            .map(|(position, row)| row_values(row, position))
            .collect::<CollectionResult<Vec<_>>>()?;

        let Some(width) = rows.first().map(Vec::len) else {
            return Ok(Collection::empty());
        };
        if let Some(position) = rows.iter().position(|row| row.len() != width) {
            return Err(CollectionError::structural(format!(
                "row {position} has {} columns, expected {width}",
                rows[position].len()
            )));
        }

        let columns = (0..width)
            .map(|column| Value::Array(rows.iter().map(|row| row[column].clone()).collect()))
            .collect();
        Ok(Collection::from_values(columns))
    }
}
