use std::fmt;
use std::rc::Rc;

use crate::collection::Collection;
use crate::error::{CollectionError, CollectionResult};
use crate::types::{is_composite, Value};

/// Decides whether a raw combination is kept.
pub type CombinationFilter = dyn Fn(&[Value]) -> bool;

/// Replaces a kept combination in the output.
pub type CombinationTransform = dyn Fn(Vec<Value>) -> Value;

/// Options for [`Collection::cartesian_product_with`].
#[derive(Clone, Default)]
pub struct CartesianOptions {
    filter: Option<Rc<CombinationFilter>>,
    transform: Option<Rc<CombinationTransform>>,
}

impl CartesianOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only combinations for which `filter` returns `true`.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&[Value]) -> bool + 'static,
    {
        self.filter = Some(Rc::new(filter));
        self
    }

    /// Emit `transform(combination)` instead of the combination itself.
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<Value>) -> Value + 'static,
    {
        self.transform = Some(Rc::new(transform));
        self
    }
}

impl fmt::Debug for CartesianOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartesianOptions")
            .field("filter", &self.filter.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

// Values of a one-level array or object, in order.
fn term_values(value: Value, position: usize) -> CollectionResult<Vec<Value>> {
    let values: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        scalar => {
            return Err(CollectionError::structural(format!(
                "cartesian product term {position} is not a collection: {scalar}"
            )));
        }
    };
    if values.iter().any(is_composite) {
        return Err(CollectionError::structural(format!(
            "cannot find the cartesian product of a multidimensional term (term {position})"
        )));
    }
    Ok(values)
}

impl Collection {
    /// Every combination picking one value from each element, in odometer order.
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    /// use serde_json::json;
    ///
    /// let terms = Collection::from_values(vec![json!(["A", "B"]), json!([1, 2])]);
    /// assert_eq!(
    ///     terms.cartesian_product().unwrap().to_list(),
    ///     vec![json!(["A", 1]), json!(["A", 2]), json!(["B", 1]), json!(["B", 2])]
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Structural`] when an element is a scalar or holds nested
    /// composites.
    pub fn cartesian_product(&self) -> CollectionResult<Collection> {
        self.cartesian_product_with(CartesianOptions::default())
    }

    /// [`Collection::cartesian_product`] with a filter and/or transform.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::cartesian_product`].
    pub fn cartesian_product_with(
        &self,
        options: CartesianOptions,
    ) -> CollectionResult<Collection> {
        let terms = self
            .to_list()
            .into_iter()
            .enumerate()
            .map(|(position, value)| term_values(value, position))
            .collect::<CollectionResult<Vec<_>>>()?;

        if terms.is_empty() || terms.iter().any(Vec::is_empty) {
            return Ok(Collection::empty());
        }

        let last = terms.len() - 1;
        let mut indexes = vec![0usize; terms.len()];
        let mut results = Vec::new();

        loop {
            let combination: Vec<Value> = terms
                .iter()
                .zip(&indexes)
                .map(|(term, &i)| term[i].clone())
                .collect();

            let keep = options
                .filter
                .as_ref()
                .is_none_or(|filter| filter(&combination));
            if keep {
                results.push(match &options.transform {
                    Some(transform) => transform(combination),
                    None => Value::Array(combination),
                });
            }

            // Advance the rightmost index, carrying into the left neighbours.
            let mut position = last;
            indexes[position] += 1;
            while indexes[position] == terms[position].len() {
                if position == 0 {
                    return Ok(Collection::from_values(results));
                }
                indexes[position] = 0;
                position -= 1;
                indexes[position] += 1;
            }
        }
    }
}
