//! Terminal operations that fold a collection into a single answer.

use crate::collection::Collection;
use crate::path::{Extractor, Matcher};
use crate::types::{to_number, Key, Number, SortDirection, SortType, Value};

impl Collection {
    /// Whether `predicate` holds for every element. Stops at the first failure.
    pub fn every<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.iter().all(|(key, value)| predicate(&value, &key))
    }

    /// Whether `predicate` holds for any element. Stops at the first success.
    pub fn some<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.iter().any(|(key, value)| predicate(&value, &key))
    }

    /// Whether an element is strictly equal (type and value) to `needle`.
    pub fn contains(&self, needle: &Value) -> bool {
        self.iter().any(|(_, value)| value == *needle)
    }

    /// Left fold.
    ///
    /// Without a seed the first element is the initial accumulator; an empty collection then
    /// yields `None`. With a seed, an empty collection yields the seed.
    pub fn reduce<F>(&self, mut f: F, seed: Option<Value>) -> Option<Value>
    where
        F: FnMut(Value, &Value, &Key) -> Value,
    {
        let mut entries = self.iter();
        let mut acc = match seed {
            Some(seed) => seed,
            None => entries.next()?.1,
        };
        for (key, value) in entries {
            acc = f(acc, &value, &key);
        }
        Some(acc)
    }

    /// Element with the largest extracted value (first one on ties).
    pub fn max(&self, extractor: impl Into<Extractor>, sort_type: SortType) -> Option<Value> {
        self.sort_by(extractor, SortDirection::Descending, sort_type)
            .first()
    }

    /// Element with the smallest extracted value (first one on ties).
    pub fn min(&self, extractor: impl Into<Extractor>, sort_type: SortType) -> Option<Value> {
        self.sort_by(extractor, SortDirection::Ascending, sort_type)
            .first()
    }

    /// Numeric sum of every value.
    pub fn sum(&self) -> Value {
        self.iter()
            .fold(Number::default(), |acc, (_, value)| acc + to_number(&value))
            .to_value()
    }

    /// Numeric sum of the extracted values.
    pub fn sum_of(&self, extractor: impl Into<Extractor>) -> Value {
        let extractor = extractor.into();
        self.iter()
            .fold(Number::default(), |acc, (key, value)| {
                acc + to_number(&extractor.extract(&value, &key))
            })
            .to_value()
    }

    /// First element matching `matcher`, if any.
    pub fn first_match(&self, matcher: &Matcher) -> Option<Value> {
        self.iter()
            .map(|(_, value)| value)
            .find(|value| matcher.matches(value))
    }
}
