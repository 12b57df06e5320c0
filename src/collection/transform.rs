//! Lazy, element-wise operations and the few eager reorderings.

use std::rc::Rc;

use rand::seq::SliceRandom;

use crate::adapters::{
    Append, Chunk, ChunkKeys, Filter, Insert, Limit, Replace, Sort, StopWhen, Unfold, Zip,
};
use crate::collection::Collection;
use crate::path::{Extractor, Matcher};
use crate::types::{is_composite, is_truthy, Key, SortDirection, SortType, Value};

impl Collection {
    /// Keep the elements for which `predicate(value, key)` holds.
    pub fn filter<F>(&self, predicate: F) -> Collection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        self.chain(|upstream| Filter::new(upstream, Rc::new(predicate)))
    }

    /// Keep truthy elements.
    pub fn filter_truthy(&self) -> Collection {
        self.filter(|value, _| is_truthy(value))
    }

    /// Drop the elements for which `predicate(value, key)` holds.
    pub fn reject<F>(&self, predicate: F) -> Collection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        self.filter(move |value, key| !predicate(value, key))
    }

    /// Replace every value with `f(value, key)`, keeping keys.
    pub fn map<F>(&self, f: F) -> Collection
    where
        F: Fn(&Value, &Key) -> Value + 'static,
    {
        self.chain(|upstream| Replace::new(upstream, Rc::new(f)))
    }

    /// Pull one value out of every element.
    ///
    /// A wildcard path (`comments.{*}.id`) drops elements where the fan-out finds nothing
    /// traversable and flattens the rest one level, so the result is a flat list of leaves.
    pub fn extract(&self, extractor: impl Into<Extractor>) -> Collection {
        let extractor = extractor.into();
        let flattens = extractor.flattens();
        let extracted = self.map(move |value, key| extractor.extract(value, key));
        if flattens {
            extracted.filter(|value, _| is_composite(value)).unfold()
        } else {
            extracted
        }
    }

    /// Keep elements matching every condition of `matcher`.
    pub fn matching(&self, matcher: Matcher) -> Collection {
        self.filter(move |value, _| matcher.matches(value))
    }

    /// At most `size` elements starting at position `from`. Keys are preserved.
    pub fn take(&self, size: usize, from: usize) -> Collection {
        self.chain(|upstream| Limit::new(upstream, from, Some(size)))
    }

    /// Everything after the first `n` elements.
    pub fn skip(&self, n: usize) -> Collection {
        self.chain(|upstream| Limit::new(upstream, n, None))
    }

    /// Stop at the first element for which `condition` holds (that element is excluded).
    pub fn stop_when<F>(&self, condition: F) -> Collection
    where
        F: Fn(&Value, &Key) -> bool + 'static,
    {
        self.chain(|upstream| StopWhen::new(upstream, Rc::new(condition)))
    }

    /// Stop at the first element matching `matcher`.
    pub fn stop_when_matches(&self, matcher: Matcher) -> Collection {
        self.stop_when(move |value, _| matcher.matches(value))
    }

    /// Inline the children of composite elements one level deep.
    pub fn unfold(&self) -> Collection {
        self.chain(|upstream| Unfold::new(upstream, None))
    }

    /// Inline the children of `f(value, key)` one level deep.
    pub fn unfold_with<F>(&self, f: F) -> Collection
    where
        F: Fn(&Value, &Key) -> Value + 'static,
    {
        self.chain(|upstream| Unfold::new(upstream, Some(Rc::new(f))))
    }

    /// Batches of `size` values.
    pub fn chunk(&self, size: usize) -> Collection {
        self.chain(|upstream| Chunk::new(upstream, size, ChunkKeys::Renumber))
    }

    /// Batches of `size` entries, optionally keeping each entry's key inside its batch.
    pub fn chunk_with_keys(&self, size: usize, preserve_keys: bool) -> Collection {
        let keys = if preserve_keys {
            ChunkKeys::Preserve
        } else {
            ChunkKeys::Renumber
        };
        self.chain(|upstream| Chunk::new(upstream, size, keys))
    }

    /// This collection's elements followed by `other`'s. Keys are not deduplicated.
    pub fn append(&self, other: impl Into<Collection>) -> Collection {
        let other: Collection = other.into();
        let tail = other.unwrap();
        self.chain(|head| Append::new(head, tail))
    }

    /// Tuples of one element from this collection and one from each of `others`.
    pub fn zip<I>(&self, others: I) -> Collection
    where
        I: IntoIterator<Item = Collection>,
    {
        let others: Vec<_> = others.into_iter().map(|c| c.unwrap()).collect();
        self.chain(|head| Zip::new(std::iter::once(head).chain(others).collect(), None))
    }

    /// Like [`Collection::zip`] but each tuple is passed through `f`.
    pub fn zip_with<I, F>(&self, others: I, f: F) -> Collection
    where
        I: IntoIterator<Item = Collection>,
        F: Fn(&[Value]) -> Value + 'static,
    {
        let others: Vec<_> = others.into_iter().map(|c| c.unwrap()).collect();
        self.chain(|head| {
            Zip::new(
                std::iter::once(head).chain(others).collect(),
                Some(Rc::new(f)),
            )
        })
    }

    /// Write the values of `values`, one per element, at `path` in each element.
    pub fn insert(&self, path: &str, values: impl Into<Collection>) -> Collection {
        let values: Collection = values.into();
        let values = values.unwrap();
        self.chain(|upstream| Insert::new(upstream, path, values))
    }

    /// Order by an extracted sort key. Stable; keys are preserved.
    pub fn sort_by(
        &self,
        extractor: impl Into<Extractor>,
        direction: SortDirection,
        sort_type: SortType,
    ) -> Collection {
        let extractor = extractor.into();
        self.chain(|upstream| Sort::new(upstream, extractor, direction, sort_type))
    }

    /// Values in random order, renumbered.
    pub fn shuffle(&self) -> Collection {
        let mut values = self.to_list();
        values.shuffle(&mut rand::rng());
        Collection::from_values(values)
    }

    /// `n` randomly chosen values.
    pub fn sample(&self, n: usize) -> Collection {
        self.shuffle().take(n, 0)
    }
}
