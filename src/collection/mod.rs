//! The [`Collection`] pipeline facade.
//!
//! A collection is an immutable view over one [`Node`]. Lazy operations return a new
//! collection whose node wraps this one's innermost node; nothing is pulled from the source
//! until a terminal operation (`to_array`, `reduce`, `every`, iteration, ...) runs.
//!
//! ```rust
//! use lazy_collection::Collection;
//! use serde_json::json;
//!
//! let people = Collection::from_values(vec![
//!     json!({"name": "ann", "age": 31}),
//!     json!({"name": "bob", "age": 17}),
//!     json!({"name": "cy", "age": 45}),
//! ]);
//!
//! let adults = people
//!     .filter(|p, _| p["age"].as_i64().unwrap_or(0) >= 18)
//!     .extract("name")
//!     .to_list();
//! assert_eq!(adults, vec![json!("ann"), json!("cy")]);
//! ```

mod aggregate;
mod grouping;
mod snapshot;
mod transform;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::adapters::{Buffered, Cursor, Limit, Node, Sequence, Stream};
use crate::error::{CollectionError, CollectionResult};
use crate::types::{composite_entries, entries_to_value, Entry, Key, Map, Value};

/// A lazy, composable sequence of key/value entries.
pub struct Collection {
    node: RefCell<Node>,
}

impl Collection {
    /// Collection over realized entries.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self::from_node(Node::materialized(entries))
    }

    /// Positional collection (keys `0..n`).
    pub fn from_values(values: Vec<Value>) -> Self {
        Self::new(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::positional(i), v))
                .collect(),
        )
    }

    /// Collection over the children of an array or object.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidInput`] for scalars.
    pub fn from_value(value: Value) -> CollectionResult<Self> {
        match composite_entries(&value) {
            Some(entries) => Ok(Self::new(entries)),
            None => Err(CollectionError::invalid_input(format!(
                "expected an array or object, got {value}"
            ))),
        }
    }

    /// Collection over a single-pass iterator.
    ///
    /// The iterator is consumed lazily and only once; use [`Collection::buffered`] to replay.
    pub fn from_stream<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
        I::IntoIter: 'static,
    {
        Self::from_node(Node::adapter(Stream::new(entries)))
    }

    /// Collection over a custom [`Sequence`].
    pub fn from_sequence<S: Sequence + 'static>(sequence: S) -> Self {
        Self::from_node(Node::adapter(sequence))
    }

    pub fn from_node(node: Node) -> Self {
        Self {
            node: RefCell::new(node),
        }
    }

    /// Wrap another collection without changing it.
    pub fn wrap(inner: Collection) -> Self {
        Self::from_node(Node::Facade(Box::new(inner)))
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// This collection's own node.
    pub fn node(&self) -> Node {
        self.node.borrow().clone()
    }

    /// The innermost node, with every [`Node::Facade`] layer removed.
    pub fn unwrap(&self) -> Node {
        let mut node = self.node();
        while let Node::Facade(inner) = node {
            node = inner.node();
        }
        node
    }

    /// Start a new pass over the entries.
    pub fn iter(&self) -> Cursor {
        self.node.borrow().cursor()
    }

    /// Build a collection from an adapter over this one's innermost node.
    pub(crate) fn chain<S, F>(&self, build: F) -> Collection
    where
        S: Sequence + 'static,
        F: FnOnce(Node) -> S,
    {
        Collection::from_node(Node::adapter(build(self.unwrap())))
    }

    // Single-pass nodes are swapped for a buffer over themselves so a peek can be replayed.
    fn make_replayable(&self) {
        let mut node = self.node.borrow_mut();
        if !node.is_restartable() {
            let upstream = node.clone();
            *node = Node::replayable(Buffered::new(upstream));
        }
    }

    /// Call `f` on every element, in order, and return `self`.
    pub fn each<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&Value, &Key),
    {
        for (key, value) in self.iter() {
            f(&value, &key);
        }
        self
    }

    /// Whether there are no elements.
    ///
    /// Looks at one element at most. A single-pass collection is buffered first, so the
    /// element is still seen by later passes over this collection, and by clones or derived
    /// collections made after the peek. Clones and derived collections made *before* the peek
    /// still read the raw stream: they miss the peeked element and compete with this
    /// collection for the rest. Call [`Collection::buffered`] up front when several views
    /// share one stream.
    pub fn is_empty(&self) -> bool {
        self.make_replayable();
        self.iter().next().is_none()
    }

    /// Counting a live pipeline would consume it.
    ///
    /// # Errors
    ///
    /// Always returns [`CollectionError::Usage`]; materialize with [`Collection::to_array`] or
    /// [`Collection::compile`] and count that instead.
    pub fn count(&self) -> CollectionResult<usize> {
        Err(CollectionError::usage(
            "count() would consume the pipeline; materialize it first with to_array() or compile()",
        ))
    }

    /// First element, if any. Peeks like [`Collection::is_empty`].
    pub fn first(&self) -> Option<Value> {
        self.make_replayable();
        self.iter().next().map(|(_, v)| v)
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<Value> {
        let node = self.unwrap();
        match node.known_len() {
            Some(0) => None,
            Some(len) => Limit::new(node, len - 1, Some(1)).cursor().next().map(|(_, v)| v),
            None => node.cursor().last().map(|(_, v)| v),
        }
    }

    /// Materialize every entry.
    ///
    /// With `preserve_keys`, a later entry whose key was already seen replaces the earlier
    /// value in place. Keys are renumbered anyway when the pipeline can repeat keys for
    /// distinct elements (e.g. after [`Collection::unfold`]).
    pub fn to_array(&self, preserve_keys: bool) -> Vec<Entry> {
        let node = self.node();
        if !preserve_keys || node.repeats_keys() {
            return node
                .cursor()
                .enumerate()
                .map(|(i, (_, v))| (Key::positional(i), v))
                .collect();
        }

        let mut entries: Vec<Entry> = Vec::new();
        let mut index: HashMap<Key, usize> = HashMap::new();
        for (key, value) in node.cursor() {
            match index.get(&key) {
                Some(&i) => entries[i].1 = value,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }
        entries
    }

    /// Materialize the values in order, discarding keys.
    pub fn to_list(&self) -> Vec<Value> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// JSON view of `to_array(true)`: an array when the keys are `0..n`, an object otherwise.
    pub fn to_json_value(&self) -> Value {
        entries_to_value(self.to_array(true))
    }

    /// Run the pipeline once and keep the result.
    pub fn compile(&self, preserve_keys: bool) -> Collection {
        Collection::new(self.to_array(preserve_keys))
    }

    /// Cache entries as they are first pulled so the pipeline can be replayed.
    pub fn buffered(&self) -> Collection {
        Collection::from_node(Node::replayable(Buffered::new(self.unwrap())))
    }

    /// Pass the whole collection to `f`; non-collection results are converted.
    pub fn through<F, R>(&self, f: F) -> Collection
    where
        F: FnOnce(&Collection) -> R,
        R: Into<Collection>,
    {
        f(self).into()
    }
}

impl Clone for Collection {
    fn clone(&self) -> Self {
        Self::from_node(self.node())
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("Collection")
            .field("node", &node.name())
            .field("restartable", &node.is_restartable())
            .field("known_len", &node.known_len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = Entry;
    type IntoIter = Cursor;

    fn into_iter(self) -> Cursor {
        self.iter()
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

impl FromIterator<Entry> for Collection {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Value>> for Collection {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl From<Vec<Entry>> for Collection {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

impl From<Map<String, Value>> for Collection {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(k, v)| (Key::from(k), v))
            .collect()
    }
}

impl TryFrom<Value> for Collection {
    type Error = CollectionError;

    fn try_from(value: Value) -> CollectionResult<Self> {
        Self::from_value(value)
    }
}
