//! Pipeline nodes and the single-purpose lazy adapters they are built from.
//!
//! Every [`crate::Collection`] owns one [`Node`]. A node is one of:
//!
//! - [`Node::Facade`]: another collection wrapped as-is (see [`crate::Collection::wrap`])
//! - [`Node::Adapter`]: a [`Sequence`] that pulls from an upstream node on demand
//! - [`Node::Materialized`]: a realized list of entries shared by reference
//!
//! Adapters never consume their upstream eagerly. Each call to [`Sequence::cursor`] starts a
//! new pass; whether that pass sees the same data as the previous one is reported by
//! [`Sequence::is_restartable`].

pub mod append;
pub mod buffer;
pub mod chunk;
pub mod filter;
pub mod insert;
pub mod limit;
pub mod map;
pub mod sort;
pub mod stop;
pub mod stream;
pub mod unfold;
pub mod zip;

use std::fmt;
use std::rc::Rc;

use crate::collection::Collection;
use crate::types::{Entry, Key, Value};

pub use append::Append;
pub use buffer::Buffered;
pub use chunk::{Chunk, ChunkKeys};
pub use filter::Filter;
pub use insert::Insert;
pub use limit::Limit;
pub use map::Replace;
pub use sort::Sort;
pub use stop::StopWhen;
pub use stream::Stream;
pub use unfold::Unfold;
pub use zip::Zip;

/// One forward pass over a sequence.
pub type Cursor = Box<dyn Iterator<Item = Entry>>;

/// Predicate shared by lazy adapters.
pub type Predicate = dyn Fn(&Value, &Key) -> bool;

/// Value transform shared by lazy adapters.
pub type Transform = dyn Fn(&Value, &Key) -> Value;

/// A finite, ordered sequence of key/value entries.
pub trait Sequence {
    /// Start a new pass.
    fn cursor(&self) -> Cursor;

    /// Whether a new pass replays the same entries.
    fn is_restartable(&self) -> bool;

    /// Number of entries, when it is known without traversal.
    fn known_len(&self) -> Option<usize> {
        None
    }

    /// Whether a pass can yield the same key more than once for distinct elements.
    ///
    /// Materializing such a sequence with its keys would silently drop data, so key
    /// preservation is disabled for it.
    fn repeats_keys(&self) -> bool {
        false
    }

    /// Short adapter name used in `Debug` output and logs.
    fn name(&self) -> &'static str;
}

/// Marker for sequences that replay identical content on every pass.
pub trait Restartable: Sequence {}

/// A pipeline node.
#[derive(Clone)]
pub enum Node {
    /// A collection wrapped without modification.
    Facade(Box<Collection>),
    /// A lazy adapter or source.
    Adapter(Rc<dyn Sequence>),
    /// Fully realized entries.
    Materialized(Rc<Vec<Entry>>),
}

impl Node {
    /// Node over a lazy adapter.
    pub fn adapter<S: Sequence + 'static>(sequence: S) -> Self {
        Self::Adapter(Rc::new(sequence))
    }

    /// Node over a sequence that is statically known to replay.
    pub fn replayable<S: Restartable + 'static>(sequence: S) -> Self {
        Self::Adapter(Rc::new(sequence))
    }

    /// Node over realized entries.
    pub fn materialized(entries: Vec<Entry>) -> Self {
        Self::Materialized(Rc::new(entries))
    }

    pub fn cursor(&self) -> Cursor {
        match self {
            Self::Facade(inner) => inner.iter(),
            Self::Adapter(sequence) => sequence.cursor(),
            Self::Materialized(entries) => {
                let entries = Rc::clone(entries);
                Box::new((0..entries.len()).map(move |i| entries[i].clone()))
            }
        }
    }

    pub fn is_restartable(&self) -> bool {
        match self {
            Self::Facade(inner) => inner.node().is_restartable(),
            Self::Adapter(sequence) => sequence.is_restartable(),
            Self::Materialized(_) => true,
        }
    }

    pub fn known_len(&self) -> Option<usize> {
        match self {
            Self::Facade(inner) => inner.node().known_len(),
            Self::Adapter(sequence) => sequence.known_len(),
            Self::Materialized(entries) => Some(entries.len()),
        }
    }

    pub fn repeats_keys(&self) -> bool {
        match self {
            Self::Facade(inner) => inner.node().repeats_keys(),
            Self::Adapter(sequence) => sequence.repeats_keys(),
            Self::Materialized(_) => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Facade(_) => "facade",
            Self::Adapter(sequence) => sequence.name(),
            Self::Materialized(_) => "materialized",
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Facade(inner) => f.debug_tuple("Facade").field(&inner.node()).finish(),
            Self::Adapter(sequence) => f.debug_tuple("Adapter").field(&sequence.name()).finish(),
            Self::Materialized(entries) => f
                .debug_struct("Materialized")
                .field("len", &entries.len())
                .finish(),
        }
    }
}
