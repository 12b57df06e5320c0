//! Fixed-size batching.

use crate::adapters::{Cursor, Node, Sequence};
use crate::types::{entries_to_value, Entry, Value};

/// How entries are keyed inside each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKeys {
    /// Batch is a list of values.
    Renumber,
    /// Batch keeps the original keys of its entries.
    Preserve,
}

/// Groups consecutive entries into batches of `size` (the last one may be short).
///
/// Each batch is keyed by the key of its first entry. A size of zero behaves like one.
pub struct Chunk {
    upstream: Node,
    size: usize,
    keys: ChunkKeys,
}

impl Chunk {
    pub fn new(upstream: Node, size: usize, keys: ChunkKeys) -> Self {
        Self {
            upstream,
            size: size.max(1),
            keys,
        }
    }
}

impl Sequence for Chunk {
    fn cursor(&self) -> Cursor {
        let mut upstream = self.upstream.cursor();
        let size = self.size;
        let keys = self.keys;

        Box::new(std::iter::from_fn(move || {
            let batch: Vec<Entry> = upstream.by_ref().take(size).collect();
            let first = batch.first().map(|(k, _)| k.clone())?;
            let value = match keys {
                ChunkKeys::Renumber => Value::Array(batch.into_iter().map(|(_, v)| v).collect()),
                ChunkKeys::Preserve => entries_to_value(batch),
            };
            Some((first, value))
        }))
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable()
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.upstream.known_len()?.div_ceil(self.size))
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "chunk"
    }
}
