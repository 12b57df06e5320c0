//! Positional slicing.

use crate::adapters::{Cursor, Node, Sequence};

/// Skips `offset` entries, then yields at most `count` (or everything when `count` is `None`).
/// Keys are preserved. The upstream is not pulled past the end of the slice.
pub struct Limit {
    upstream: Node,
    offset: usize,
    count: Option<usize>,
}

impl Limit {
    pub fn new(upstream: Node, offset: usize, count: Option<usize>) -> Self {
        Self {
            upstream,
            offset,
            count,
        }
    }
}

impl Sequence for Limit {
    fn cursor(&self) -> Cursor {
        let skipped = self.upstream.cursor().skip(self.offset);
        match self.count {
            Some(count) => Box::new(skipped.take(count)),
            None => Box::new(skipped),
        }
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable()
    }

    fn known_len(&self) -> Option<usize> {
        let remaining = self.upstream.known_len()?.saturating_sub(self.offset);
        Some(self.count.map_or(remaining, |c| c.min(remaining)))
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "limit"
    }
}
