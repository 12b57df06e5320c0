//! One-level flattening.

use std::rc::Rc;

use crate::adapters::{Cursor, Node, Sequence, Transform};
use crate::types::composite_entries;

/// Inlines the children of every composite value (after applying the optional transformer).
///
/// Children keep their own keys, so different parents can yield the same key; this adapter
/// therefore reports [`Sequence::repeats_keys`]. Scalars pass through as single entries and
/// empty composites contribute nothing.
pub struct Unfold {
    upstream: Node,
    transformer: Option<Rc<Transform>>,
}

impl Unfold {
    pub fn new(upstream: Node, transformer: Option<Rc<Transform>>) -> Self {
        Self {
            upstream,
            transformer,
        }
    }
}

impl Sequence for Unfold {
    fn cursor(&self) -> Cursor {
        let transformer = self.transformer.clone();
        Box::new(self.upstream.cursor().flat_map(move |(key, value)| {
            let value = match &transformer {
                Some(transform) => transform(&value, &key),
                None => value,
            };
            match composite_entries(&value) {
                Some(children) => children,
                None => vec![(key, value)],
            }
        }))
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable()
    }

    fn repeats_keys(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "unfold"
    }
}
