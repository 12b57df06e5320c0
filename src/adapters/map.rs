//! One-to-one value transforms.

use std::rc::Rc;

use crate::adapters::{Cursor, Node, Sequence, Transform};

/// Replaces every value with `transform(value, key)`. Keys are preserved.
pub struct Replace {
    upstream: Node,
    transform: Rc<Transform>,
}

impl Replace {
    pub fn new(upstream: Node, transform: Rc<Transform>) -> Self {
        Self {
            upstream,
            transform,
        }
    }
}

impl Sequence for Replace {
    fn cursor(&self) -> Cursor {
        let transform = Rc::clone(&self.transform);
        Box::new(self.upstream.cursor().map(move |(key, value)| {
            let out = transform(&value, &key);
            (key, out)
        }))
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable()
    }

    fn known_len(&self) -> Option<usize> {
        self.upstream.known_len()
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "replace"
    }
}
