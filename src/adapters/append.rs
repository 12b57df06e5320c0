//! Concatenation of two nodes.

use crate::adapters::{Cursor, Node, Sequence};

/// Yields every entry of `head`, then every entry of `tail`, keys untouched.
pub struct Append {
    head: Node,
    tail: Node,
}

impl Append {
    pub fn new(head: Node, tail: Node) -> Self {
        Self { head, tail }
    }
}

impl Sequence for Append {
    fn cursor(&self) -> Cursor {
        Box::new(self.head.cursor().chain(self.tail.cursor()))
    }

    fn is_restartable(&self) -> bool {
        self.head.is_restartable() && self.tail.is_restartable()
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.head.known_len()? + self.tail.known_len()?)
    }

    fn repeats_keys(&self) -> bool {
        self.head.repeats_keys() || self.tail.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "append"
    }
}
