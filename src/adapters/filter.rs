//! Entry filtering.

use std::rc::Rc;

use crate::adapters::{Cursor, Node, Predicate, Sequence};

/// Yields only the upstream entries for which `predicate` returns `true`. Keys are preserved.
pub struct Filter {
    upstream: Node,
    predicate: Rc<Predicate>,
}

impl Filter {
    pub fn new(upstream: Node, predicate: Rc<Predicate>) -> Self {
        Self {
            upstream,
            predicate,
        }
    }
}

impl Sequence for Filter {
    fn cursor(&self) -> Cursor {
        let predicate = Rc::clone(&self.predicate);
        Box::new(
            self.upstream
                .cursor()
                .filter(move |(key, value)| predicate(value, key)),
        )
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable()
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}
