//! Early termination.

use std::rc::Rc;

use crate::adapters::{Cursor, Node, Predicate, Sequence};

/// Ends the pass at the first entry for which `condition` holds. That entry is not yielded
/// and nothing after it is pulled from the upstream.
pub struct StopWhen {
    upstream: Node,
    condition: Rc<Predicate>,
}

impl StopWhen {
    pub fn new(upstream: Node, condition: Rc<Predicate>) -> Self {
        Self {
            upstream,
            condition,
        }
    }
}

impl Sequence for StopWhen {
    fn cursor(&self) -> Cursor {
        let condition = Rc::clone(&self.condition);
        Box::new(
            self.upstream
                .cursor()
                .take_while(move |(key, value)| !condition(value, key)),
        )
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable()
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "stop_when"
    }
}
