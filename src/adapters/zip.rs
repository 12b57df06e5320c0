//! Lock-step iteration over several nodes.

use std::rc::Rc;

use crate::adapters::{Cursor, Node, Sequence};
use crate::types::{Key, Value};

/// Combines one value from each source into a single tuple.
pub type Combiner = dyn Fn(&[Value]) -> Value;

/// Pulls one entry from every source per step and yields them as an array (or as the
/// combiner's result). Stops at the shortest source. Output keys are positional.
pub struct Zip {
    sources: Vec<Node>,
    combiner: Option<Rc<Combiner>>,
}

impl Zip {
    pub fn new(sources: Vec<Node>, combiner: Option<Rc<Combiner>>) -> Self {
        Self { sources, combiner }
    }
}

impl Sequence for Zip {
    fn cursor(&self) -> Cursor {
        let mut cursors: Vec<Cursor> = self.sources.iter().map(Node::cursor).collect();
        let combiner = self.combiner.clone();
        let mut index = 0;

        Box::new(std::iter::from_fn(move || {
            if cursors.is_empty() {
                return None;
            }
            let tuple = cursors
                .iter_mut()
                .map(|c| c.next().map(|(_, v)| v))
                .collect::<Option<Vec<_>>>()?;
            let value = match &combiner {
                Some(combine) => combine(&tuple),
                None => Value::Array(tuple),
            };
            let key = Key::positional(index);
            index += 1;
            Some((key, value))
        }))
    }

    fn is_restartable(&self) -> bool {
        self.sources.iter().all(Node::is_restartable)
    }

    fn known_len(&self) -> Option<usize> {
        self.sources
            .iter()
            .map(Node::known_len)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .min()
    }

    fn name(&self) -> &'static str {
        "zip"
    }
}
