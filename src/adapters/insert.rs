//! Writes values from a second node into each element at a dot path.

use crate::adapters::{Cursor, Node, Sequence};
use crate::path::SEPARATOR;
use crate::types::Value;

/// Pairs every upstream element with the next value of `values` and writes it under `path`.
///
/// - the write is skipped (the element is still yielded) when an intermediate segment is
///   missing or the element cannot hold the target key
/// - once `values` is exhausted, the remaining elements pass through unchanged
pub struct Insert {
    upstream: Node,
    parents: Vec<String>,
    target: String,
    values: Node,
}

impl Insert {
    pub fn new(upstream: Node, path: &str, values: Node) -> Self {
        let mut parents: Vec<String> = path.split(SEPARATOR).map(str::to_owned).collect();
        let target = parents.pop().unwrap_or_default();
        Self {
            upstream,
            parents,
            target,
            values,
        }
    }
}

impl Sequence for Insert {
    fn cursor(&self) -> Cursor {
        let mut values = self.values.cursor();
        let mut exhausted = false;
        let parents = self.parents.clone();
        let target = self.target.clone();

        Box::new(self.upstream.cursor().map(move |(key, mut element)| {
            if !exhausted {
                match values.next() {
                    Some((_, value)) => write_at(&mut element, &parents, &target, value),
                    None => exhausted = true,
                }
            }
            (key, element)
        }))
    }

    fn is_restartable(&self) -> bool {
        self.upstream.is_restartable() && self.values.is_restartable()
    }

    fn known_len(&self) -> Option<usize> {
        self.upstream.known_len()
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "insert"
    }
}

fn write_at(element: &mut Value, parents: &[String], target: &str, value: Value) {
    let mut pointer = element;
    for segment in parents {
        let next = match pointer {
            Value::Object(map) => map.get_mut(segment.as_str()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            _ => None,
        };
        match next {
            Some(child) if !child.is_null() => pointer = child,
            _ => return,
        }
    }

    match pointer {
        Value::Object(map) => {
            map.insert(target.to_owned(), value);
        }
        Value::Array(items) => match target.parse::<usize>() {
            Ok(i) if i < items.len() => items[i] = value,
            Ok(i) if i == items.len() => items.push(value),
            _ => {}
        },
        _ => {}
    }
}
