use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::collection::Collection;
use crate::mapreduce::MapReduce;
use crate::path::Extractor;
use crate::types::{Key, Map, Value};

/// Default key under which children are attached.
pub const CHILDREN_KEY: &str = "children";

// Rows are owned by the arena; parent/child links are row indices.
#[derive(Default)]
struct Arena {
    rows: Vec<Map<String, Value>>,
    children: Vec<Vec<usize>>,
    by_id: HashMap<Key, usize>,
}

impl Arena {
    fn resolve(&self, index: usize, children_key: &str) -> Value {
        let mut row = self.rows[index].clone();
        let children = self.children[index]
            .iter()
            .map(|&child| self.resolve(child, children_key))
            .collect();
        row.insert(children_key.to_owned(), Value::Array(children));
        Value::Object(row)
    }
}

fn into_row(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        scalar => {
            let mut row = Map::new();
            row.insert("value".to_owned(), scalar.clone());
            row
        }
    }
}

impl Collection {
    /// Build a forest from flat rows linked by id and parent id, with children under
    /// `"children"`. See [`Collection::nest_into`].
    pub fn nest(
        &self,
        id_path: impl Into<Extractor>,
        parent_path: impl Into<Extractor>,
    ) -> Collection {
        self.nest_into(id_path, parent_path, CHILDREN_KEY)
    }

    /// Build a forest from flat rows linked by id and parent id.
    ///
    /// Rows whose parent id is empty (`null`, `""`, `0`) or does not name a known row are
    /// roots. Every row gets a `children_key` list, in input order, regardless of whether
    /// parents come before or after their children. Rows are returned as objects: arrays
    /// become index-keyed objects and scalars become `{"value": scalar}`.
    ///
    /// Trees are built recursively, one stack frame per level, so chains thousands of levels
    /// deep can overflow the stack (as can dropping a [`Value`] that deep). Nesting depths in
    /// the hundreds are fine.
    pub fn nest_into(
        &self,
        id_path: impl Into<Extractor>,
        parent_path: impl Into<Extractor>,
        children_key: &str,
    ) -> Collection {
        let id_path = id_path.into();
        let parent_path = parent_path.into();
        let arena = Rc::new(RefCell::new(Arena::default()));

        let mapping = Rc::clone(&arena);
        let reducing = Rc::clone(&arena);
        let job = MapReduce::new(self.unwrap(), move |value, key, emitter| {
            let id = Key::from_value(&id_path.extract(value, key));
            let parent = Key::from_value(&parent_path.extract(value, key));

            let mut arena = mapping.borrow_mut();
            let index = arena.rows.len();
            arena.rows.push(into_row(value));
            arena.children.push(Vec::new());
            arena.by_id.insert(id, index);
            emitter.emit_intermediate(Value::from(index), parent);
        })
        .with_reducer(move |indices, parent, emitter| {
            let indices: Vec<usize> = indices
                .iter()
                .filter_map(Value::as_u64)
                .map(|i| i as usize)
                .collect();
            let mut arena = reducing.borrow_mut();
            let target = if parent.is_empty_like() {
                None
            } else {
                arena.by_id.get(parent).copied()
            };
            match target {
                Some(parent_index) => arena.children[parent_index] = indices,
                None => {
                    for index in indices {
                        emitter.emit(Value::from(index), None);
                    }
                }
            }
        });

        let children_key = children_key.to_owned();
        Collection::from_job(job).map(move |root, _| match root.as_u64() {
            Some(index) => arena.borrow().resolve(index as usize, &children_key),
            None => Value::Null,
        })
    }
}
