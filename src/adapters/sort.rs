//! Eager, stable ordering.

use std::cell::OnceCell;
use std::rc::Rc;

use crate::adapters::{Cursor, Node, Restartable, Sequence};
use crate::path::Extractor;
use crate::types::{compare, Entry, SortDirection, SortType};

/// Orders the upstream by an extracted sort key.
///
/// The upstream is drained once, on the first pass, and the ordered entries are cached.
/// Entries with equal sort keys keep their upstream order in both directions. Keys are
/// preserved.
pub struct Sort {
    upstream: Node,
    extractor: Extractor,
    direction: SortDirection,
    sort_type: SortType,
    sorted: OnceCell<Rc<Vec<Entry>>>,
}

impl Sort {
    pub fn new(
        upstream: Node,
        extractor: Extractor,
        direction: SortDirection,
        sort_type: SortType,
    ) -> Self {
        Self {
            upstream,
            extractor,
            direction,
            sort_type,
            sorted: OnceCell::new(),
        }
    }

    fn sorted(&self) -> Rc<Vec<Entry>> {
        let sorted = self.sorted.get_or_init(|| {
            let mut keyed: Vec<_> = self
                .upstream
                .cursor()
                .map(|(key, value)| (self.extractor.extract(&value, &key), (key, value)))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match self.direction {
                SortDirection::Ascending => compare(a, b, self.sort_type),
                SortDirection::Descending => compare(b, a, self.sort_type),
            });
            Rc::new(keyed.into_iter().map(|(_, entry)| entry).collect())
        });
        Rc::clone(sorted)
    }
}

impl Sequence for Sort {
    fn cursor(&self) -> Cursor {
        let sorted = self.sorted();
        Box::new((0..sorted.len()).map(move |i| sorted[i].clone()))
    }

    fn is_restartable(&self) -> bool {
        true
    }

    fn known_len(&self) -> Option<usize> {
        self.sorted.get().map(|s| s.len())
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "sort"
    }
}

impl Restartable for Sort {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Key;
    use serde_json::json;

    fn people() -> Node {
        Node::materialized(vec![
            (Key::from("a"), json!({"name": "ann", "age": 30})),
            (Key::from("b"), json!({"name": "bob", "age": "9"})),
            (Key::from("c"), json!({"name": "cy", "age": 30})),
        ])
    }

    fn keys(sort: &Sort) -> Vec<Key> {
        sort.cursor().map(|(k, _)| k).collect()
    }

    #[test]
    fn descending_numeric_is_stable() {
        let sort = Sort::new(people(), "age".into(), SortDirection::Descending, SortType::Numeric);
        assert_eq!(keys(&sort), vec![Key::from("a"), Key::from("c"), Key::from("b")]);
    }

    #[test]
    fn ascending_string_compares_lexically() {
        let sort = Sort::new(people(), "age".into(), SortDirection::Ascending, SortType::String);
        assert_eq!(keys(&sort), vec![Key::from("a"), Key::from("c"), Key::from("b")]);

        let by_name =
            Sort::new(people(), "name".into(), SortDirection::Ascending, SortType::String);
        assert_eq!(keys(&by_name), vec![Key::from("a"), Key::from("b"), Key::from("c")]);
    }

    #[test]
    fn result_is_cached_after_the_first_pass() {
        let sort = Sort::new(people(), "age".into(), SortDirection::Ascending, SortType::Numeric);
        assert_eq!(sort.known_len(), None);
        assert_eq!(sort.cursor().count(), 3);
        assert_eq!(sort.known_len(), Some(3));
    }
}
