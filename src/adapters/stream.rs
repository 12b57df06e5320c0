//! Single-pass source over an arbitrary iterator.

use std::cell::RefCell;
use std::rc::Rc;

use crate::adapters::{Cursor, Sequence};
use crate::types::Entry;

/// A source that can only be traversed once.
///
/// Every cursor pulls from the same underlying iterator, so a second pass resumes where the
/// first stopped (and sees nothing once the iterator is exhausted). Wrap it in
/// [`crate::adapters::Buffered`] to replay it.
pub struct Stream {
    source: Rc<RefCell<Cursor>>,
}

impl Stream {
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
        I::IntoIter: 'static,
    {
        let source: Cursor = Box::new(source.into_iter());
        Self {
            source: Rc::new(RefCell::new(source)),
        }
    }
}

impl Sequence for Stream {
    fn cursor(&self) -> Cursor {
        let source = Rc::clone(&self.source);
        Box::new(std::iter::from_fn(move || source.borrow_mut().next()))
    }

    fn is_restartable(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Key;
    use serde_json::json;

    #[test]
    fn second_pass_resumes_where_the_first_stopped() {
        let stream = Stream::new((0..3).map(|i| (Key::positional(i), json!(i))));
        let first: Vec<_> = stream.cursor().take(2).collect();
        assert_eq!(first.len(), 2);
        let rest: Vec<_> = stream.cursor().collect();
        assert_eq!(rest, vec![(Key::Int(2), json!(2))]);
        assert_eq!(stream.cursor().count(), 0);
        assert!(!stream.is_restartable());
    }
}
