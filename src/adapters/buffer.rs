//! Restart-capable cache over an upstream node.

use std::cell::RefCell;
use std::rc::Rc;

use crate::adapters::{Cursor, Node, Restartable, Sequence};
use crate::types::Entry;

#[derive(Default)]
struct BufferState {
    source: Option<Cursor>,
    cache: Vec<Entry>,
    exhausted: bool,
}

/// Caches every entry pulled from its upstream.
///
/// Nothing is consumed until the first pass. Later passes replay the cache and then keep
/// pulling from the upstream where the previous pass stopped, so partial passes are fine.
pub struct Buffered {
    upstream: Node,
    state: Rc<RefCell<BufferState>>,
}

impl Buffered {
    pub fn new(upstream: Node) -> Self {
        Self {
            upstream,
            state: Rc::new(RefCell::new(BufferState::default())),
        }
    }

    /// Number of entries cached so far.
    pub fn cached_len(&self) -> usize {
        self.state.borrow().cache.len()
    }
}

impl Sequence for Buffered {
    fn cursor(&self) -> Cursor {
        let state = Rc::clone(&self.state);
        let upstream = self.upstream.clone();
        let mut position = 0;

        Box::new(std::iter::from_fn(move || {
            let mut source = {
                let mut st = state.borrow_mut();
                if let Some(entry) = st.cache.get(position) {
                    position += 1;
                    return Some(entry.clone());
                }
                if st.exhausted {
                    return None;
                }
                st.source.take()
            }
            .unwrap_or_else(|| upstream.cursor());

            // The shared state is released while the upstream runs.
            let next = source.next();

            let mut st = state.borrow_mut();
            match next {
                Some(entry) => {
                    st.cache.push(entry.clone());
                    st.source = Some(source);
                    position = st.cache.len();
                    Some(entry)
                }
                None => {
                    st.exhausted = true;
                    None
                }
            }
        }))
    }

    fn is_restartable(&self) -> bool {
        true
    }

    fn known_len(&self) -> Option<usize> {
        let st = self.state.borrow();
        st.exhausted.then_some(st.cache.len())
    }

    fn repeats_keys(&self) -> bool {
        self.upstream.repeats_keys()
    }

    fn name(&self) -> &'static str {
        "buffered"
    }
}

impl Restartable for Buffered {}
