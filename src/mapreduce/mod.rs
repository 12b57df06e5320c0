//! Two-phase map/group/reduce engine.
//!
//! A [`MapReduce`] job walks its source once, handing every element to the mapper together
//! with an [`Emitter`]. The mapper can:
//!
//! - [`Emitter::emit_intermediate`] a value under a group key (groups keep first-seen order)
//! - [`Emitter::emit`] a value straight into the final results
//!
//! Once every element has been mapped, each group is handed to the reducer, which emits
//! final results. Grouping, counting, combining and tree building are all jobs on this
//! engine.
//!
//! ## Example: inverted index
//!
//! ```rust
//! use lazy_collection::{Collection, Key, MapReduce};
//! use serde_json::{json, Value};
//!
//! let docs = Collection::from_value(json!({
//!     "file1": ["cake", "fruit"],
//!     "file2": ["fruit", "apple"],
//! }))
//! .unwrap();
//!
//! let mut job = MapReduce::new(docs.unwrap(), |words, file, emitter| {
//!     for word in words.as_array().into_iter().flatten() {
//!         emitter.emit_intermediate(file.to_value(), Key::from_value(word));
//!     }
//! })
//! .with_reducer(|files, word, emitter| {
//!     emitter.emit(Value::Array(files), Some(word.clone()));
//! });
//!
//! let index = job.execute().unwrap();
//! assert_eq!(index[1], (Key::from("fruit"), json!(["file1", "file2"])));
//! ```

mod observer;

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, trace, warn};

use crate::adapters::{Cursor, Node, Restartable, Sequence};
use crate::error::{CollectionError, CollectionResult};
use crate::types::{Entry, Key, Value};

pub use observer::{MapReduceEvent, MapReduceObserver, MapReduceStats, StdErrObserver};

/// Mapping function: `(value, key, emitter)`.
pub type Mapper = Box<dyn FnMut(&Value, &Key, &mut Emitter)>;

/// Reducing function: `(group values, group key, emitter)`.
pub type Reducer = Box<dyn FnMut(Vec<Value>, &Key, &mut Emitter)>;

/// Configuration for a [`MapReduce`] job.
#[derive(Clone, Default)]
pub struct MapReduceOptions {
    /// Receives phase events (metrics/logging).
    pub observer: Option<Arc<dyn MapReduceObserver>>,
}

impl MapReduceOptions {
    pub fn with_observer(mut self, observer: Arc<dyn MapReduceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl fmt::Debug for MapReduceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapReduceOptions")
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

/// Collects what mappers and reducers emit.
#[derive(Debug, Default)]
pub struct Emitter {
    results: Vec<Entry>,
    result_index: HashMap<Key, usize>,
    groups: Vec<(Key, Vec<Value>)>,
    group_index: HashMap<Key, usize>,
    next_index: usize,
}

impl Emitter {
    /// Add a final result.
    ///
    /// Without a key the result is appended under the integer after the largest integer key
    /// used so far (`0` when there is none). Emitting an existing key replaces that result's
    /// value in place.
    pub fn emit(&mut self, value: Value, key: Option<Key>) {
        let key = key.unwrap_or_else(|| Key::positional(self.next_index));
        if let Key::Int(i) = key {
            if let Ok(i) = usize::try_from(i) {
                self.next_index = self.next_index.max(i.saturating_add(1));
            }
        }
        match self.result_index.get(&key) {
            Some(&i) => self.results[i].1 = value,
            None => {
                self.result_index.insert(key.clone(), self.results.len());
                self.results.push((key, value));
            }
        }
    }

    /// Buffer `value` under the group `key`.
    pub fn emit_intermediate(&mut self, value: Value, key: Key) {
        match self.group_index.get(&key) {
            Some(&i) => self.groups[i].1.push(value),
            None => {
                self.group_index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }

    fn take_groups(&mut self) -> Vec<(Key, Vec<Value>)> {
        self.group_index.clear();
        std::mem::take(&mut self.groups)
    }
}

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Mapping,
    Reducing,
    Done,
    /// Intermediate groups were emitted but there is no reducer.
    Failed,
}

/// A single map/reduce job over a source node.
pub struct MapReduce {
    source: Node,
    mapper: Mapper,
    reducer: Option<Reducer>,
    emitter: Emitter,
    phase: Phase,
    options: MapReduceOptions,
    stats: Option<MapReduceStats>,
}

impl MapReduce {
    pub fn new<M>(source: Node, mapper: M) -> Self
    where
        M: FnMut(&Value, &Key, &mut Emitter) + 'static,
    {
        Self {
            source,
            mapper: Box::new(mapper),
            reducer: None,
            emitter: Emitter::default(),
            phase: Phase::Mapping,
            options: MapReduceOptions::default(),
            stats: None,
        }
    }

    pub fn with_reducer<R>(mut self, reducer: R) -> Self
    where
        R: FnMut(Vec<Value>, &Key, &mut Emitter) + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    pub fn with_options(mut self, options: MapReduceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Counters from the finished run, if the job has completed.
    pub fn stats(&self) -> Option<&MapReduceStats> {
        self.stats.as_ref()
    }

    /// Run the job (once) and return its results in emission order.
    ///
    /// Results from mapper emits come first, in source order, followed by reducer emits in
    /// first-seen group order. Later calls return the same results without re-running.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Configuration`] when the mapper emitted intermediate values
    /// and no reducer was supplied.
    pub fn execute(&mut self) -> CollectionResult<&[Entry]> {
        match self.phase {
            Phase::Done => return Ok(&self.emitter.results),
            Phase::Failed => return Err(missing_reducer()),
            Phase::Mapping | Phase::Reducing => {}
        }

        let started = Instant::now();
        let observer = self.options.observer.clone();
        notify(&observer, MapReduceEvent::MappingStarted);
        debug!(source = self.source.name(), "map/reduce: mapping started");

        let mut rows = 0;
        for (key, value) in self.source.cursor() {
            (self.mapper)(&value, &key, &mut self.emitter);
            rows += 1;
        }

        let groups = self.emitter.take_groups();
        let group_count = groups.len();
        let direct_results = self.emitter.results.len();
        notify(
            &observer,
            MapReduceEvent::MappingFinished {
                rows,
                groups: group_count,
                direct_results,
            },
        );
        debug!(rows, groups = group_count, direct_results, "map/reduce: mapping finished");

        self.phase = Phase::Reducing;
        if !groups.is_empty() {
            let Some(reducer) = self.reducer.as_mut() else {
                self.phase = Phase::Failed;
                return Err(missing_reducer());
            };
            for (key, values) in groups {
                let count = values.len();
                reducer(values, &key, &mut self.emitter);
                trace!(key = %key, values = count, "map/reduce: group reduced");
                notify(&observer, MapReduceEvent::GroupReduced { key, values: count });
            }
            let leftover = self.emitter.take_groups();
            if !leftover.is_empty() {
                warn!(
                    groups = leftover.len(),
                    "map/reduce: values emitted as intermediate during reduction were dropped"
                );
            }
        }

        self.phase = Phase::Done;
        let stats = MapReduceStats {
            rows_mapped: rows,
            groups: group_count,
            direct_results,
            results: self.emitter.results.len(),
            elapsed: started.elapsed(),
        };
        notify(
            &observer,
            MapReduceEvent::Finished {
                results: stats.results,
                elapsed: stats.elapsed,
            },
        );
        debug!(%stats, "map/reduce: finished");
        self.stats = Some(stats);

        Ok(&self.emitter.results)
    }

    /// Run the job if needed and take ownership of its results.
    pub fn into_results(mut self) -> CollectionResult<Vec<Entry>> {
        self.execute()?;
        Ok(self.emitter.results)
    }

    /// Add a final result from outside the mapper/reducer.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Usage`] once the job is done.
    pub fn emit(&mut self, value: Value, key: Option<Key>) -> CollectionResult<()> {
        self.ensure_open()?;
        self.emitter.emit(value, key);
        Ok(())
    }

    /// Buffer an intermediate value from outside the mapper.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Usage`] once the job is done.
    pub fn emit_intermediate(&mut self, value: Value, key: Key) -> CollectionResult<()> {
        self.ensure_open()?;
        self.emitter.emit_intermediate(value, key);
        Ok(())
    }

    fn ensure_open(&self) -> CollectionResult<()> {
        match self.phase {
            Phase::Done | Phase::Failed => Err(CollectionError::usage(
                "cannot emit into a map/reduce job that has already run",
            )),
            Phase::Mapping | Phase::Reducing => Ok(()),
        }
    }
}

impl fmt::Debug for MapReduce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapReduce")
            .field("source", &self.source)
            .field("phase", &self.phase)
            .field("has_reducer", &self.reducer.is_some())
            .field("options", &self.options)
            .finish()
    }
}

fn notify(observer: &Option<Arc<dyn MapReduceObserver>>, event: MapReduceEvent) {
    if let Some(o) = observer {
        o.on_event(&event);
    }
}

fn missing_reducer() -> CollectionError {
    CollectionError::configuration("intermediate values were emitted but no reducer was supplied")
}

/// Lazy sequence over a job's results.
///
/// The job runs on the first pass and its results are replayed afterwards. A failing job is
/// logged and yields no entries; use [`MapReduce::execute`] directly to observe the error.
pub struct MapReduceSequence {
    job: RefCell<Option<MapReduce>>,
    results: OnceCell<Rc<Vec<Entry>>>,
}

impl MapReduceSequence {
    pub fn new(job: MapReduce) -> Self {
        Self {
            job: RefCell::new(Some(job)),
            results: OnceCell::new(),
        }
    }

    fn results(&self) -> Rc<Vec<Entry>> {
        let results = self.results.get_or_init(|| {
            let Some(job) = self.job.borrow_mut().take() else {
                return Rc::new(Vec::new());
            };
            match job.into_results() {
                Ok(entries) => Rc::new(entries),
                Err(err) => {
                    error!(%err, "map/reduce job failed");
                    Rc::new(Vec::new())
                }
            }
        });
        Rc::clone(results)
    }
}

impl Sequence for MapReduceSequence {
    fn cursor(&self) -> Cursor {
        let results = self.results();
        Box::new((0..results.len()).map(move |i| results[i].clone()))
    }

    fn is_restartable(&self) -> bool {
        true
    }

    fn known_len(&self) -> Option<usize> {
        self.results.get().map(|r| r.len())
    }

    fn name(&self) -> &'static str {
        "map_reduce"
    }
}

impl Restartable for MapReduceSequence {}
