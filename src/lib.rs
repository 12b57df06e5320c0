//! `lazy-collection` is a library for building lazy, composable pipelines over JSON-like
//! values.
//!
//! The primary entrypoint is [`Collection`]: construct one from a list, a JSON array or object,
//! a single-pass iterator, or a file (see [`ingestion`]), then chain operations. Lazy
//! operations (filter/map/extract/take/unfold/...) only describe work; it runs when a terminal
//! operation such as [`Collection::to_array`], [`Collection::to_list`] or
//! [`Collection::reduce`] pulls elements through the chain.
//!
//! ## What a pipeline holds
//!
//! - Elements are [`Value`]s (`serde_json` values with insertion-ordered objects).
//! - Each element has a [`Key`]: integers for positional data, strings (or integers) for
//!   keyed data. Keys are preserved through key-preserving operations and can be dropped with
//!   [`Collection::to_list`].
//! - Every collection wraps one [`adapters::Node`]: a facade over another collection, a lazy
//!   adapter, or materialized entries.
//!
//! ## Quick example
//!
//! ```rust
//! use lazy_collection::{Collection, SortDirection, SortType};
//! use serde_json::json;
//!
//! let orders = Collection::from_values(vec![
//!     json!({"id": 1, "customer": "ann", "total": 30, "items": [{"sku": "a"}, {"sku": "b"}]}),
//!     json!({"id": 2, "customer": "bob", "total": 12, "items": [{"sku": "c"}]}),
//!     json!({"id": 3, "customer": "ann", "total": 5, "items": []}),
//! ]);
//!
//! // Dot paths with a `{*}` wildcard fan out and flatten.
//! assert_eq!(
//!     orders.extract("items.{*}.sku").to_list(),
//!     vec![json!("a"), json!("b"), json!("c")]
//! );
//!
//! // Grouping runs on the map/reduce engine.
//! let per_customer = orders.group_by("customer").map(|orders, _| {
//!     json!(orders.as_array().map_or(0, |o| o.len()))
//! });
//! assert_eq!(per_customer.to_json_value(), json!({"ann": 2, "bob": 1}));
//!
//! // Sorting is eager, stable, and keeps keys.
//! let biggest = orders.sort_by("total", SortDirection::Descending, SortType::Numeric);
//! assert_eq!(biggest.extract("id").to_list(), vec![json!(1), json!(2), json!(3)]);
//! assert_eq!(orders.sum_of("total"), json!(47));
//! ```
//!
//! ## Single-pass sources
//!
//! [`Collection::from_stream`] wraps an iterator that can only be read once. Use
//! [`Collection::buffered`] to replay it lazily or [`Collection::compile`] to run the pipeline
//! once and keep the result. Peeking ([`Collection::is_empty`], [`Collection::first`]) buffers
//! automatically so nothing is lost.
//!
//! ```rust
//! use lazy_collection::{Collection, Key};
//! use serde_json::json;
//!
//! let stream = Collection::from_stream((0..3).map(|i| (Key::positional(i), json!(i * i))));
//! assert!(!stream.is_empty());
//! assert_eq!(stream.to_list(), vec![json!(0), json!(1), json!(4)]);
//! ```
//!
//! ## Modules
//!
//! - [`collection`]: the [`Collection`] facade
//! - [`adapters`]: pipeline nodes and the lazy adapters behind each operation
//! - [`mapreduce`]: the two-phase engine behind grouping, counting, combining and nesting
//! - [`path`]: dot-path extraction and matching
//! - [`structural`]: nesting, cartesian product and transposition options
//! - [`ingestion`]: JSON/NDJSON and CSV loaders
//! - [`types`]: keys, value helpers and sort options
//! - [`error`]: error types used across the crate

pub mod adapters;
pub mod collection;
pub mod error;
pub mod ingestion;
pub mod mapreduce;
pub mod path;
pub mod structural;
pub mod types;

pub use adapters::{Node, Restartable, Sequence};
pub use collection::Collection;
pub use error::{CollectionError, CollectionResult};
pub use mapreduce::{
    Emitter, MapReduce, MapReduceEvent, MapReduceObserver, MapReduceOptions, MapReduceSequence,
    MapReduceStats, Phase, StdErrObserver,
};
pub use path::{Extractor, Matcher, PathSyntax, PropertyPath};
pub use structural::CartesianOptions;
pub use types::{Entry, EqualityMode, Key, SortDirection, SortType, Value};
