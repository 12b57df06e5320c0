//! Loading collections from JSON and CSV sources.
//!
//! - [`json`]: JSON arrays, JSON objects and NDJSON
//! - [`csv`]: CSV with a header row, one object per record
//!
//! Both are eager: the input is parsed up front and the resulting collection is
//! restartable.

pub mod csv;
pub mod json;

pub use self::csv::{from_csv_path, from_csv_reader};
pub use self::json::{from_json_path, from_json_str};
