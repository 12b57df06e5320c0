//! Textual snapshots of a collection's materialized entries.
//!
//! A snapshot is a JSON list of `[key, value]` pairs. Keys that the pipeline may repeat for
//! distinct elements are renumbered first, so both the keyed (`to_array(true)`) and the
//! positional (`to_list`) views of the restored collection match the original.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::CollectionResult;
use crate::types::{Entry, Key};

impl Collection {
    fn snapshot_entries(&self) -> Vec<Entry> {
        self.make_replayable();
        let node = self.node();
        let entries = node.cursor();
        if node.repeats_keys() {
            entries
                .enumerate()
                .map(|(i, (_, v))| (Key::positional(i), v))
                .collect()
        } else {
            entries.collect()
        }
    }

    /// Serialize the current contents.
    ///
    /// A single-pass collection is buffered first, so it can still be iterated afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CollectionError::Json`] if a value cannot be encoded.
    pub fn to_snapshot(&self) -> CollectionResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a collection from [`Collection::to_snapshot`] output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CollectionError::Json`] if `text` is not a snapshot.
    pub fn from_snapshot(text: &str) -> CollectionResult<Collection> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot_entries().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Entry>::deserialize(deserializer).map(Collection::new)
    }
}
