//! Operations built on the map/reduce engine.

use std::collections::HashMap;

use crate::adapters::Node;
use crate::collection::Collection;
use crate::error::CollectionResult;
use crate::mapreduce::{Emitter, MapReduce, MapReduceSequence};
use crate::path::Extractor;
use crate::types::{entries_to_value, Entry, Key, Value};

impl Collection {
    /// Lazy collection over the results of `job`. The job runs on the first pass.
    pub(crate) fn from_job(job: MapReduce) -> Collection {
        Collection::from_node(Node::replayable(MapReduceSequence::new(job)))
    }

    /// Lists of elements keyed by the extracted value, in first-seen order.
    pub fn group_by(&self, extractor: impl Into<Extractor>) -> Collection {
        let extractor = extractor.into();
        let job = MapReduce::new(self.unwrap(), move |value, key, emitter| {
            let group = Key::from_value(&extractor.extract(value, key));
            emitter.emit_intermediate(value.clone(), group);
        })
        .with_reducer(|values, group, emitter| {
            emitter.emit(Value::Array(values), Some(group.clone()));
        });
        Collection::from_job(job)
    }

    /// Elements keyed by the extracted value; the last element with a given key wins.
    pub fn index_by(&self, extractor: impl Into<Extractor>) -> Collection {
        let extractor = extractor.into();
        let job = MapReduce::new(self.unwrap(), move |value, key, emitter| {
            let index = Key::from_value(&extractor.extract(value, key));
            emitter.emit_intermediate(value.clone(), index);
        })
        .with_reducer(|mut values, index, emitter| {
            if let Some(last) = values.pop() {
                emitter.emit(last, Some(index.clone()));
            }
        });
        Collection::from_job(job)
    }

    /// Number of elements per extracted value.
    pub fn count_by(&self, extractor: impl Into<Extractor>) -> Collection {
        let extractor = extractor.into();
        let job = MapReduce::new(self.unwrap(), move |value, key, emitter| {
            let group = Key::from_value(&extractor.extract(value, key));
            emitter.emit_intermediate(Value::Null, group);
        })
        .with_reducer(|values, group, emitter| {
            emitter.emit(Value::from(values.len()), Some(group.clone()));
        });
        Collection::from_job(job)
    }

    /// `key_path -> value_path` pairs; a repeated key keeps its first position and last value.
    pub fn combine(
        &self,
        key_path: impl Into<Extractor>,
        value_path: impl Into<Extractor>,
    ) -> Collection {
        let key_path = key_path.into();
        let value_path = value_path.into();
        let job = MapReduce::new(self.unwrap(), move |value, key, emitter| {
            let combined_key = Key::from_value(&key_path.extract(value, key));
            emitter.emit(value_path.extract(value, key), Some(combined_key));
        });
        Collection::from_job(job)
    }

    /// Like [`Collection::combine`], partitioned by `group_path`. Each partition becomes one
    /// element; colliding keys inside a partition resolve last-write-wins.
    pub fn combine_grouped(
        &self,
        key_path: impl Into<Extractor>,
        value_path: impl Into<Extractor>,
        group_path: impl Into<Extractor>,
    ) -> Collection {
        let key_path = key_path.into();
        let value_path = value_path.into();
        let group_path = group_path.into();
        let job = MapReduce::new(self.unwrap(), move |value, key, emitter| {
            let pair = Value::Array(vec![
                key_path.extract(value, key),
                value_path.extract(value, key),
            ]);
            emitter.emit_intermediate(pair, Key::from_value(&group_path.extract(value, key)));
        })
        .with_reducer(|pairs, group, emitter| {
            let mut merged: Vec<Entry> = Vec::new();
            let mut positions: HashMap<Key, usize> = HashMap::new();
            for pair in pairs {
                let Value::Array(mut kv) = pair else { continue };
                let (Some(v), Some(k)) = (kv.pop(), kv.pop()) else { continue };
                let k = Key::from_value(&k);
                match positions.get(&k) {
                    Some(&i) => merged[i].1 = v,
                    None => {
                        positions.insert(k.clone(), merged.len());
                        merged.push((k, v));
                    }
                }
            }
            emitter.emit(entries_to_value(merged), Some(group.clone()));
        });
        Collection::from_job(job)
    }

    /// Run a job with a mapper and a reducer, eagerly.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`MapReduce::execute`].
    pub fn map_reduce<M, R>(&self, mapper: M, reducer: R) -> CollectionResult<Collection>
    where
        M: FnMut(&Value, &Key, &mut Emitter) + 'static,
        R: FnMut(Vec<Value>, &Key, &mut Emitter) + 'static,
    {
        self.run_job(MapReduce::new(self.unwrap(), mapper).with_reducer(reducer))
    }

    /// Run a mapper-only job, eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CollectionError::Configuration`] if the mapper emits intermediate
    /// values, since there is no reducer for them.
    pub fn map_only<M>(&self, mapper: M) -> CollectionResult<Collection>
    where
        M: FnMut(&Value, &Key, &mut Emitter) + 'static,
    {
        self.run_job(MapReduce::new(self.unwrap(), mapper))
    }

    /// Execute a prepared job (e.g. one with [`crate::MapReduceOptions`]) and wrap its results.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`MapReduce::execute`].
    pub fn run_job(&self, job: MapReduce) -> CollectionResult<Collection> {
        Ok(Collection::new(job.into_results()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;
    use serde_json::json;

    fn rows() -> Collection {
        Collection::from_values(vec![
            json!({"id": 1, "name": "foo", "parent_id": 10}),
            json!({"id": 2, "name": "bar", "parent_id": 11}),
            json!({"id": 3, "name": "baz", "parent_id": 10}),
        ])
    }

    #[test]
    fn group_by_keeps_first_seen_order() {
        let grouped = rows().group_by("parent_id");
        assert_eq!(
            grouped.to_json_value(),
            json!({
                "10": [
                    {"id": 1, "name": "foo", "parent_id": 10},
                    {"id": 3, "name": "baz", "parent_id": 10}
                ],
                "11": [{"id": 2, "name": "bar", "parent_id": 11}]
            })
        );
    }

    #[test]
    fn group_by_then_unfold_restores_every_element() {
        let mut regrouped: Vec<_> = rows().group_by("parent_id").unfold().to_list();
        regrouped.sort_by_key(|v| v["id"].as_i64());
        assert_eq!(regrouped, rows().to_list());
    }

    #[test]
    fn index_by_keeps_the_last_element() {
        let indexed = rows().index_by("parent_id").to_array(true);
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed[0].0, Key::Int(10));
        assert_eq!(indexed[0].1["name"], "baz");
    }

    #[test]
    fn count_by_with_a_function() {
        let counts = rows().count_by(Extractor::func(|v, _| {
            json!(if v["id"].as_i64().unwrap_or(0) % 2 == 0 { "even" } else { "odd" })
        }));
        assert_eq!(counts.to_json_value(), json!({"odd": 2, "even": 1}));
    }

    #[test]
    fn combine_and_combine_grouped() {
        assert_eq!(
            rows().combine("id", "name").to_json_value(),
            json!({"1": "foo", "2": "bar", "3": "baz"})
        );
        assert_eq!(
            rows().combine_grouped("id", "name", "parent_id").to_json_value(),
            json!({"10": {"1": "foo", "3": "baz"}, "11": {"2": "bar"}})
        );
    }

    #[test]
    fn combine_grouped_is_last_write_wins() {
        let rows = Collection::from_values(vec![
            json!({"k": "a", "v": 1, "g": "x"}),
            json!({"k": "b", "v": 2, "g": "x"}),
            json!({"k": "a", "v": 3, "g": "x"}),
        ]);
        assert_eq!(
            rows.combine_grouped("k", "v", "g").to_json_value(),
            json!({"x": {"a": 3, "b": 2}})
        );
    }

    #[test]
    fn map_reduce_runs_eagerly_and_surfaces_configuration_errors() {
        let lengths = rows()
            .map_reduce(
                |v, _, e| e.emit_intermediate(v["name"].clone(), Key::from_value(&v["parent_id"])),
                |names, group, e| e.emit(json!(names.len()), Some(group.clone())),
            )
            .unwrap();
        assert_eq!(lengths.to_json_value(), json!({"10": 2, "11": 1}));

        let err = rows()
            .map_only(|v, _, e| e.emit_intermediate(v.clone(), Key::Int(0)))
            .unwrap_err();
        assert!(matches!(err, CollectionError::Configuration { .. }));

        let direct = rows().map_only(|v, _, e| e.emit(v["name"].clone(), None)).unwrap();
        assert_eq!(direct.to_list(), vec![json!("foo"), json!("bar"), json!("baz")]);
    }
}
