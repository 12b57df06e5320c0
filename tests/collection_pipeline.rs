use std::cell::Cell;
use std::rc::Rc;

use lazy_collection::{Collection, CollectionError, Key, Matcher, SortDirection, SortType};
use serde_json::{json, Value};

fn items() -> Collection {
    Collection::from_values(vec![
        json!({"id": 1, "name": "foo", "parent_id": 10}),
        json!({"id": 2, "name": "bar", "parent_id": 11}),
        json!({"id": 3, "name": "baz", "parent_id": 10}),
    ])
}

fn counted_stream(pulled: Rc<Cell<usize>>, n: usize) -> Collection {
    Collection::from_stream((0..n).map(move |i| {
        pulled.set(pulled.get() + 1);
        (Key::positional(i), json!(i))
    }))
}

#[test]
fn each_visits_every_element_in_order() {
    let c = Collection::from_value(json!({"a": 1, "b": 2, "c": 3})).unwrap();
    let mut seen = Vec::new();
    c.each(|v, k| seen.push((k.clone(), v.clone())));
    assert_eq!(
        seen,
        vec![
            (Key::from("a"), json!(1)),
            (Key::from("b"), json!(2)),
            (Key::from("c"), json!(3)),
        ]
    );
}

#[test]
fn filter_without_callback_drops_falsy_values() {
    let c = Collection::from_values(vec![
        json!(1),
        json!(null),
        json!(0),
        json!(""),
        json!(false),
        json!("a"),
        json!([]),
    ]);
    assert_eq!(c.filter_truthy().to_list(), vec![json!(1), json!("a")]);
}

#[test]
fn filter_and_reject_partition_the_input() {
    let c = Collection::from_values((1..=10).map(|i| json!(i)).collect());
    let even = |v: &Value, _: &Key| v.as_i64().is_some_and(|n| n % 2 == 0);
    let kept = c.filter(even).to_list();
    let rejected = c.reject(even).to_list();
    assert_eq!(kept, vec![json!(2), json!(4), json!(6), json!(8), json!(10)]);
    assert_eq!(rejected, vec![json!(1), json!(3), json!(5), json!(7), json!(9)]);
}

#[test]
fn filter_keeps_original_keys() {
    let c = Collection::from_value(json!({"a": 1, "b": 2, "c": 3})).unwrap();
    let out = c.filter(|v, _| v != &json!(2)).to_array(true);
    assert_eq!(out, vec![(Key::from("a"), json!(1)), (Key::from("c"), json!(3))]);
}

#[test]
fn every_and_some_stop_early() {
    let pulled = Rc::new(Cell::new(0));
    let c = counted_stream(Rc::clone(&pulled), 10);
    assert!(!c.every(|v, _| v.as_i64().is_some_and(|n| n < 2)));
    assert_eq!(pulled.get(), 3);

    let pulled = Rc::new(Cell::new(0));
    let c = counted_stream(Rc::clone(&pulled), 10);
    assert!(c.some(|v, _| v == &json!(4)));
    assert_eq!(pulled.get(), 5);

    assert!(Collection::empty().every(|_, _| false));
    assert!(!Collection::empty().some(|_, _| true));
}

#[test]
fn contains_uses_strict_equality() {
    let c = Collection::from_values(vec![json!(1), json!("2"), json!(null)]);
    assert!(c.contains(&json!(1)));
    assert!(c.contains(&json!("2")));
    assert!(!c.contains(&json!(2)));
    assert!(!c.contains(&json!(false)));
}

#[test]
fn map_composition_matches_a_single_map() {
    let c = Collection::from_values((1..=5).map(|i| json!(i)).collect());
    let twice = c
        .map(|v, _| json!(v.as_i64().unwrap_or(0) + 1))
        .map(|v, _| json!(v.as_i64().unwrap_or(0) * 3));
    let once = c.map(|v, _| json!((v.as_i64().unwrap_or(0) + 1) * 3));
    assert_eq!(twice.to_array(true), once.to_array(true));
}

#[test]
fn reduce_with_and_without_seed() {
    let c = Collection::from_values(vec![json!(1), json!(2), json!(3), json!(4)]);
    let add = |acc: Value, v: &Value, _: &Key| {
        json!(acc.as_i64().unwrap_or(0) + v.as_i64().unwrap_or(0))
    };

    assert_eq!(c.reduce(add, Some(json!(10))), Some(json!(20)));
    assert_eq!(c.reduce(add, None), Some(json!(10)));
    assert_eq!(Collection::empty().reduce(add, Some(json!("seed"))), Some(json!("seed")));
    assert_eq!(Collection::empty().reduce(add, None), None);
}

#[test]
fn sort_by_strings_and_numbers() {
    let c = Collection::from_values(vec![
        json!({"name": "b", "n": 10}),
        json!({"name": "c", "n": 9}),
        json!({"name": "a", "n": 100}),
    ]);
    let by_name = c.sort_by("name", SortDirection::Ascending, SortType::String);
    assert_eq!(by_name.extract("name").to_list(), vec![json!("a"), json!("b"), json!("c")]);

    let by_n = c.sort_by("n", SortDirection::Descending, SortType::Numeric);
    assert_eq!(by_n.extract("n").to_list(), vec![json!(100), json!(10), json!(9)]);

    let lexical = c.sort_by("n", SortDirection::Ascending, SortType::String);
    assert_eq!(lexical.extract("n").to_list(), vec![json!(10), json!(100), json!(9)]);
}

#[test]
fn max_and_min_by_path() {
    let c = Collection::from_values(vec![
        json!({"a": {"b": 4}}),
        json!({"a": {"b": 10}}),
        json!({"a": {"b": -1}}),
    ]);
    assert_eq!(c.max("a.b", SortType::Numeric), Some(json!({"a": {"b": 10}})));
    assert_eq!(c.min("a.b", SortType::Numeric), Some(json!({"a": {"b": -1}})));
    assert_eq!(Collection::empty().max("a", SortType::Numeric), None);
}

#[test]
fn shuffle_and_sample_keep_the_elements() {
    let c = Collection::from_values((0..20).map(|i| json!(i)).collect());
    let mut shuffled = c.shuffle().to_list();
    shuffled.sort_by_key(|v| v.as_i64());
    assert_eq!(shuffled, c.to_list());

    let sample = c.sample(5).to_list();
    assert_eq!(sample.len(), 5);
    assert!(sample.iter().all(|v| c.contains(v)));
    assert_eq!(c.sample(50).to_list().len(), 20);
}

#[test]
fn to_array_and_to_list() {
    let c = Collection::from_value(json!({"a": 1, "b": 2})).unwrap();
    assert_eq!(
        c.to_array(true),
        vec![(Key::from("a"), json!(1)), (Key::from("b"), json!(2))]
    );
    assert_eq!(
        c.to_array(false),
        vec![(Key::Int(0), json!(1)), (Key::Int(1), json!(2))]
    );
    assert_eq!(c.to_list(), vec![json!(1), json!(2)]);
    assert_eq!(c.to_json_value(), json!({"a": 1, "b": 2}));
}

#[test]
fn scalars_are_rejected_by_the_constructor() {
    let err = Collection::from_value(json!(7)).unwrap_err();
    assert!(matches!(err, CollectionError::InvalidInput { .. }));
    assert!(Collection::try_from(json!("x")).is_err());
}

#[test]
fn counting_a_live_pipeline_is_a_usage_error() {
    let err = items().filter(|_, _| true).count().unwrap_err();
    assert!(matches!(err, CollectionError::Usage { .. }));
    assert_eq!(items().to_array(true).len(), 3);
}

#[test]
fn take_and_skip_keep_keys() {
    let c = Collection::from_values((1..=6).map(|i| json!(i)).collect());
    assert_eq!(
        c.take(2, 0).to_array(true),
        vec![(Key::Int(0), json!(1)), (Key::Int(1), json!(2))]
    );
    assert_eq!(
        c.take(2, 3).to_array(true),
        vec![(Key::Int(3), json!(4)), (Key::Int(4), json!(5))]
    );
    assert_eq!(c.take(10, 5).to_list(), vec![json!(6)]);
    assert_eq!(c.skip(4).to_list(), vec![json!(5), json!(6)]);
    assert!(c.skip(10).is_empty());
}

#[test]
fn matching_uses_loose_equality_over_paths() {
    let c = Collection::from_values(vec![
        json!({"id": 1, "name": "foo", "thing": {"parent_id": 10}}),
        json!({"id": 2, "name": "bar", "thing": {"parent_id": 11}}),
        json!({"id": 3, "name": "baz", "thing": {"parent_id": 10}}),
    ]);
    let ids = c
        .matching(Matcher::loose().with("thing.parent_id", "10"))
        .extract("id")
        .to_list();
    assert_eq!(ids, vec![json!(1), json!(3)]);

    let strict = c.matching(Matcher::strict().with("thing.parent_id", "10"));
    assert!(strict.is_empty());

    let both = Matcher::loose().with("thing.parent_id", 10).with("name", "baz");
    assert_eq!(c.first_match(&both), Some(c.to_list()[2].clone()));
    assert_eq!(c.first_match(&Matcher::loose().with("name", "nope")), None);
}

#[test]
fn append_overwrites_by_key_but_lists_keep_everything() {
    let a = Collection::from_values(vec![json!(1), json!(2)]);
    let b = Collection::from_values(vec![json!(3), json!(4), json!(5)]);
    let joined = a.append(b);
    assert_eq!(
        joined.to_array(true),
        vec![(Key::Int(0), json!(3)), (Key::Int(1), json!(4)), (Key::Int(2), json!(5))]
    );
    assert_eq!(
        joined.to_list(),
        vec![json!(1), json!(2), json!(3), json!(4), json!(5)]
    );

    let keyed = Collection::from_value(json!({"a": 1})).unwrap().append(vec![json!(9)]);
    assert_eq!(keyed.to_json_value(), json!({"a": 1, "0": 9}));
}

#[test]
fn compile_runs_side_effects_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let c = Collection::from_values(vec![json!(1), json!(2), json!(3)]).map(move |v, _| {
        counter.set(counter.get() + 1);
        v.clone()
    });
    let compiled = c.compile(true);
    assert_eq!(calls.get(), 3);
    assert_eq!(compiled.to_array(true), compiled.to_array(true));
    assert_eq!(calls.get(), 3);
}

#[test]
fn buffered_streams_can_be_replayed() {
    let pulled = Rc::new(Cell::new(0));
    let buffered = counted_stream(Rc::clone(&pulled), 4).buffered();
    assert_eq!(pulled.get(), 0);
    assert_eq!(buffered.to_list(), vec![json!(0), json!(1), json!(2), json!(3)]);
    assert_eq!(buffered.to_list().len(), 4);
    assert_eq!(pulled.get(), 4);
}

#[test]
fn unbuffered_streams_are_single_pass() {
    let c = Collection::from_stream((0..3).map(|i| (Key::positional(i), json!(i))));
    assert_eq!(c.to_list().len(), 3);
    assert!(c.to_list().is_empty());
}

#[test]
fn combine_builds_keyed_results() {
    let c = Collection::from_values(vec![
        json!({"id": 1, "name": "foo", "parent": "a"}),
        json!({"id": 2, "name": "bar", "parent": "b"}),
        json!({"id": 3, "name": "baz", "parent": "a"}),
    ]);
    assert_eq!(
        c.combine("id", "name").to_json_value(),
        json!({"1": "foo", "2": "bar", "3": "baz"})
    );
    assert_eq!(
        c.combine("name", "id").to_json_value(),
        json!({"foo": 1, "bar": 2, "baz": 3})
    );
    assert_eq!(
        c.combine_grouped("id", "name", "parent").to_json_value(),
        json!({"a": {"1": "foo", "3": "baz"}, "b": {"2": "bar"}})
    );
    assert_eq!(
        c.combine("id", "crazy").to_json_value(),
        json!({"1": null, "2": null, "3": null})
    );
}

#[test]
fn combine_accepts_functions() {
    use lazy_collection::Extractor;

    let c = Collection::from_values(vec![
        json!({"id": 1, "name": "foo"}),
        json!({"id": 2, "name": "bar"}),
    ]);
    let out = c.combine_grouped(
        Extractor::func(|v, k| json!(format!("{}-{k}", v["name"].as_str().unwrap_or("")))),
        Extractor::func(|v, k| json!(format!("{k}-{}", v["name"].as_str().unwrap_or("")))),
        Extractor::func(|v, k| json!(format!("{k}-{}", v["id"]))),
    );
    assert_eq!(
        out.to_json_value(),
        json!({"0-1": {"foo-0": "0-foo"}, "1-2": {"bar-1": "1-bar"}})
    );
}

#[test]
fn insert_writes_values_at_a_path() {
    let c = Collection::from_values(vec![
        json!({"a": 1, "b": {"c": 1}}),
        json!({"a": 2}),
        json!({"a": 3, "b": {"c": 3}}),
        json!({"a": 4, "b": {"c": 4}}),
    ]);
    let out = c.insert("b.d", vec![json!("x"), json!("y"), json!("z")]).to_list();
    assert_eq!(
        out,
        vec![
            json!({"a": 1, "b": {"c": 1, "d": "x"}}),
            json!({"a": 2}),
            json!({"a": 3, "b": {"c": 3, "d": "z"}}),
            json!({"a": 4, "b": {"c": 4}}),
        ]
    );
}

#[test]
fn sum_of_values_and_paths() {
    let c = Collection::from_values(vec![
        json!({"invoice": {"total": 100}}),
        json!({"invoice": {"total": 200}}),
    ]);
    assert_eq!(c.sum_of("invoice.total"), json!(300));
    assert_eq!(
        Collection::from_values(vec![json!(1), json!(2.5), json!("3")]).sum(),
        json!(6.5)
    );
    assert_eq!(Collection::empty().sum(), json!(0));
}

#[test]
fn stop_when_excludes_the_triggering_element() {
    let c = Collection::from_values((1..=8).map(|i| json!(i)).collect());
    assert_eq!(
        c.stop_when(|v, _| v.as_i64().is_some_and(|n| n > 3)).to_list(),
        vec![json!(1), json!(2), json!(3)]
    );

    let rows = Collection::from_values(vec![
        json!({"foo": "bar"}),
        json!({"foo": "baz"}),
        json!({"foo": "qux"}),
    ]);
    let stopped = rows.stop_when_matches(Matcher::loose().with("foo", "baz"));
    assert_eq!(stopped.to_list(), vec![json!({"foo": "bar"})]);
}

#[test]
fn unfold_flattens_one_level() {
    let c = Collection::from_values(vec![json!([1, 2, 3]), json!([4, 5]), json!(6), json!([])]);
    assert_eq!(
        c.unfold().to_list(),
        vec![json!(1), json!(2), json!(3), json!(4), json!(5), json!(6)]
    );
    // Keys repeat across branches, so keyed materialization renumbers.
    assert_eq!(c.unfold().to_array(true).len(), 6);

    let doubled = Collection::from_values(vec![json!(1), json!(2)])
        .unfold_with(|v, _| json!([v.clone(), v.clone()]))
        .to_list();
    assert_eq!(doubled, vec![json!(1), json!(1), json!(2), json!(2)]);
}

#[test]
fn through_passes_the_collection() {
    let c = Collection::from_values(vec![json!(1), json!(2), json!(3)]);
    let reversed = c.through(|inner| {
        let mut values = inner.to_list();
        values.reverse();
        values
    });
    assert_eq!(reversed.to_list(), vec![json!(3), json!(2), json!(1)]);

    let same = c.through(|inner| inner.filter(|_, _| true));
    assert_eq!(same.to_list(), c.to_list());
}

#[test]
fn is_empty_and_first_do_not_consume_streams() {
    assert!(Collection::empty().is_empty());
    let c = Collection::from_stream((0..3).map(|i| (Key::positional(i), json!(i))));
    assert!(!c.is_empty());
    assert_eq!(c.first(), Some(json!(0)));
    assert_eq!(c.to_list(), vec![json!(0), json!(1), json!(2)]);
}

#[test]
fn last_with_and_without_known_length() {
    let c = Collection::from_values(vec![json!(1), json!(2), json!(3)]);
    assert_eq!(c.last(), Some(json!(3)));
    assert_eq!(c.filter(|v, _| v != &json!(3)).last(), Some(json!(2)));
    assert_eq!(Collection::empty().last(), None);
    assert_eq!(c.skip(3).last(), None);
}

#[test]
fn chunk_batches_values() {
    let c = Collection::from_values((1..=5).map(|i| json!(i)).collect());
    assert_eq!(
        c.chunk(2).to_list(),
        vec![json!([1, 2]), json!([3, 4]), json!([5])]
    );
    assert_eq!(
        c.chunk_with_keys(2, true).to_list(),
        vec![json!([1, 2]), json!({"2": 3, "3": 4}), json!({"4": 5})]
    );
    assert_eq!(c.chunk_with_keys(2, false).to_list(), c.chunk(2).to_list());

    let keyed = Collection::from_value(json!({"a": 1, "b": 2, "c": 3})).unwrap();
    assert_eq!(
        keyed.chunk_with_keys(2, true).to_list(),
        vec![json!({"a": 1, "b": 2}), json!({"c": 3})]
    );
}

#[test]
fn zip_stops_at_the_shortest_source() {
    let a = Collection::from_values(vec![json!(1), json!(2), json!(3)]);
    let b = Collection::from_values(vec![json!(4), json!(5)]);
    assert_eq!(
        a.zip([b.clone()]).to_list(),
        vec![json!([1, 4]), json!([2, 5])]
    );
    let sums = a.zip_with([b], |vs| {
        json!(vs.iter().filter_map(Value::as_i64).sum::<i64>())
    });
    assert_eq!(sums.to_list(), vec![json!(5), json!(7)]);
}

#[test]
fn facades_unwrap_to_the_innermost_node() {
    let inner = Collection::from_values(vec![json!(1)]);
    let wrapped = Collection::wrap(Collection::wrap(inner));
    assert_eq!(wrapped.unwrap().name(), "materialized");
    assert_eq!(wrapped.map(|v, _| v.clone()).to_list(), vec![json!(1)]);
}
