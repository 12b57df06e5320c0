//! Core data model types shared by every pipeline stage.
//!
//! Elements are [`Value`]s (JSON-like values with insertion-ordered objects). Each element is
//! paired with a [`Key`], which behaves like an associative-array key: integers stay integers,
//! canonical decimal strings are normalized to integers, and everything else is a string.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
pub use serde_json::{Map, Value};

/// A key/value pair produced by a pipeline pass.
pub type Entry = (Key, Value);

/// Key attached to each element of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Integer key (positional keys are integers).
    Int(i64),
    /// String key.
    Str(String),
}

impl Key {
    /// Key for position `index` in a list.
    pub fn positional(index: usize) -> Self {
        Self::Int(i64::try_from(index).unwrap_or(i64::MAX))
    }

    /// Convert an arbitrary value into a key using associative-array rules.
    ///
    /// - integers stay integers, floats are truncated
    /// - canonical decimal strings (`"10"`, `"-3"`) become integers
    /// - booleans become `0`/`1`, `null` becomes the empty string
    /// - arrays and objects use their JSON text
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Str(String::new()),
            Value::Bool(b) => Self::Int(i64::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() && f.abs() < 9.2e18 => Self::Int(f.trunc() as i64),
                        _ => Self::Str(n.to_string()),
                    }
                }
            }
            Value::String(s) => Self::from(s.as_str()),
            composite => Self::Str(composite.to_string()),
        }
    }

    /// Key as a value (integer or string).
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Str(s) => Value::String(s.clone()),
        }
    }

    /// `0`, `""` and `"0"` are "empty" keys.
    pub fn is_empty_like(&self) -> bool {
        match self {
            Self::Int(i) => *i == 0,
            Self::Str(s) => s.is_empty() || s == "0",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Self::positional(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        match canonical_int(value) {
            Some(i) => Self::Int(i),
            None => Self::Str(value.to_owned()),
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        match canonical_int(&value) {
            Some(i) => Self::Int(i),
            None => Self::Str(value),
        }
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if (digits.len() > 1 && digits.starts_with('0')) || s == "-0" {
        return None;
    }
    s.parse().ok()
}

/// How caller-supplied values are compared against extracted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityMode {
    /// Type and value must both match (`1` does not equal `"1"` or `1.0`).
    Strict,
    /// Type-juggling equality: numeric strings compare numerically, booleans and nulls
    /// compare by truthiness, composites compare element-wise.
    Loose,
}

impl EqualityMode {
    /// Compare two values under this mode.
    pub fn values_equal(self, a: &Value, b: &Value) -> bool {
        match self {
            Self::Strict => a == b,
            Self::Loose => loose_eq(a, b),
        }
    }
}

/// Sort direction for [`crate::Collection::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first (default).
    #[default]
    Descending,
}

/// How sort keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortType {
    /// Compare numerically after numeric coercion (default).
    #[default]
    Numeric,
    /// Compare the string forms lexically.
    String,
}

/// Result of numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
}

impl Number {
    /// Numeric value as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Convert back into a [`Value`]. Non-finite floats become `null`.
    pub fn to_value(self) -> Value {
        match self {
            Self::Int(i) => Value::from(i),
            Self::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl std::ops::Add for Number {
    type Output = Number;

    /// Integer addition that overflows into floating point.
    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map(Self::Int)
                .unwrap_or(Self::Float(a as f64 + b as f64)),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }
}

/// Generic truthiness: `null`, `false`, `0`, `0.0`, `""`, `"0"`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Arrays and objects can be traversed; everything else is a scalar.
pub fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Entries of a composite value in its own order, or `None` for scalars.
pub fn composite_entries(value: &Value) -> Option<Vec<Entry>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (Key::positional(i), v.clone()))
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, v)| (Key::from(k.as_str()), v.clone()))
                .collect(),
        ),
        _ => None,
    }
}

/// Build a JSON value from entries: an array when the keys are exactly `0..n` in order,
/// an object otherwise.
pub fn entries_to_value(entries: Vec<Entry>) -> Value {
    let positional = entries
        .iter()
        .enumerate()
        .all(|(i, (k, _))| *k == Key::positional(i));
    if positional {
        Value::Array(entries.into_iter().map(|(_, v)| v).collect())
    } else {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

/// Coerce any value to a number.
///
/// Strings contribute their leading numeric prefix (`"12abc"` is `12`, `"abc"` is `0`),
/// booleans are `0`/`1`, everything else is `0`.
pub fn to_number(value: &Value) -> Number {
    match value {
        Value::Bool(b) => Number::Int(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Number::Int(i),
            None => Number::Float(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => numeric_prefix(s).0,
        _ => Number::Int(0),
    }
}

/// Whether the whole string (ignoring surrounding whitespace) is a number.
pub fn is_numeric_str(s: &str) -> bool {
    let trimmed = s.trim();
    let (_, consumed) = numeric_prefix(trimmed);
    !trimmed.is_empty() && consumed == trimmed.len()
}

// Returns the parsed prefix and the number of bytes it spans (0 when there are no digits).
fn numeric_prefix(raw: &str) -> (Number, usize) {
    let s = raw.trim_start();
    let offset = raw.len() - s.len();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    let mut is_float = false;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
            is_float = true;
        }
    }
    if digits == 0 {
        return (Number::Int(0), 0);
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
            is_float = true;
        }
    }

    let text = &s[..end];
    if !is_float {
        if let Ok(i) = text.parse::<i64>() {
            return (Number::Int(i), offset + end);
        }
    }
    match text.parse::<f64>() {
        Ok(f) => (Number::Float(f), offset + end),
        Err(_) => (Number::Int(0), 0),
    }
}

/// Type-juggling equality.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == is_truthy(other),
        (Value::Null, Value::Null) => true,
        (Value::Null, other) | (other, Value::Null) => match other {
            Value::String(s) => s.is_empty(),
            Value::Number(_) => to_number(other).as_f64() == 0.0,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        },
        (Value::Number(_), Value::Number(_)) => numbers_eq(to_number(a), to_number(b)),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            if is_numeric_str(s) {
                numbers_eq(to_number(a), to_number(b))
            } else {
                n.to_string() == *s
            }
        }
        (Value::String(x), Value::String(y)) => {
            if is_numeric_str(x) && is_numeric_str(y) {
                numbers_eq(to_number(a), to_number(b))
            } else {
                x == y
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| loose_eq(l, r)))
        }
        _ => false,
    }
}

fn numbers_eq(a: Number, b: Number) -> bool {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x == y,
        (x, y) => x.as_f64() == y.as_f64(),
    }
}

/// String form used for lexical comparison.
pub fn string_form(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::Bool(false) => Cow::Borrowed(""),
        Value::Number(n) => Cow::Owned(n.to_string()),
        composite => Cow::Owned(composite.to_string()),
    }
}

/// Compare two sort keys under `sort_type` (ascending order).
pub fn compare(a: &Value, b: &Value, sort_type: SortType) -> Ordering {
    match sort_type {
        SortType::Numeric => match (to_number(a), to_number(b)) {
            (Number::Int(x), Number::Int(y)) => x.cmp(&y),
            (x, y) => x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal),
        },
        SortType::String => string_form(a).cmp(&string_form(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_normalize_canonical_integer_strings() {
        assert_eq!(Key::from("10"), Key::Int(10));
        assert_eq!(Key::from("-3"), Key::Int(-3));
        assert_eq!(Key::from("010"), Key::Str("010".to_string()));
        assert_eq!(Key::from("-0"), Key::Str("-0".to_string()));
        assert_eq!(Key::from("a"), Key::Str("a".to_string()));
    }

    #[test]
    fn keys_from_values_follow_array_key_rules() {
        assert_eq!(Key::from_value(&json!(7)), Key::Int(7));
        assert_eq!(Key::from_value(&json!(7.9)), Key::Int(7));
        assert_eq!(Key::from_value(&json!(true)), Key::Int(1));
        assert_eq!(Key::from_value(&Value::Null), Key::Str(String::new()));
        assert_eq!(Key::from_value(&json!("42")), Key::Int(42));
        assert_eq!(Key::from_value(&json!([1])), Key::Str("[1]".to_string()));
    }

    #[test]
    fn truthiness_matches_generic_rules() {
        let falsy_values = [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ];
        for falsy in falsy_values {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        let truthy_values =
            [json!(true), json!(1), json!(-0.5), json!("a"), json!([0]), json!({"a": null})];
        for truthy in truthy_values {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn numeric_coercion_uses_leading_prefix() {
        assert_eq!(to_number(&json!("12abc")), Number::Int(12));
        assert_eq!(to_number(&json!("abc")), Number::Int(0));
        assert_eq!(to_number(&json!(" 2.5e1x")), Number::Float(25.0));
        assert_eq!(to_number(&json!(true)), Number::Int(1));
        assert_eq!(to_number(&json!([1, 2])), Number::Int(0));
    }

    #[test]
    fn integer_addition_overflows_into_float() {
        let sum = Number::Int(i64::MAX) + Number::Int(1);
        assert!(matches!(sum, Number::Float(_)));
        assert_eq!(Number::Int(2) + Number::Float(0.5), Number::Float(2.5));
    }

    #[test]
    fn loose_equality_juggles_types() {
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!("1.0"), &json!("1")));
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!(null), &json!(false)));
        assert!(loose_eq(&json!(null), &json!(0)));
        assert!(!loose_eq(&json!(null), &json!("0")));
        assert!(loose_eq(&json!(true), &json!("yes")));
        assert!(!loose_eq(&json!(1), &json!("1abc")));
        assert!(loose_eq(&json!({"a": 1}), &json!({"a": "1"})));
    }

    #[test]
    fn strict_equality_requires_same_type() {
        assert!(!EqualityMode::Strict.values_equal(&json!(1), &json!("1")));
        assert!(!EqualityMode::Strict.values_equal(&json!(1), &json!(1.0)));
        assert!(EqualityMode::Strict.values_equal(&json!("a"), &json!("a")));
    }

    #[test]
    fn compare_by_sort_type() {
        assert_eq!(compare(&json!(10), &json!(9), SortType::Numeric), Ordering::Greater);
        assert_eq!(compare(&json!("10"), &json!("9"), SortType::String), Ordering::Less);
        assert_eq!(compare(&json!("2.5"), &json!(2), SortType::Numeric), Ordering::Greater);
    }

    #[test]
    fn entries_become_array_only_when_positional() {
        let list = vec![(Key::Int(0), json!("a")), (Key::Int(1), json!("b"))];
        assert_eq!(entries_to_value(list), json!(["a", "b"]));

        let keyed = vec![(Key::Int(1), json!("a")), (Key::from("x"), json!("b"))];
        assert_eq!(entries_to_value(keyed), json!({"1": "a", "x": "b"}));
    }
}
