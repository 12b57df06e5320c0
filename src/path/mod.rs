//! Property paths: dot-separated lookups into nested values.
//!
//! A path such as `user.address.city` is compiled into a list of [`Segment`]s and resolved
//! against one element at a time. Array elements are addressed by their index (`items.0.id`).
//!
//! The wildcard segment `{*}` fans out over a composite value: everything after the wildcard
//! is extracted from each child through a nested [`Collection`], and the results are
//! flattened one level into the caller's sequence.
//!
//! ```rust
//! use lazy_collection::path::PropertyPath;
//! use serde_json::json;
//!
//! let path = PropertyPath::parse("a.{*}.id");
//! let row = json!({"a": [{"id": 1}, {"id": 2}]});
//! assert_eq!(path.resolve(&row), json!([1, 2]));
//! ```

mod matcher;

use std::fmt;
use std::rc::Rc;

use crate::collection::Collection;
use crate::types::{is_composite, Key, Value};

pub use matcher::Matcher;

/// Default segment separator.
pub const SEPARATOR: char = '.';

/// Default wildcard token.
pub const WILDCARD: &str = "{*}";

/// Tokens used when compiling a path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSyntax {
    /// Segment separator.
    pub separator: char,
    /// Segment text that acts as the wildcard.
    pub wildcard: String,
}

impl Default for PathSyntax {
    fn default() -> Self {
        Self {
            separator: SEPARATOR,
            wildcard: WILDCARD.to_string(),
        }
    }
}

/// One compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal key (object field or array index).
    Field(String),
    /// Fan out over every child of the current composite.
    Wildcard,
}

/// A compiled property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    expression: String,
    syntax: PathSyntax,
    segments: Vec<Segment>,
}

impl PropertyPath {
    /// Compile `expression` with the default syntax (`.` and `{*}`).
    pub fn parse(expression: &str) -> Self {
        Self::parse_with(expression, &PathSyntax::default())
    }

    /// Compile `expression` with a custom separator/wildcard.
    pub fn parse_with(expression: &str, syntax: &PathSyntax) -> Self {
        let segments = expression
            .split(syntax.separator)
            .map(|part| {
                if part == syntax.wildcard {
                    Segment::Wildcard
                } else {
                    Segment::Field(part.to_owned())
                }
            })
            .collect();
        Self {
            expression: expression.to_owned(),
            syntax: syntax.clone(),
            segments,
        }
    }

    /// The original path text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Compiled segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any segment is the wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Wildcard))
    }

    /// Resolve the path against `element`.
    ///
    /// Missing segments (or lookups into scalars) yield `null`. For wildcard paths the result
    /// is an array holding the flattened fan-out, or `null` when the wildcard lands on a scalar.
    pub fn resolve(&self, element: &Value) -> Value {
        if self.has_wildcard() {
            self.resolve_wildcard(element)
        } else {
            self.resolve_simple(element).cloned().unwrap_or(Value::Null)
        }
    }

    fn resolve_simple<'a>(&self, element: &'a Value) -> Option<&'a Value> {
        let mut current = element;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => current = lookup(current, name)?,
                Segment::Wildcard => return None,
            }
        }
        Some(current)
    }

    fn resolve_wildcard(&self, element: &Value) -> Value {
        let mut current = element;
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) => match lookup(current, name) {
                    Some(next) => current = next,
                    None => return Value::Null,
                },
                Segment::Wildcard => {
                    if !is_composite(current) {
                        return Value::Null;
                    }
                    if i + 1 == self.segments.len() {
                        return current.clone();
                    }
                    let rest = self.suffix(i + 1);
                    return match Collection::from_value(current.clone()) {
                        Ok(nested) => Value::Array(nested.extract(rest).to_list()),
                        Err(_) => Value::Null,
                    };
                }
            }
        }
        current.clone()
    }

    // Path made of the segments from `start` on, rejoined with this path's separator.
    fn suffix(&self, start: usize) -> PropertyPath {
        let segments = self.segments[start..].to_vec();
        let expression = segments
            .iter()
            .map(|s| match s {
                Segment::Field(name) => name.as_str(),
                Segment::Wildcard => self.syntax.wildcard.as_str(),
            })
            .collect::<Vec<_>>()
            .join(&self.syntax.separator.to_string());
        PropertyPath {
            expression,
            syntax: self.syntax.clone(),
            segments,
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

// Explicit nulls count as missing.
fn lookup<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    let next = match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }?;
    (!next.is_null()).then_some(next)
}

/// Signature of caller-supplied extraction functions.
pub type ExtractFn = dyn Fn(&Value, &Key) -> Value;

/// Either a compiled path or a caller-supplied function, used wherever an operation needs to
/// pull one value out of each element.
#[derive(Clone)]
pub enum Extractor {
    /// Dot path, compiled once per call.
    Path(PropertyPath),
    /// Function used as-is.
    Func(Rc<ExtractFn>),
}

impl Extractor {
    /// Wrap a function `(value, key) -> extracted`.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value, &Key) -> Value + 'static,
    {
        Self::Func(Rc::new(f))
    }

    /// Extract from one element.
    pub fn extract(&self, value: &Value, key: &Key) -> Value {
        match self {
            Self::Path(path) => path.resolve(value),
            Self::Func(f) => f(value, key),
        }
    }

    /// Whether extraction fans out and must be flattened afterwards.
    pub fn flattens(&self) -> bool {
        matches!(self, Self::Path(path) if path.has_wildcard())
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(&path.expression()).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Extractor {
    fn from(path: &str) -> Self {
        Self::Path(PropertyPath::parse(path))
    }
}

impl From<String> for Extractor {
    fn from(path: String) -> Self {
        Self::Path(PropertyPath::parse(&path))
    }
}

impl From<&String> for Extractor {
    fn from(path: &String) -> Self {
        Self::Path(PropertyPath::parse(path))
    }
}

impl From<PropertyPath> for Extractor {
    fn from(path: PropertyPath) -> Self {
        Self::Path(path)
    }
}
