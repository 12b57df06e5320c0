use crate::path::PropertyPath;
use crate::types::{EqualityMode, Value};

/// A set of `path == expected` conditions.
///
/// An element matches when every path resolves to a value equal to its expected value
/// under the matcher's [`EqualityMode`]. A matcher with no conditions matches everything.
///
/// ```rust
/// use lazy_collection::{EqualityMode, Matcher};
/// use serde_json::json;
///
/// let m = Matcher::new(EqualityMode::Loose).with("user.id", 7);
/// assert!(m.matches(&json!({"user": {"id": "7"}})));
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    mode: EqualityMode,
    conditions: Vec<(PropertyPath, Value)>,
}

impl Matcher {
    pub fn new(mode: EqualityMode) -> Self {
        Self {
            mode,
            conditions: Vec::new(),
        }
    }

    /// Loose (type-juggling) matcher.
    pub fn loose() -> Self {
        Self::new(EqualityMode::Loose)
    }

    /// Strict (type and value) matcher.
    pub fn strict() -> Self {
        Self::new(EqualityMode::Strict)
    }

    /// Add a condition.
    pub fn with(mut self, path: &str, expected: impl Into<Value>) -> Self {
        self.conditions
            .push((PropertyPath::parse(path), expected.into()));
        self
    }

    /// Build from `(path, expected)` pairs.
    pub fn from_conditions<I, P, V>(mode: EqualityMode, conditions: I) -> Self
    where
        I: IntoIterator<Item = (P, V)>,
        P: AsRef<str>,
        V: Into<Value>,
    {
        conditions
            .into_iter()
            .fold(Self::new(mode), |m, (p, v)| m.with(p.as_ref(), v))
    }

    pub fn mode(&self) -> EqualityMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, element: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(path, expected)| self.mode.values_equal(&path.resolve(element), expected))
    }
}
