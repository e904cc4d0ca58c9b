//! The ambient parameter map.
//!
//! `Params` is the host-owned mapping of pagination/sort/filter/search
//! state (typically synced to a URL or config by the host). The library
//! never mutates the host's copy: interactions produce a merged copy via
//! [`Params::merged`] and hand it to the `on_param_change` callback; the
//! host decides what to do with it and passes new params back down.

use serde_json::{Map, Value};

use crate::widgets::pagination::DEFAULT_LIMIT;

/// Param key holding the current page (1-based).
pub const PARAM_PAGE: &str = "page";
/// Param key holding the page size.
pub const PARAM_LIMIT: &str = "limit";
/// Param key holding the search term.
pub const PARAM_SEARCH: &str = "search";

/// Host-owned pagination/sort/filter/search state.
///
/// Values are JSON scalars or arrays. Merging is additive: a delta never
/// drops unrelated keys, and a `null` value in a delta removes its key
/// (the way query-param writers treat nil values).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get an unsigned integer value, accepting numeric strings.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Current page, 1-based. Defaults to 1.
    pub fn page(&self) -> u64 {
        self.get_u64(PARAM_PAGE).unwrap_or(1).max(1)
    }

    /// Current page size. Defaults to [`DEFAULT_LIMIT`].
    pub fn limit(&self) -> u64 {
        match self.get_u64(PARAM_LIMIT) {
            Some(0) | None => DEFAULT_LIMIT,
            Some(limit) => limit,
        }
    }

    /// Set a value in place. `Value::Null` removes the key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_null() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    /// A copy with the delta merged in additively.
    ///
    /// Existing keys not named by the delta are preserved; `null` delta
    /// values remove their keys.
    pub fn merged<K: Into<String>>(&self, delta: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut merged = self.clone();
        for (key, value) in delta {
            merged.set(key, value);
        }
        merged
    }

    /// A copy with one key omitted.
    pub fn without(&self, key: &str) -> Self {
        let mut map = self.0.clone();
        map.remove(key);
        Self(map)
    }

    /// Whether a key holds an active (truthy, non-empty) value.
    ///
    /// Empty strings, empty arrays, `0`, `false`, and `null` are inactive;
    /// everything else counts as an applied value.
    pub fn is_active(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(Value::Object(_)) => true,
        }
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Params {
    /// Build from a JSON value; non-objects become empty params.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut params = Self::default();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}
