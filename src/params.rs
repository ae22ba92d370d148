//! Query parameter sets.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{QuantumError, Result};

/// Named query parameters for one request.
///
/// Values are kept as JSON so that optional arguments can be inserted as
/// `null` and structured arguments (id lists, filter objects) keep their
/// shape until the request is built. Nothing `null` is ever transmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parameter set from any struct serializing to a JSON object.
    ///
    /// `None` fields become `null` and are dropped on transmission.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn from_serialize<T: Serialize + ?Sized>(query: &T) -> Result<Self> {
        let params = match serde_json::to_value(query)? {
            Value::Object(map) => map.into_iter().collect(),
            Value::Null => BTreeMap::new(),
            other => {
                return Err(QuantumError::ParseError(serde::ser::Error::custom(
                    format!("query parameters must serialize to an object, got {other}"),
                )));
            }
        };
        Ok(Self(params))
    }

    /// Add a parameter, replacing any previous value with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a parameter, replacing any previous value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Parameter names, including ones holding `null`.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Merge `name=value` pairs from a URL query string, overriding
    /// parameters that already exist.
    pub fn merge_query_pairs<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    {
        for (name, value) in pairs {
            self.0
                .insert(name.into_owned(), Value::String(value.into_owned()));
        }
    }

    /// Returns true if there are no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters, including ones holding `null`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The pairs actually sent on the wire.
    ///
    /// `null` values are dropped, arrays and objects are sent as their JSON
    /// text, strings are sent raw and other scalars as their literal text.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(name, value)| {
                let encoded = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((name.clone(), encoded))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
