//! Convenience wrapper around API response documents
//!
//! The API answers with camel-cased keys (`Title`, `DisplayUrl`, `ID`).
//! [`ResponseData`] deep-converts the JSON document so that every nested
//! object is itself a `ResponseData`, and looks fields up by their
//! snake_case names:
//!
//! ```rust
//! use bingsearch::ResponseData;
//! use serde_json::json;
//!
//! let data = ResponseData::from_json(json!({
//!     "AlphaBeta": 1,
//!     "Results": {"Gamma": 2, "delta": [3, 4]}
//! }))
//! .unwrap();
//!
//! assert_eq!(data.get("alpha_beta").and_then(|v| v.as_i64()), Some(1));
//! assert_eq!(data.lookup("results.gamma").and_then(|v| v.as_i64()), Some(2));
//! assert_eq!(data.lookup("results.delta.1").and_then(|v| v.as_i64()), Some(4));
//! ```

use crate::error::{SearchError, SearchResult};
use crate::types::SearchResult as SearchResultType;
use crate::utils::http::extract_domain;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A single value inside a response document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ResponseValue>),
    Data(ResponseData),
}

impl ResponseValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ResponseValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResponseValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResponseValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ResponseValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ResponseValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ResponseValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ResponseValue]> {
        match self {
            ResponseValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&ResponseData> {
        match self {
            ResponseValue::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Field lookup on a nested object; `None` for any other kind of value
    pub fn get(&self, name: &str) -> Option<&ResponseValue> {
        self.as_data().and_then(|data| data.get(name))
    }

    /// Element lookup on a list; `None` for any other kind of value
    pub fn index(&self, index: usize) -> Option<&ResponseValue> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Convert back into plain JSON
    pub fn to_json(&self) -> Value {
        match self {
            ResponseValue::Null => Value::Null,
            ResponseValue::Bool(b) => Value::Bool(*b),
            ResponseValue::Number(n) => Value::Number(n.clone()),
            ResponseValue::String(s) => Value::String(s.clone()),
            ResponseValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ResponseValue::Data(data) => data.to_json(),
        }
    }
}

impl From<Value> for ResponseValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ResponseValue::Null,
            Value::Bool(b) => ResponseValue::Bool(b),
            Value::Number(n) => ResponseValue::Number(n),
            Value::String(s) => ResponseValue::String(s),
            Value::Array(items) => {
                ResponseValue::List(items.into_iter().map(ResponseValue::from).collect())
            }
            Value::Object(map) => ResponseValue::Data(ResponseData::from_map(map)),
        }
    }
}

/// A response object with snake_case field access
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResponseData {
    fields: BTreeMap<String, ResponseValue>,
}

impl ResponseData {
    /// Wrap a JSON object, converting all nested objects
    pub fn from_map(map: serde_json::Map<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(key, value)| (key, ResponseValue::from(value)))
                .collect(),
        }
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_json(value: Value) -> SearchResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(SearchError::ParseError(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Unwrap the `d` member of an OData response envelope
    pub fn from_envelope(mut body: Value) -> SearchResult<Self> {
        let data = body
            .as_object_mut()
            .and_then(|envelope| envelope.remove("d"))
            .ok_or_else(|| {
                SearchError::ParseError("Response is missing the 'd' envelope".to_string())
            })?;
        Self::from_json(data)
    }

    /// Look up a field by name.
    ///
    /// Tries the exact key, then `UpperCamelCase`, then `lowerCamelCase`, then
    /// any key equal to `name` ignoring case and underscores.
    pub fn get(&self, name: &str) -> Option<&ResponseValue> {
        if let Some(value) = self.fields.get(name) {
            return Some(value);
        }

        let upper = camelize(name);
        if let Some(value) = self.fields.get(&upper) {
            return Some(value);
        }

        if let Some(value) = self.fields.get(&lower_first(&upper)) {
            return Some(value);
        }

        let wanted = fold_key(name);
        self.fields
            .iter()
            .find(|(key, _)| fold_key(key) == wanted)
            .map(|(_, value)| value)
    }

    /// Like [`get`](Self::get), but a missing field is an error
    pub fn field(&self, name: &str) -> SearchResult<&ResponseValue> {
        self.get(name)
            .ok_or_else(|| SearchError::MissingField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Follow a dotted path such as `results.0.title`.
    ///
    /// Numeric segments index into lists, all others are field lookups.
    pub fn lookup(&self, path: &str) -> Option<&ResponseValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                ResponseValue::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                ResponseValue::Data(data) => data.get(segment)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Raw keys as returned by the API
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ResponseValue> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The object entries of the `results` list
    pub fn results(&self) -> Vec<&ResponseData> {
        self.get("results")
            .and_then(ResponseValue::as_list)
            .map(|items| items.iter().filter_map(ResponseValue::as_data).collect())
            .unwrap_or_default()
    }

    /// Flatten the `results` list into web hits.
    ///
    /// Entries without a URL are skipped.
    pub fn web_results(&self) -> Vec<SearchResultType> {
        self.results()
            .into_iter()
            .filter_map(|entry| {
                let url = entry.get("url").and_then(ResponseValue::as_str)?.to_string();
                let text = |name: &str| {
                    entry
                        .get(name)
                        .and_then(ResponseValue::as_str)
                        .map(str::to_string)
                };

                Some(SearchResultType {
                    id: text("id"),
                    title: text("title").unwrap_or_default(),
                    domain: extract_domain(&url),
                    snippet: text("description"),
                    display_url: text("display_url"),
                    raw: Some(entry.to_json()),
                    url,
                })
            })
            .collect()
    }

    /// Convert back into plain JSON
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ResponseData {
    type Item = (&'a String, &'a ResponseValue);
    type IntoIter = btree_map::Iter<'a, String, ResponseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl TryFrom<Value> for ResponseData {
    type Error = SearchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

/// `alpha_beta` -> `AlphaBeta`
pub fn camelize(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
