//! Query and path builder.
//!
//! Pure string utilities used by every resource to turn a base URI, an
//! optional identifier and a set of query parameters into the final URL.

use serde_json::{Map, Value};

/// Document, attachment or job identifier
pub type DocId = String;

/// Revision token used for optimistic concurrency
pub type RevId = String;

/// Ordered query parameters.
///
/// Entries keep insertion order. An entry whose value is `None` is kept in
/// the list but skipped when the URL is rendered, the same way an absent
/// optional parameter would be.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    entries: Vec<(String, Option<Value>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a defined parameter
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    /// Append a parameter that may be absent
    pub fn with_opt<K: Into<String>, V: Into<Value>>(mut self, key: K, value: Option<V>) -> Self {
        self.entries.push((key.into(), value.map(Into::into)));
        self
    }

    /// Set a parameter, replacing the value of an existing key in place
    pub fn set<K: Into<String>>(&mut self, key: K, value: Option<Value>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Append every entry of `other`, later keys overriding earlier ones
    pub fn merge(&mut self, other: Query) {
        for (key, value) in other.entries {
            self.set(key, value);
        }
    }

    /// Entries that will appear in the rendered URL
    pub fn defined(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// True when no entry would be rendered
    pub fn is_empty(&self) -> bool {
        self.defined().next().is_none()
    }

    /// The defined entries as a JSON object
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .defined()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// Coerce a query value to its wire string.
///
/// Arrays are flattened to a single comma-joined token rather than repeated
/// keys; `null` array elements render empty and objects render as
/// `[object Object]`.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                // -0 prints as 0
                format!("{:.0}", f + 0.0)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Render `base_uri` with the defined entries of `params` as a query string.
///
/// Values are percent-encoded individually; keys are written verbatim.
/// Returns `base_uri` unchanged when nothing is defined. A base that already
/// carries a query string is extended with `&`.
pub fn build_query(base_uri: &str, params: &Query) -> String {
    let pairs: Vec<String> = params
        .defined()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(&stringify_value(value))))
        .collect();
    if pairs.is_empty() {
        return base_uri.to_string();
    }
    let sep = if base_uri.contains('?') { '&' } else { '?' };
    format!("{base_uri}{sep}{}", pairs.join("&"))
}

/// Join path segments onto `base_uri` with `/`.
///
/// Missing and empty segments are dropped. Segments are not encoded, so an
/// identifier such as `_design/app` keeps its embedded slash.
pub fn join_path(base_uri: &str, segments: &[Option<&str>]) -> String {
    std::iter::once(Some(base_uri))
        .chain(segments.iter().copied())
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
