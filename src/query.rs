//! Mango query models (`/{db}/_find`, `/{db}/_explain`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// `[{"field": "asc"}, ...]`
pub type SortBy = Vec<BTreeMap<String, SortDirection>>;

/// Combination operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorOperator {
    #[serde(rename = "$and")]
    And,
    #[serde(rename = "$or")]
    Or,
    #[serde(rename = "$not")]
    Not,
    #[serde(rename = "$nor")]
    Nor,
    #[serde(rename = "$all")]
    All,
    #[serde(rename = "$elemMatch")]
    ElementMatch,
    #[serde(rename = "$allMatch")]
    AllMatch,
    #[serde(rename = "$keyMapMatch")]
    KeyMapMatch,
}

impl SelectorOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "$and",
            Self::Or => "$or",
            Self::Not => "$not",
            Self::Nor => "$nor",
            Self::All => "$all",
            Self::ElementMatch => "$elemMatch",
            Self::AllMatch => "$allMatch",
            Self::KeyMapMatch => "$keyMapMatch",
        }
    }
}

/// Field condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[serde(rename = "$lt")]
    LessThan,
    #[serde(rename = "$lte")]
    LessThanOrEqual,
    #[serde(rename = "$eq")]
    Equal,
    #[serde(rename = "$ne")]
    NotEqual,
    #[serde(rename = "$gte")]
    GreaterThanOrEqual,
    #[serde(rename = "$gt")]
    GreaterThan,
    #[serde(rename = "$exists")]
    Exists,
    #[serde(rename = "$type")]
    Type,
    #[serde(rename = "$in")]
    In,
    #[serde(rename = "$nin")]
    NotIn,
    #[serde(rename = "$size")]
    Size,
    #[serde(rename = "$mod")]
    Modulus,
    #[serde(rename = "$regex")]
    Regex,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessThan => "$lt",
            Self::LessThanOrEqual => "$lte",
            Self::Equal => "$eq",
            Self::NotEqual => "$ne",
            Self::GreaterThanOrEqual => "$gte",
            Self::GreaterThan => "$gt",
            Self::Exists => "$exists",
            Self::Type => "$type",
            Self::In => "$in",
            Self::NotIn => "$nin",
            Self::Size => "$size",
            Self::Modulus => "$mod",
            Self::Regex => "$regex",
        }
    }
}

/// `{"$gt": 1, "$lt": 10}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(Map<String, Value>);

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op<V: Into<Value>>(mut self, op: ConditionOperator, value: V) -> Self {
        self.0.insert(op.as_str().to_string(), value.into());
        self
    }
}

/// A Mango selector.
///
/// Field names map to plain values (implicit `$eq`) or [`Condition`]s;
/// combination operators map to lists of sub-selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(Map<String, Value>);

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field == value`
    pub fn eq<K: Into<String>, V: Into<Value>>(mut self, field: K, value: V) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn field<K: Into<String>>(mut self, field: K, condition: Condition) -> Self {
        self.0.insert(field.into(), Value::Object(condition.0));
        self
    }

    /// `{"$and": [...]}` and friends
    pub fn combine<I>(mut self, op: SelectorOperator, selectors: I) -> Self
    where
        I: IntoIterator<Item = Selector>,
    {
        let list = selectors
            .into_iter()
            .map(|s| Value::Object(s.0))
            .collect();
        self.0.insert(op.as_str().to_string(), Value::Array(list));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Body of `POST /{db}/_find`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindRequest {
    pub selector: Selector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: SortBy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_index: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_stats: Option<bool>,
}

impl FindRequest {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn sort<K: Into<String>>(mut self, field: K, direction: SortDirection) -> Self {
        self.sort.push(BTreeMap::from([(field.into(), direction)]));
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn bookmark<S: Into<String>>(mut self, bookmark: S) -> Self {
        self.bookmark = Some(bookmark.into());
        self
    }
}

/// `POST /{db}/_find` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindResult<T> {
    pub docs: Vec<T>,
    #[serde(default)]
    pub bookmark: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub execution_stats: Option<Value>,
}
