//! View and design document models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sofa_core::{DocId, RevId};

/// One row of a view, `_all_docs` or `_design_docs` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow<K = Value, V = Value> {
    #[serde(default)]
    pub id: Option<DocId>,
    pub key: K,
    pub value: V,
    /// Present with `include_docs=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResult<K = Value, V = Value> {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub total_rows: u64,
    pub rows: Vec<ViewRow<K, V>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_seq: Option<Value>,
}

/// Map/reduce source of one view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewFunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
}

impl ViewFunction {
    pub fn map<S: Into<String>>(source: S) -> Self {
        Self {
            map: Some(source.into()),
            reduce: None,
        }
    }

    pub fn with_reduce<S: Into<String>>(mut self, source: S) -> Self {
        self.reduce = Some(source.into());
        self
    }
}

pub type ViewFuncs = BTreeMap<String, ViewFunction>;

/// A `_design/...` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDoc {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocId>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<RevId>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub filters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub updates: Map<String, Value>,
    #[serde(default)]
    pub views: ViewFuncs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_doc_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoupdate: Option<bool>,
}

fn default_language() -> String {
    "javascript".to_string()
}

impl Default for DesignDoc {
    fn default() -> Self {
        Self {
            id: None,
            rev: None,
            language: default_language(),
            options: Map::new(),
            filters: Map::new(),
            updates: Map::new(),
            views: ViewFuncs::new(),
            validate_doc_update: None,
            autoupdate: None,
        }
    }
}

impl DesignDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view<S: Into<String>>(mut self, name: S, function: ViewFunction) -> Self {
        self.views.insert(name.into(), function);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_result_with_typed_rows() {
        let result: ViewResult<String, u32> = serde_json::from_value(json!({
            "total_rows": 2,
            "offset": 0,
            "rows": [
                {"id": "a", "key": "apple", "value": 3},
                {"id": "b", "key": "pear", "value": 4}
            ]
        }))
        .unwrap();
        assert_eq!(result.rows[1].key, "pear");
        assert_eq!(result.rows[1].value, 4);
        assert!(result.rows[0].doc.is_none());
    }

    #[test]
    fn reduced_rows_have_no_id() {
        let result: ViewResult = serde_json::from_value(json!({
            "rows": [{"key": null, "value": 7}]
        }))
        .unwrap();
        assert_eq!(result.rows[0].id, None);
        assert_eq!(result.total_rows, 0);
    }

    #[test]
    fn design_doc_serializes_compactly() {
        let ddoc = DesignDoc::new().view(
            "by_total",
            ViewFunction::map("function (doc) { emit(doc.total, 1); }").with_reduce("_count"),
        );
        assert_eq!(
            serde_json::to_value(&ddoc).unwrap(),
            json!({
                "language": "javascript",
                "views": {
                    "by_total": {
                        "map": "function (doc) { emit(doc.total, 1); }",
                        "reduce": "_count"
                    }
                }
            })
        );
    }
}
