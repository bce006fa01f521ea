//! The `_users` database.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sofa_core::{IdSource, RevId};

use crate::client::SofaClient;
use crate::doc::DocManager;

/// Prefix of every user document id
pub const USER_ID_PREFIX: &str = "org.couchdb.user:";

/// A user document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<RevId>,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "type", default = "user_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn user_type() -> String {
    "user".to_string()
}

impl User {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, password: P) -> Self {
        Self {
            id: None,
            rev: None,
            name: name.into(),
            roles: Vec::new(),
            kind: user_type(),
            password: Some(password.into()),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// `org.couchdb.user:<name>`
pub fn user_id(name: &str) -> String {
    format!("{USER_ID_PREFIX}{name}")
}

/// Id derivation reading `name` from the user payload
pub fn id_from_user() -> IdSource {
    IdSource::derived(|doc: &Value| doc.get("name").and_then(Value::as_str).map(user_id))
}

impl SofaClient {
    /// Documents of `_users`, ids derived from the user's `name`
    pub fn users(&self) -> DocManager {
        DocManager::new(self.id_resource("_users")).with_id(id_from_user())
    }
}
