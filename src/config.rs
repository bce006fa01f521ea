//! Node configuration (`/_node/{node}/_config`).

use serde_json::Value;
use sofa_core::{DestroyOptions, ReadOptions, Resource, SofaError, WriteMethod, WriteOptions, join_path};

use crate::client::SofaClient;

/// Name addressing the node that receives the request
pub const LOCAL_NODE: &str = "_local";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    config: Resource,
}

impl NodeConfig {
    pub fn new(config: Resource) -> Self {
        Self { config }
    }

    fn at(&self, section: Option<&str>, key: Option<&str>) -> Resource {
        Resource::new(
            self.config.executor().clone(),
            join_path(self.config.uri(), &[section, key]),
        )
        .with_credentials(self.config.credentials().cloned())
    }

    /// Whole config, one section, or one key
    pub async fn read(&self, section: Option<&str>, key: Option<&str>) -> Result<Value, SofaError> {
        self.at(section, key)
            .read(ReadOptions::new())
            .await?
            .into_json()
    }

    /// Set `section/key`; returns the previous value
    pub async fn update(&self, section: &str, key: &str, value: &str) -> Result<Value, SofaError> {
        self.at(Some(section), Some(key))
            .create(
                WriteOptions::new()
                    .method(WriteMethod::Put)
                    .data(Value::String(value.to_string())),
            )
            .await?
            .into_json()
    }

    /// Delete `section/key`; returns the previous value
    pub async fn destroy(&self, section: &str, key: &str) -> Result<Value, SofaError> {
        self.at(Some(section), Some(key))
            .destroy(DestroyOptions::new())
            .await?
            .into_json()
    }

    /// `POST /_node/{node}/_config/_reload`
    pub async fn reload(&self) -> Result<Value, SofaError> {
        self.at(Some("_reload"), None)
            .create(WriteOptions::new())
            .await?
            .into_json()
    }
}

impl SofaClient {
    /// Configuration of `node` (use [`LOCAL_NODE`] for the receiving node)
    pub fn node_config(&self, node: &str) -> NodeConfig {
        NodeConfig::new(self.resource(&format!("_node/{node}/_config")))
    }
}
