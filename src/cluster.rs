//! Cluster setup wizard (`/_cluster_setup`).

use serde::{Deserialize, Serialize};
use sofa_core::{ReadOptions, Resource, Response, SofaError, WriteOptions};

use crate::client::SofaClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterSetupStatus {
    ClusterDisabled,
    ClusterEnabled,
    ClusterFinished,
    SingleNodeDisabled,
    SingleNodeEnabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterSetupAction {
    EnableSingleNode,
    EnableCluster,
    AddNode,
    FinishCluster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSetupState {
    pub state: ClusterSetupStatus,
}

/// Body of `POST /_cluster_setup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSetupOptions {
    pub action: ClusterSetupAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_current_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensure_dbs_exist: Option<Vec<String>>,
}

impl ClusterSetupOptions {
    pub fn new(action: ClusterSetupAction) -> Self {
        Self {
            action,
            bind_address: None,
            username: None,
            password: None,
            port: None,
            node_count: None,
            remote_node: None,
            remote_current_user: None,
            remote_current_password: None,
            host: None,
            ensure_dbs_exist: None,
        }
    }

    pub fn credentials<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn bind_address<S: Into<String>>(mut self, address: S) -> Self {
        self.bind_address = Some(address.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn node_count(mut self, count: u32) -> Self {
        self.node_count = Some(count);
        self
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ClusterSetup {
    setup: Resource,
}

impl ClusterSetup {
    pub fn new(setup: Resource) -> Self {
        Self { setup }
    }

    /// Current setup state; `ensure_dbs_exist` is sent as one
    /// comma-joined value
    pub async fn status(&self, ensure_dbs_exist: &[&str]) -> Result<ClusterSetupState, SofaError> {
        let mut options = ReadOptions::new();
        if !ensure_dbs_exist.is_empty() {
            options = options.param("ensure_dbs_exist", ensure_dbs_exist.to_vec());
        }
        self.setup.read(options).await?.into_json()
    }

    pub async fn setup(&self, options: &ClusterSetupOptions) -> Result<Response, SofaError> {
        self.setup
            .create(WriteOptions::new().data(serde_json::to_value(options)?))
            .await
    }
}

impl SofaClient {
    pub fn cluster_setup(&self) -> ClusterSetup {
        ClusterSetup::new(self.resource("_cluster_setup"))
    }
}
