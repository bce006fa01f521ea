//! Shard splitting (`/_reshard`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sofa_core::{
    DestroyOptions, IdResource, ReadOptions, Resource, Response, SofaError, WriteMethod,
    WriteOptions,
};

use crate::client::SofaClient;

/// Body of `POST /_reshard/jobs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReshardJobCreateOptions {
    /// Job type; only `split` is supported by the server
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReshardJobCreateOptions {
    /// Split every shard copy of `db`
    pub fn split_db<S: Into<String>>(db: S) -> Self {
        Self {
            kind: Some("split".to_string()),
            db: Some(db.into()),
            ..Default::default()
        }
    }

    /// Split one shard
    pub fn split_shard<S: Into<String>>(shard: S) -> Self {
        Self {
            kind: Some("split".to_string()),
            shard: Some(shard.into()),
            ..Default::default()
        }
    }

    pub fn node<S: Into<String>>(mut self, node: S) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn range<S: Into<String>>(mut self, range: S) -> Self {
        self.range = Some(range.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReshardRunState {
    Running,
    Stopped,
}

/// `/_reshard/state` and `/_reshard/jobs/{id}/state` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshardState {
    pub state: ReshardRunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /_reshard` summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshardSummary {
    pub state: Option<String>,
    pub state_reason: Option<String>,
    pub completed: u64,
    pub failed: u64,
    pub running: u64,
    pub stopped: u64,
    pub total: u64,
}

/// Result entry of `POST /_reshard/jobs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshardJobCreated {
    pub ok: bool,
    pub id: Option<String>,
    pub node: Option<String>,
    pub shard: Option<String>,
    pub error: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Reshard {
    reshard: Resource,
    jobs: IdResource,
}

impl Reshard {
    pub fn new(reshard: Resource) -> Self {
        let jobs = IdResource::new(
            reshard.executor().clone(),
            sofa_core::join_path(reshard.uri(), &[Some("jobs")]),
        )
        .with_credentials(reshard.credentials().cloned());
        Self { reshard, jobs }
    }

    pub async fn read(&self) -> Result<ReshardSummary, SofaError> {
        self.reshard.read(ReadOptions::new()).await?.into_json()
    }

    pub async fn state(&self) -> Result<ReshardState, SofaError> {
        self.reshard
            .child("state")
            .read(ReadOptions::new())
            .await?
            .into_json()
    }

    /// Start or stop resharding on the whole cluster
    pub async fn set_state(&self, state: &ReshardState) -> Result<Response, SofaError> {
        put_state(&self.reshard.child("state"), state).await
    }

    /// All jobs, or one job when `id` is given
    pub async fn jobs(&self, id: Option<&str>) -> Result<Value, SofaError> {
        let mut options = ReadOptions::new();
        options.id = id.map(str::to_string);
        self.jobs.read(options).await?.into_json()
    }

    pub async fn create_job(
        &self,
        options: &ReshardJobCreateOptions,
    ) -> Result<Vec<ReshardJobCreated>, SofaError> {
        self.jobs
            .resource()
            .create(WriteOptions::new().data(serde_json::to_value(options)?))
            .await?
            .into_json()
    }

    pub async fn remove_job(&self, id: &str) -> Result<Response, SofaError> {
        self.jobs.destroy(DestroyOptions::new().id(id)).await
    }

    pub async fn job_state(&self, id: &str) -> Result<ReshardState, SofaError> {
        self.job_state_resource(id)
            .read(ReadOptions::new())
            .await?
            .into_json()
    }

    pub async fn set_job_state(&self, id: &str, state: &ReshardState) -> Result<Response, SofaError> {
        put_state(&self.job_state_resource(id), state).await
    }

    fn job_state_resource(&self, id: &str) -> Resource {
        self.jobs.resource().child(id).child("state")
    }
}

async fn put_state(target: &Resource, state: &ReshardState) -> Result<Response, SofaError> {
    target
        .create(
            WriteOptions::new()
                .method(WriteMethod::Put)
                .data(serde_json::to_value(state)?),
        )
        .await
}

impl SofaClient {
    pub fn reshard(&self) -> Reshard {
        Reshard::new(self.resource("_reshard"))
    }
}
