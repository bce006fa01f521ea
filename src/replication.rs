//! Replication and task models.

use serde::{Deserialize, Serialize};

/// Body of `POST /_replicate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicateOptions {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_target: Option<bool>,
}

impl ReplicateOptions {
    pub fn new<S: Into<String>, T: Into<String>>(source: S, target: T) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = Some(continuous);
        self
    }

    pub fn create_target(mut self, create_target: bool) -> Self {
        self.create_target = Some(create_target);
        self
    }

    pub fn doc_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.doc_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Cancel a running replication with the same source/target
    pub fn cancel(mut self) -> Self {
        self.cancel = Some(true);
        self
    }
}

/// State of a replication job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicationStatus {
    Initializing,
    Running,
    Completed,
    Pending,
    Crashing,
    Error,
    Failed,
}

/// Checkpoint history entry of a one-shot replication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationHistory {
    pub session_id: String,
    pub start_time: String,
    pub end_time: String,
    pub start_last_seq: serde_json::Value,
    pub end_last_seq: serde_json::Value,
    pub recorded_seq: serde_json::Value,
    pub missing_checked: u64,
    pub missing_found: u64,
    pub docs_read: u64,
    pub docs_written: u64,
    pub doc_write_failures: u64,
}

/// Result of `POST /_replicate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Replication {
    pub ok: bool,
    pub session_id: Option<String>,
    pub source_last_seq: serde_json::Value,
    pub replication_id_version: Option<u32>,
    pub history: Vec<ReplicationHistory>,
    #[serde(rename = "_local_id")]
    pub local_id: Option<String>,
}

/// One entry of `/_active_tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveTask {
    pub changes_done: Option<u64>,
    pub database: Option<String>,
    pub pid: Option<String>,
    pub progress: Option<u64>,
    pub started_on: Option<u64>,
    pub status: Option<String>,
    pub task: Option<String>,
    pub total_changes: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub updated_on: Option<u64>,
}
