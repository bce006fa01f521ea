//! Replication scheduler (`/_scheduler`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sofa_core::{Query, ReadOptions, Resource, SofaError, join_path};

use crate::client::SofaClient;
use crate::replication::ReplicationStatus;

/// Paging for scheduler listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

impl Paging {
    fn query(self) -> Query {
        Query::new()
            .with_opt("limit", self.limit)
            .with_opt("skip", self.skip)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerJob {
    pub id: String,
    pub database: Option<String>,
    pub doc_id: Option<String>,
    pub history: Vec<JobEvent>,
    pub pid: Option<String>,
    pub node: Option<String>,
    pub source: String,
    pub target: String,
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerJobs {
    pub offset: u64,
    pub total_rows: u64,
    pub jobs: Vec<SchedulerJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerDoc {
    pub database: String,
    pub doc_id: String,
    pub id: Option<String>,
    pub state: ReplicationStatus,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub info: Value,
    #[serde(default)]
    pub error_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerDocs {
    pub offset: u64,
    pub total_rows: u64,
    pub docs: Vec<SchedulerDoc>,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    scheduler: Resource,
}

impl Scheduler {
    pub fn new(scheduler: Resource) -> Self {
        Self { scheduler }
    }

    /// `GET /_scheduler/jobs`
    pub async fn jobs(&self, paging: Paging) -> Result<SchedulerJobs, SofaError> {
        self.scheduler
            .child("jobs")
            .read(ReadOptions::new().query(paging.query()))
            .await?
            .into_json()
    }

    /// `GET /_scheduler/docs[/{replicator}]`
    pub async fn docs(
        &self,
        replicator: Option<&str>,
        paging: Paging,
    ) -> Result<SchedulerDocs, SofaError> {
        self.docs_resource(replicator)
            .read(ReadOptions::new().query(paging.query()))
            .await?
            .into_json()
    }

    /// `GET /_scheduler/docs/{replicator}/{doc_id}`
    pub async fn doc(&self, replicator: &str, doc_id: &str) -> Result<SchedulerDoc, SofaError> {
        self.docs_resource(Some(replicator))
            .child(doc_id)
            .read(ReadOptions::new())
            .await?
            .into_json()
    }

    fn docs_resource(&self, replicator: Option<&str>) -> Resource {
        let docs = self.scheduler.child("docs");
        Resource::new(
            docs.executor().clone(),
            join_path(docs.uri(), &[replicator]),
        )
        .with_credentials(docs.credentials().cloned())
    }
}

impl SofaClient {
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.resource("_scheduler"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sofa_core::execution::testing::RecordingTransport;
    use std::sync::Arc;

    fn scheduler(transport: &Arc<RecordingTransport>) -> Scheduler {
        SofaClient::builder()
            .endpoint("localhost:5984")
            .transport(transport.clone())
            .build()
            .unwrap()
            .scheduler()
    }

    #[tokio::test]
    async fn jobs_sends_paging() {
        let transport = RecordingTransport::ok_json(json!({
            "offset": 0,
            "total_rows": 1,
            "jobs": [{"id": "j1", "source": "a", "target": "b",
                      "history": [{"type": "started", "timestamp": "2026-01-01T00:00:00Z"}]}]
        }));
        let jobs = scheduler(&transport)
            .jobs(Paging {
                limit: Some(10),
                skip: None,
            })
            .await
            .unwrap();
        assert_eq!(jobs.jobs[0].history[0].kind, "started");
        assert_eq!(
            transport.last().unwrap().url,
            "http://localhost:5984/_scheduler/jobs?limit=10"
        );
    }

    #[tokio::test]
    async fn docs_paths() {
        let transport = RecordingTransport::ok_json(json!({"total_rows": 0, "docs": []}));
        let scheduler = scheduler(&transport);
        scheduler.docs(None, Paging::default()).await.unwrap();
        scheduler
            .docs(Some("other/_replicator"), Paging::default())
            .await
            .unwrap();
        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:5984/_scheduler/docs",
                "http://localhost:5984/_scheduler/docs/other/_replicator",
            ]
        );
    }

    #[tokio::test]
    async fn single_doc_decodes_state() {
        let transport = RecordingTransport::ok_json(json!({
            "database": "_replicator",
            "doc_id": "r1",
            "id": null,
            "state": "completed",
            "error_count": 0
        }));
        let doc = scheduler(&transport).doc("_replicator", "r1").await.unwrap();
        assert_eq!(doc.state, ReplicationStatus::Completed);
        assert_eq!(
            transport.last().unwrap().url,
            "http://localhost:5984/_scheduler/docs/_replicator/r1"
        );
    }
}
