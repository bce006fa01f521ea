//! Server-level endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sofa_core::{Query, ReadOptions, Response, SofaError, WriteOptions};

use crate::client::SofaClient;
use crate::replication::{ActiveTask, ReplicateOptions};

/// `GET /` welcome document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    pub couchdb: String,
    pub version: String,
    pub uuid: Option<String>,
    pub vendor: Option<Value>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UuidsResponse {
    uuids: Vec<String>,
}

/// `GET /_membership`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Membership {
    pub all_nodes: Vec<String>,
    pub cluster_nodes: Vec<String>,
}

impl SofaClient {
    /// `GET /`
    pub async fn read(&self) -> Result<Response, SofaError> {
        self.resource("").read(ReadOptions::new()).await
    }

    /// `GET /` decoded
    pub async fn info(&self) -> Result<ServerInfo, SofaError> {
        self.read().await?.into_json()
    }

    /// `GET /_up`
    pub async fn up(&self) -> Result<Response, SofaError> {
        self.resource("_up").read(ReadOptions::new()).await
    }

    /// `GET /_uuids?count=n`
    pub async fn uuids(&self, count: u32) -> Result<Vec<String>, SofaError> {
        let resp = self
            .resource("_uuids")
            .read(ReadOptions::new().param("count", count))
            .await?;
        Ok(resp.into_json::<UuidsResponse>()?.uuids)
    }

    /// `GET /_active_tasks`
    pub async fn active_tasks(&self) -> Result<Vec<ActiveTask>, SofaError> {
        self.resource("_active_tasks")
            .read(ReadOptions::new())
            .await?
            .into_json()
    }

    /// `GET /_all_dbs` (`descending`, `limit`, `skip`, `startkey`, `endkey`)
    pub async fn all_dbs(&self, query: Query) -> Result<Vec<String>, SofaError> {
        self.resource("_all_dbs")
            .read(ReadOptions::new().query(query))
            .await?
            .into_json()
    }

    /// `POST /_dbs_info` for the named databases
    pub async fn dbs_info<I, S>(&self, keys: I) -> Result<Response, SofaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.resource("_dbs_info")
            .create(WriteOptions::new().data(json!({ "keys": keys })))
            .await
    }

    /// `POST /_replicate`
    pub async fn replicate(&self, options: &ReplicateOptions) -> Result<Response, SofaError> {
        let data = serde_json::to_value(options)?;
        self.resource("_replicate")
            .create(WriteOptions::new().data(data))
            .await
    }

    /// `GET /_membership`
    pub async fn membership(&self) -> Result<Membership, SofaError> {
        self.resource("_membership")
            .read(ReadOptions::new())
            .await?
            .into_json()
    }

    /// `POST /_search_analyze`
    pub async fn search_analyze(&self, analyzer: &str, text: &str) -> Result<Response, SofaError> {
        self.resource("_search_analyze")
            .create(WriteOptions::new().data(json!({"analyzer": analyzer, "text": text})))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sofa_core::RequestMethod;
    use sofa_core::execution::testing::RecordingTransport;
    use std::sync::Arc;

    fn client(transport: &Arc<RecordingTransport>) -> SofaClient {
        SofaClient::builder()
            .endpoint("localhost:5984")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn read_hits_root() {
        let transport = RecordingTransport::ok_json(json!({"couchdb": "Welcome", "version": "3.3.3"}));
        let info = client(&transport).info().await.unwrap();
        assert_eq!(info.version, "3.3.3");
        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Get);
        assert_eq!(sent.url, "http://localhost:5984");
    }

    #[tokio::test]
    async fn uuids_sends_count() {
        let transport = RecordingTransport::ok_json(json!({"uuids": ["a", "b"]}));
        let ids = client(&transport).uuids(2).await.unwrap();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(transport.last().unwrap().url, "http://localhost:5984/_uuids?count=2");
    }

    #[tokio::test]
    async fn all_dbs_forwards_query() {
        let transport = RecordingTransport::ok_json(json!(["_users", "db"]));
        let dbs = client(&transport)
            .all_dbs(Query::new().with("limit", 2).with("descending", true))
            .await
            .unwrap();
        assert_eq!(dbs, vec!["_users", "db"]);
        assert_eq!(
            transport.last().unwrap().url,
            "http://localhost:5984/_all_dbs?limit=2&descending=true"
        );
    }

    #[tokio::test]
    async fn replicate_posts_options() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        client(&transport)
            .replicate(&ReplicateOptions::new("a", "b").create_target(true))
            .await
            .unwrap();
        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Post);
        assert_eq!(sent.url, "http://localhost:5984/_replicate");
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"source": "a", "target": "b", "create_target": true}));
    }

    #[tokio::test]
    async fn dbs_info_posts_keys() {
        let transport = RecordingTransport::ok_json(json!([]));
        client(&transport).dbs_info(["a", "b"]).await.unwrap();
        let sent = transport.last().unwrap();
        assert_eq!(sent.url, "http://localhost:5984/_dbs_info");
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"keys": ["a", "b"]}));
    }

    #[tokio::test]
    async fn active_tasks_and_membership_decode() {
        let transport = RecordingTransport::ok_json(json!([{"type": "indexer"}]));
        let tasks = client(&transport).active_tasks().await.unwrap();
        assert_eq!(tasks[0].kind.as_deref(), Some("indexer"));

        let transport = RecordingTransport::ok_json(
            json!({"all_nodes": ["n1@h"], "cluster_nodes": ["n1@h"]}),
        );
        let members = client(&transport).membership().await.unwrap();
        assert_eq!(members.all_nodes, vec!["n1@h"]);
        assert_eq!(transport.last().unwrap().url, "http://localhost:5984/_membership");
    }
}
