//! Database endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sofa_core::{
    DestroyOptions, IdResource, IdSource, ReadOptions, Request, Resource, Response, SofaError,
    WriteMethod, WriteOptions, build_query, join_path,
};

use crate::client::SofaClient;
use crate::doc::{DocManager, DocWriteResult};
use crate::query::{FindRequest, FindResult};
use crate::view::{DesignDoc, ViewResult};

/// `GET /{db}` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbInfo {
    pub db_name: String,
    pub update_seq: Value,
    pub purge_seq: Value,
    pub doc_count: u64,
    pub doc_del_count: u64,
    pub disk_format_version: u32,
    pub compact_running: bool,
    pub instance_start_time: String,
    pub sizes: DbSizes,
    pub cluster: Option<DbCluster>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbSizes {
    pub file: u64,
    pub external: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbCluster {
    pub q: u32,
    pub n: u32,
    pub w: u32,
    pub r: u32,
}

/// Name/role lists of a security object section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroup {
    pub names: Vec<String>,
    pub roles: Vec<String>,
}

/// `/{db}/_security` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityObject {
    pub admins: SecurityGroup,
    pub members: SecurityGroup,
}

/// Generic `{"ok": true}` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OkResponse {
    pub ok: bool,
}

/// One database on the server.
///
/// Every accessor is a child resource of `{base}/{name}`; the manager
/// itself holds no state besides that URI.
#[derive(Debug, Clone)]
pub struct DbManager {
    db: Resource,
}

impl DbManager {
    pub fn new(db: Resource) -> Self {
        Self { db }
    }

    pub fn uri(&self) -> &str {
        self.db.uri()
    }

    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.db.read(options).await
    }

    /// Database metadata
    pub async fn info(&self) -> Result<DbInfo, SofaError> {
        self.read(ReadOptions::new()).await?.into_json()
    }

    /// Create the database; always a PUT
    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.db.create(options.method(WriteMethod::Put)).await
    }

    pub async fn destroy(&self, options: DestroyOptions) -> Result<Response, SofaError> {
        self.db.destroy(options).await
    }

    pub fn all_docs(&self) -> ViewEndpoint {
        ViewEndpoint::new(self.db.child("_all_docs"))
    }

    pub fn design_docs(&self) -> ViewEndpoint {
        ViewEndpoint::new(self.db.child("_design_docs"))
    }

    pub async fn bulk_get(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.db.child("_bulk_get").read(options).await
    }

    pub async fn bulk_docs(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.db.child("_bulk_docs").create(options).await
    }

    pub async fn changes(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.db.child("_changes").read(options).await
    }

    /// Compact the database, or the views of one design document
    pub async fn compact(
        &self,
        design_doc: Option<&str>,
        options: WriteOptions,
    ) -> Result<Response, SofaError> {
        let compact = self.db.child("_compact");
        let uri = join_path(compact.uri(), &[design_doc]);
        let target = Resource::new(compact.executor().clone(), uri)
            .with_credentials(compact.credentials().cloned());
        target.create(options).await
    }

    pub async fn view_cleanup(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.db.child("_view_cleanup").create(options).await
    }

    /// Run a Mango query
    pub async fn find<T: DeserializeOwned>(
        &self,
        request: &FindRequest,
    ) -> Result<FindResult<T>, SofaError> {
        self.db
            .child("_find")
            .create(WriteOptions::new().data(serde_json::to_value(request)?))
            .await?
            .into_json()
    }

    /// Query plan the server would use for `request`
    pub async fn explain(&self, request: &FindRequest) -> Result<Response, SofaError> {
        self.db
            .child("_explain")
            .create(WriteOptions::new().data(serde_json::to_value(request)?))
            .await
    }

    pub async fn purge(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.db.child("_purge").create(options).await
    }

    pub fn index(&self) -> IndexManager {
        IndexManager {
            index: self.db.child("_index"),
        }
    }

    pub fn security(&self) -> Setting {
        Setting::new(self.db.child("_security"))
    }

    pub fn purged_infos_limit(&self) -> Setting {
        Setting::new(self.db.child("_purged_infos_limit"))
    }

    pub fn revs_limit(&self) -> Setting {
        Setting::new(self.db.child("_revs_limit"))
    }

    /// Typed read of the security object
    pub async fn security_object(&self) -> Result<SecurityObject, SofaError> {
        self.security().read(ReadOptions::new()).await?.into_json()
    }

    pub async fn revs_diff(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.db.child("_revs_diff").create(options).await
    }

    pub async fn missing_revs(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.db.child("_missing_revs").create(options).await
    }

    pub fn shards(&self) -> Shards {
        Shards {
            shards: self.db.child("_shards"),
            sync: self.db.child("_sync_shards"),
        }
    }

    /// Documents of this database
    pub fn doc(&self) -> DocManager {
        DocManager::new(self.id_resource(""))
    }

    /// Documents of this database with `id` bound
    pub fn doc_with<I: Into<IdSource>>(&self, id: I) -> DocManager {
        self.doc().with_id(id)
    }

    /// Design documents (`/{db}/_design/{ddoc}`)
    pub fn design_doc(&self) -> DocManager {
        DocManager::new(self.id_resource("_design"))
    }

    /// Fetch `_design/{name}`
    pub async fn design(&self, name: &str) -> Result<DesignDoc, SofaError> {
        self.design_doc().get(name).await
    }

    /// Create or replace `_design/{name}`
    pub async fn put_design(
        &self,
        name: &str,
        design: &DesignDoc,
        rev: Option<&str>,
    ) -> Result<DocWriteResult, SofaError> {
        self.design_doc().put(name, design, rev).await
    }

    fn id_resource(&self, path: &str) -> IdResource {
        IdResource::new(
            self.db.executor().clone(),
            join_path(self.db.uri(), &[Some(path)]),
        )
        .with_credentials(self.db.credentials().cloned())
    }
}

impl SofaClient {
    /// Manager for database `name`
    pub fn db(&self, name: &str) -> DbManager {
        DbManager::new(self.resource(name))
    }
}

/// `_all_docs` / `_design_docs`
#[derive(Debug, Clone)]
pub struct ViewEndpoint {
    view: Resource,
}

impl ViewEndpoint {
    fn new(view: Resource) -> Self {
        Self { view }
    }

    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.view.read(options).await
    }

    /// Read and decode the rows
    pub async fn rows<K, V>(&self, options: ReadOptions) -> Result<ViewResult<K, V>, SofaError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        self.read(options).await?.into_json()
    }

    /// POST several queries in one request
    pub async fn queries(&self, queries: Vec<Value>) -> Result<Response, SofaError> {
        self.view
            .child("queries")
            .create(WriteOptions::new().data(json!({ "queries": queries })))
            .await
    }
}

/// Read/replace endpoints such as `_security` or `_revs_limit`
#[derive(Debug, Clone)]
pub struct Setting {
    setting: Resource,
}

impl Setting {
    fn new(setting: Resource) -> Self {
        Self { setting }
    }

    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.setting.read(options).await
    }

    /// PUT unless the caller picked another verb
    pub async fn update(&self, mut options: WriteOptions) -> Result<Response, SofaError> {
        if options.method.is_none() {
            options.method = Some(WriteMethod::Put);
        }
        self.setting.create(options).await
    }
}

/// `/{db}/_index`
#[derive(Debug, Clone)]
pub struct IndexManager {
    index: Resource,
}

impl IndexManager {
    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.index.read(options).await
    }

    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.index.create(options).await
    }

    /// `DELETE /{db}/_index/{design_doc}/json/{name}`
    pub async fn destroy(
        &self,
        design_doc: &str,
        name: &str,
        options: DestroyOptions,
    ) -> Result<Response, SofaError> {
        let uri = join_path(
            self.index.uri(),
            &[Some(design_doc), Some("json"), Some(name)],
        );
        let url = build_query(&uri, &options.query);
        self.index
            .send(&url, Request::delete().with_headers(options.headers))
            .await
    }
}

/// `/{db}/_shards` and `/{db}/_sync_shards`
#[derive(Debug, Clone)]
pub struct Shards {
    shards: Resource,
    sync: Resource,
}

impl Shards {
    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.shards.read(options).await
    }

    /// Shard placement of one document
    pub async fn doc(&self, doc_id: &str, options: ReadOptions) -> Result<Response, SofaError> {
        self.shards.child(doc_id).read(options).await
    }

    pub async fn sync(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.sync.create(options).await
    }
}
