//! Document endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sofa_core::{
    DestroyOptions, DocId, IdResource, IdSource, Query, ReadOptions, Request, Response, RevId,
    SofaError, WriteOptions, build_query,
};

use crate::attachment::AttachmentManager;

/// Revision metadata returned by write operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocWriteResult {
    pub ok: bool,
    pub id: DocId,
    pub rev: RevId,
}

/// Options for `COPY /{db}/{id}`
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    pub id: Option<DocId>,
    pub rev: Option<RevId>,
    /// Target id, optionally suffixed with `?rev=` to overwrite
    pub destination: String,
}

impl CopyOptions {
    pub fn new<S: Into<String>>(destination: S) -> Self {
        Self {
            destination: destination.into(),
            ..Default::default()
        }
    }

    pub fn id<S: Into<DocId>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn rev<S: Into<RevId>>(mut self, rev: S) -> Self {
        self.rev = Some(rev.into());
        self
    }
}

/// Documents of one database (or the `_design` namespace of one)
#[derive(Debug, Clone)]
pub struct DocManager {
    docs: IdResource,
}

impl DocManager {
    pub fn new(docs: IdResource) -> Self {
        Self { docs }
    }

    /// The same collection with an identifier bound
    pub fn with_id<I: Into<IdSource>>(&self, id: I) -> Self {
        Self {
            docs: self.docs.clone().with_id(id),
        }
    }

    pub fn resource(&self) -> &IdResource {
        &self.docs
    }

    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.docs.read(options).await
    }

    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.docs.create(options).await
    }

    pub async fn update(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.docs.update(options).await
    }

    pub async fn destroy(&self, options: DestroyOptions) -> Result<Response, SofaError> {
        self.docs.destroy(options).await
    }

    /// Fetch and decode a document
    pub async fn get<T: serde::de::DeserializeOwned>(&self, id: &str) -> Result<T, SofaError> {
        self.read(ReadOptions::new().id(id)).await?.into_json()
    }

    /// Create or replace a document from any serializable value
    pub async fn put<T: Serialize>(
        &self,
        id: &str,
        doc: &T,
        rev: Option<&str>,
    ) -> Result<DocWriteResult, SofaError> {
        let mut options = WriteOptions::new().id(id).data(serde_json::to_value(doc)?);
        if let Some(rev) = rev {
            options = options.rev(rev);
        }
        self.update(options).await?.into_json()
    }

    /// `COPY` a document to `destination`
    pub async fn copy(&self, options: CopyOptions) -> Result<Response, SofaError> {
        let query = Query::new().with_opt("rev", options.rev);
        let url = build_query(&self.docs.item_uri(options.id), &query);
        self.docs
            .resource()
            .send(&url, Request::copy(options.destination))
            .await
    }

    /// Attachment `file` of the bound document
    pub fn attachment(&self, file: &str) -> AttachmentManager {
        self.attachment_of(None, file)
    }

    /// Attachment `file` of document `id` (falls back to the bound id)
    pub fn attachment_of(&self, id: Option<&str>, file: &str) -> AttachmentManager {
        let doc_uri = self.docs.item_uri(id.map(str::to_string));
        let uri = sofa_core::join_path(&doc_uri, &[Some(file)]);
        AttachmentManager::new(
            IdResource::new(self.docs.resource().executor().clone(), uri)
                .with_credentials(self.docs.resource().credentials().cloned()),
        )
    }
}

/// Id derivation reading `_id` from the payload
pub fn id_from_doc() -> IdSource {
    IdSource::derived(|doc: &Value| doc.get("_id").and_then(Value::as_str).map(str::to_string))
}
