//! Attachment endpoints.
//!
//! Writes are raw passthrough: the body is sent as-is under the caller's
//! content type. Reads ask for a content type so the response is decoded as
//! text or bytes instead of JSON.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sofa_core::{
    Body, DestroyOptions, IdResource, ReadOptions, Response, RevId, SofaError, WriteOptions,
};

/// Attachment entry in a document's `_attachments`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub content_type: String,
    pub data: Option<String>,
    pub digest: Option<String>,
    pub length: Option<u64>,
    pub revpos: Option<u64>,
    pub stub: Option<bool>,
    pub follows: Option<bool>,
}

/// One attachment of one document
#[derive(Debug, Clone)]
pub struct AttachmentManager {
    file: IdResource,
}

impl AttachmentManager {
    pub fn new(file: IdResource) -> Self {
        Self { file }
    }

    pub fn uri(&self) -> &str {
        self.file.uri()
    }

    /// Read the attachment, negotiating the decode format from
    /// `content_type`
    pub async fn read(
        &self,
        content_type: Option<&str>,
        options: ReadOptions,
    ) -> Result<Response, SofaError> {
        let options = match content_type {
            Some(content_type) => options.header("content-type", content_type)?,
            None => options,
        };
        self.file.read(options).await
    }

    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.file.create(as_raw(options)?).await
    }

    pub async fn update(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.file.update(as_raw(options)?).await
    }

    pub async fn destroy(&self, options: DestroyOptions) -> Result<Response, SofaError> {
        self.file.destroy(options).await
    }

    /// Upload `data` as the attachment body
    pub async fn upload<B: Into<Bytes>>(
        &self,
        data: B,
        content_type: &str,
        rev: Option<RevId>,
    ) -> Result<Response, SofaError> {
        let mut options = WriteOptions::new()
            .raw(data)
            .header("content-type", content_type)?;
        options.rev = rev;
        self.update(options).await
    }
}

/// Force a raw body; JSON strings are sent verbatim
fn as_raw(mut options: WriteOptions) -> Result<WriteOptions, SofaError> {
    options.body = match options.body.take() {
        Some(Body::Json(Value::String(text))) => Some(Body::Raw(Bytes::from(text))),
        Some(Body::Json(value)) => Some(Body::Raw(Bytes::from(serde_json::to_vec(&value)?))),
        other => other,
    };
    Ok(options)
}
