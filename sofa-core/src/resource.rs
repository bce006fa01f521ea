//! Generic resource factory.
//!
//! A [`Resource`] is a singleton-style endpoint with no per-item identifier
//! (`/_session`, `/_cluster_setup`, `/{db}/_index`). It exposes `read`,
//! `create` and `destroy` against one bound URI.

use crate::auth::{Credentials, with_credentials};
use crate::error::SofaError;
use crate::execution::{Executor, Response};
use crate::request::{DestroyOptions, ReadOptions, Request, WriteMethod, WriteOptions};
use crate::uri::{Query, build_query};

/// Endpoint bound to a fixed URI
#[derive(Debug, Clone)]
pub struct Resource {
    executor: Executor,
    uri: String,
    credentials: Option<Credentials>,
}

impl Resource {
    pub fn new<U: Into<String>>(executor: Executor, uri: U) -> Self {
        Self {
            executor,
            uri: uri.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// A resource for a sub-path, sharing executor and credentials
    pub fn child(&self, path: &str) -> Resource {
        Resource {
            executor: self.executor.clone(),
            uri: crate::uri::join_path(&self.uri, &[Some(path)]),
            credentials: self.credentials.clone(),
        }
    }

    /// Execute `request` against an arbitrary URL with this resource's
    /// credentials injected
    pub async fn send(&self, url: &str, request: Request) -> Result<Response, SofaError> {
        let headers = with_credentials(request.headers(), self.credentials.as_ref())?;
        self.executor
            .execute(url, request.with_headers(headers))
            .await
    }

    /// GET (or HEAD) the bound URI
    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        let url = build_query(&self.uri, &options.query);
        self.send(&url, options.into_request()).await
    }

    /// POST by default; the method may be overridden (PUT for
    /// create-as-replace)
    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        let url = build_query(&self.uri, &options.query);
        self.send(&url, options.into_request(WriteMethod::Post))
            .await
    }

    /// DELETE the bound URI; `rev` is appended to the query when given
    pub async fn destroy(&self, options: DestroyOptions) -> Result<Response, SofaError> {
        let mut query: Query = options.query.clone();
        if let Some(rev) = &options.rev {
            query.set("rev", Some(rev.clone().into()));
        }
        let url = build_query(&self.uri, &query);
        self.send(&url, options.into_request()).await
    }
}
