//! Generic identified-resource factory.
//!
//! An [`IdResource`] targets `{uri}/{id}`. The identifier is resolved at each
//! call with a fixed precedence:
//!
//! 1. an explicit `id` in the call options;
//! 2. the identifier bound at construction, either a literal
//!    ([`IdSource::Static`]) or a function of the payload
//!    ([`IdSource::Derived`]);
//! 3. none, in which case the collection root is targeted.
//!
//! A derived identifier sees the JSON or form body on `create`/`update`, the
//! query parameters on `read`, and an empty object on `destroy`.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::auth::Credentials;
use crate::error::SofaError;
use crate::execution::{Executor, Response};
use crate::request::{DestroyOptions, ReadOptions, WriteMethod, WriteOptions};
use crate::resource::Resource;
use crate::uri::{DocId, Query, RevId, build_query, join_path};

type DeriveFn = dyn Fn(&Value) -> Option<DocId> + Send + Sync;

/// Identifier bound to an [`IdResource`]
#[derive(Clone)]
pub enum IdSource {
    Static(DocId),
    Derived(Arc<DeriveFn>),
}

impl IdSource {
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<DocId> + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    /// Resolve against a payload; the payload is only built for derived ids
    pub fn resolve<P: FnOnce() -> Value>(&self, payload: P) -> Option<DocId> {
        match self {
            Self::Static(id) => Some(id.clone()),
            Self::Derived(derive) => derive(&payload()),
        }
    }
}

impl std::fmt::Debug for IdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(id) => f.debug_tuple("Static").field(id).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl From<&str> for IdSource {
    fn from(id: &str) -> Self {
        Self::Static(id.to_string())
    }
}

impl From<String> for IdSource {
    fn from(id: String) -> Self {
        Self::Static(id)
    }
}

/// Endpoint keyed by a per-item identifier
#[derive(Debug, Clone)]
pub struct IdResource {
    inner: Resource,
    bound: Option<IdSource>,
}

impl IdResource {
    pub fn new<U: Into<String>>(executor: Executor, uri: U) -> Self {
        Self {
            inner: Resource::new(executor, uri),
            bound: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.inner = self.inner.with_credentials(credentials);
        self
    }

    /// Bind an identifier used whenever a call does not supply one
    pub fn with_id<I: Into<IdSource>>(mut self, id: I) -> Self {
        self.bound = Some(id.into());
        self
    }

    pub fn bound_id(&self) -> Option<&IdSource> {
        self.bound.as_ref()
    }

    pub fn uri(&self) -> &str {
        self.inner.uri()
    }

    pub fn resource(&self) -> &Resource {
        &self.inner
    }

    fn resolve_id<P: FnOnce() -> Value>(
        &self,
        literal: Option<DocId>,
        payload: P,
    ) -> Option<DocId> {
        literal.or_else(|| self.bound.as_ref().and_then(|b| b.resolve(payload)))
    }

    fn item_url(&self, id: Option<&str>, query: &Query) -> String {
        build_query(&join_path(self.inner.uri(), &[id]), query)
    }

    /// Path an operation would target for `id` (after precedence)
    pub fn item_uri(&self, id: Option<DocId>) -> String {
        let id = self.resolve_id(id, || Value::Object(Map::new()));
        join_path(self.inner.uri(), &[id.as_deref()])
    }

    /// GET (or HEAD) `{uri}/{id}`
    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        let id = self.resolve_id(options.id.clone(), || options.query.to_json());
        let url = self.item_url(id.as_deref(), &options.query);
        self.inner.send(&url, options.into_request()).await
    }

    /// PUT `{uri}/{id}` by default
    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        let id = self.resolve_id(options.id.clone(), || payload_of(&options));
        let url = self.item_url(id.as_deref(), &options.query);
        self.inner
            .send(&url, options.into_request(WriteMethod::Put))
            .await
    }

    /// PUT `{uri}/{id}?rev=...`
    pub async fn update(&self, options: WriteOptions) -> Result<Response, SofaError> {
        let id = self.resolve_id(options.id.clone(), || payload_of(&options));
        let query = with_rev(&options.query, options.rev.as_ref());
        let url = self.item_url(id.as_deref(), &query);
        self.inner
            .send(&url, options.into_request(WriteMethod::Put))
            .await
    }

    /// DELETE `{uri}/{id}?rev=...`
    pub async fn destroy(&self, options: DestroyOptions) -> Result<Response, SofaError> {
        let id = self.resolve_id(options.id.clone(), || Value::Object(Map::new()));
        let query = with_rev(&options.query, options.rev.as_ref());
        let url = self.item_url(id.as_deref(), &query);
        self.inner.send(&url, options.into_request()).await
    }
}

fn payload_of(options: &WriteOptions) -> Value {
    options
        .body
        .as_ref()
        .map(|b| b.as_payload())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn with_rev(query: &Query, rev: Option<&RevId>) -> Query {
    let mut query = query.clone();
    if let Some(rev) = rev {
        query.set("rev", Some(Value::String(rev.clone())));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::testing::RecordingTransport;
    use crate::request::RequestMethod;
    use serde_json::json;

    fn users_id() -> IdSource {
        IdSource::derived(|doc| {
            doc.get("name")
                .and_then(Value::as_str)
                .map(|name| format!("org.couchdb.user:{name}"))
        })
    }

    fn id_resource(transport: &Arc<RecordingTransport>, uri: &str) -> IdResource {
        IdResource::new(Executor::new(transport.clone()), uri)
    }

    #[tokio::test]
    async fn update_puts_with_rev() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        id_resource(&transport, "http://h/db")
            .update(
                WriteOptions::new()
                    .id("doc1")
                    .rev("1-a")
                    .data(json!({"name": "n"})),
            )
            .await
            .unwrap();

        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Put);
        assert_eq!(sent.url, "http://h/db/doc1?rev=1-a");
        assert_eq!(sent.body.as_deref(), Some(&br#"{"name":"n"}"#[..]));
    }

    #[tokio::test]
    async fn destroy_deletes_with_rev() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        id_resource(&transport, "http://h/db")
            .destroy(DestroyOptions::new().id("x").rev("2-1a"))
            .await
            .unwrap();

        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Delete);
        assert_eq!(sent.url, "http://h/db/x?rev=2-1a");
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn create_then_read_target_same_path() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        let docs = id_resource(&transport, "http://h/db").with_id("doc1");

        docs.create(WriteOptions::new().data(json!({"a": 1})))
            .await
            .unwrap();
        docs.read(ReadOptions::new().id("doc1")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, RequestMethod::Put);
        assert_eq!(requests[0].url, "http://h/db/doc1");
        assert_eq!(requests[1].method, RequestMethod::Get);
        assert_eq!(requests[1].url, requests[0].url);
    }

    #[tokio::test]
    async fn literal_id_overrides_bound_id() {
        let transport = RecordingTransport::ok_json(json!({}));
        let docs = id_resource(&transport, "http://h/db").with_id("bound");

        docs.read(ReadOptions::new()).await.unwrap();
        assert_eq!(transport.last().unwrap().url, "http://h/db/bound");

        docs.read(ReadOptions::new().id("explicit")).await.unwrap();
        assert_eq!(transport.last().unwrap().url, "http://h/db/explicit");
    }

    #[tokio::test]
    async fn derived_id_reads_the_payload() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        let users = id_resource(&transport, "http://h/_users").with_id(users_id());

        users
            .create(WriteOptions::new().data(json!({"name": "bob", "type": "user"})))
            .await
            .unwrap();
        assert_eq!(
            transport.last().unwrap().url,
            "http://h/_users/org.couchdb.user:bob"
        );

        users
            .update(WriteOptions::new().rev("1-x").form([("name", "amy")]))
            .await
            .unwrap();
        assert_eq!(
            transport.last().unwrap().url,
            "http://h/_users/org.couchdb.user:amy?rev=1-x"
        );
    }

    #[tokio::test]
    async fn derived_id_on_read_sees_the_query() {
        let transport = RecordingTransport::ok_json(json!({}));
        let users = id_resource(&transport, "http://h/_users").with_id(users_id());

        users
            .read(ReadOptions::new().param("name", "bob"))
            .await
            .unwrap();
        assert_eq!(
            transport.last().unwrap().url,
            "http://h/_users/org.couchdb.user:bob?name=bob"
        );
    }

    #[tokio::test]
    async fn derived_id_on_destroy_sees_an_empty_object() {
        let transport = RecordingTransport::ok_json(json!({}));
        let users = id_resource(&transport, "http://h/_users").with_id(users_id());

        users
            .destroy(DestroyOptions::new().rev("3-c"))
            .await
            .unwrap();
        assert_eq!(transport.last().unwrap().url, "http://h/_users?rev=3-c");

        users
            .destroy(DestroyOptions::new().id("org.couchdb.user:bob").rev("3-c"))
            .await
            .unwrap();
        assert_eq!(
            transport.last().unwrap().url,
            "http://h/_users/org.couchdb.user:bob?rev=3-c"
        );
    }

    #[tokio::test]
    async fn update_without_rev_has_no_query() {
        let transport = RecordingTransport::ok_json(json!({}));
        id_resource(&transport, "http://h/db")
            .update(WriteOptions::new().id("a").data(json!({})))
            .await
            .unwrap();
        assert_eq!(transport.last().unwrap().url, "http://h/db/a");
    }

    #[tokio::test]
    async fn update_keeps_extra_query_next_to_rev() {
        let transport = RecordingTransport::ok_json(json!({}));
        id_resource(&transport, "http://h/db")
            .update(
                WriteOptions::new()
                    .id("a")
                    .param("batch", "ok")
                    .rev("1-a")
                    .data(json!({})),
            )
            .await
            .unwrap();
        assert_eq!(transport.last().unwrap().url, "http://h/db/a?batch=ok&rev=1-a");
    }

    #[tokio::test]
    async fn create_allows_post_override() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        id_resource(&transport, "http://h/db")
            .create(
                WriteOptions::new()
                    .method(WriteMethod::Post)
                    .data(json!({"a": 1})),
            )
            .await
            .unwrap();

        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Post);
        assert_eq!(sent.url, "http://h/db");
    }

    #[tokio::test]
    async fn missing_id_surfaces_server_error() {
        let transport = RecordingTransport::respond(
            404,
            json!({"error": "not_found", "reason": "missing"}),
        );
        let err = id_resource(&transport, "http://h/db")
            .read(ReadOptions::new().id("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.error_result().unwrap().reason, "missing");
    }

    #[test]
    fn item_uri_applies_precedence() {
        let transport = RecordingTransport::ok_json(json!({}));
        let docs = id_resource(&transport, "http://h/db").with_id("bound");
        assert_eq!(docs.item_uri(None), "http://h/db/bound");
        assert_eq!(docs.item_uri(Some("x".into())), "http://h/db/x");
    }
}
