//! Request shapes.
//!
//! One [`Request`] variant per HTTP method, so that bodies only travel on
//! POST/PUT/PATCH and a destination only on COPY. The option bags
//! ([`ReadOptions`], [`WriteOptions`], [`DestroyOptions`]) are what resource
//! operations accept; each restricts the method override to the verbs that
//! make sense for it.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SofaError;
use crate::uri::{DocId, Query, RevId};

/// HTTP methods spoken by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Head,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Copy,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Copy => "COPY",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Head => reqwest::Method::HEAD,
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Delete => reqwest::Method::DELETE,
            RequestMethod::Copy => {
                reqwest::Method::from_bytes(b"COPY").unwrap_or(reqwest::Method::GET)
            }
        }
    }
}

/// Outgoing request body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON-serialized when the effective content type is JSON
    Json(Value),
    /// Url-encoded form fields; implies raw passthrough
    Form(Vec<(String, String)>),
    /// Sent as-is (attachments, pre-encoded payloads)
    Raw(Bytes),
}

impl Body {
    /// Serialize any value into a JSON body
    pub fn json<T: Serialize>(data: &T) -> Result<Self, SofaError> {
        Ok(Self::Json(serde_json::to_value(data)?))
    }

    pub fn form<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn raw<B: Into<Bytes>>(bytes: B) -> Self {
        Self::Raw(bytes.into())
    }

    /// The payload as seen by an identifier derivation function.
    ///
    /// Forms become an object of string fields; raw bodies carry no fields.
    pub fn as_payload(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Form(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            Self::Raw(_) => Value::Object(Map::new()),
        }
    }
}

/// A request ready for the executor, tagged by method
#[derive(Debug, Clone)]
pub enum Request {
    Get { headers: HeaderMap },
    Head { headers: HeaderMap },
    Post { headers: HeaderMap, body: Option<Body> },
    Put { headers: HeaderMap, body: Option<Body> },
    Patch { headers: HeaderMap, body: Option<Body> },
    Delete { headers: HeaderMap },
    Copy { headers: HeaderMap, destination: String },
}

impl Request {
    pub fn get() -> Self {
        Self::Get {
            headers: HeaderMap::new(),
        }
    }

    pub fn head() -> Self {
        Self::Head {
            headers: HeaderMap::new(),
        }
    }

    pub fn post(body: Option<Body>) -> Self {
        Self::Post {
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn put(body: Option<Body>) -> Self {
        Self::Put {
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn patch(body: Option<Body>) -> Self {
        Self::Patch {
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn delete() -> Self {
        Self::Delete {
            headers: HeaderMap::new(),
        }
    }

    pub fn copy<D: Into<String>>(destination: D) -> Self {
        Self::Copy {
            headers: HeaderMap::new(),
            destination: destination.into(),
        }
    }

    pub fn method(&self) -> RequestMethod {
        match self {
            Self::Get { .. } => RequestMethod::Get,
            Self::Head { .. } => RequestMethod::Head,
            Self::Post { .. } => RequestMethod::Post,
            Self::Put { .. } => RequestMethod::Put,
            Self::Patch { .. } => RequestMethod::Patch,
            Self::Delete { .. } => RequestMethod::Delete,
            Self::Copy { .. } => RequestMethod::Copy,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        match self {
            Self::Get { headers }
            | Self::Head { headers }
            | Self::Post { headers, .. }
            | Self::Put { headers, .. }
            | Self::Patch { headers, .. }
            | Self::Delete { headers }
            | Self::Copy { headers, .. } => headers,
        }
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        match self {
            Self::Get { headers }
            | Self::Head { headers }
            | Self::Post { headers, .. }
            | Self::Put { headers, .. }
            | Self::Patch { headers, .. }
            | Self::Delete { headers }
            | Self::Copy { headers, .. } => headers,
        }
    }

    pub fn body(&self) -> Option<&Body> {
        match self {
            Self::Post { body, .. } | Self::Put { body, .. } | Self::Patch { body, .. } => {
                body.as_ref()
            }
            _ => None,
        }
    }

    /// Replace the headers wholesale
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        *self.headers_mut() = headers;
        self
    }

    /// Add a single header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, SofaError> {
        insert_header(self.headers_mut(), name, value)?;
        Ok(self)
    }
}

pub(crate) fn insert_header(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
) -> Result<(), SofaError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| SofaError::InvalidHeader(format!("Invalid header name '{name}': {e}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| SofaError::InvalidHeader(format!("Invalid header value for '{name}': {e}")))?;
    headers.insert(header_name, header_value);
    Ok(())
}

/// Verb override for read operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMethod {
    #[default]
    Get,
    Head,
}

/// Verb override for write operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    Post,
    Put,
    Patch,
}

/// Options for `read`
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub method: ReadMethod,
    pub query: Query,
    pub headers: HeaderMap,
    pub id: Option<DocId>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(mut self) -> Self {
        self.method = ReadMethod::Head;
        self
    }

    pub fn id<S: Into<DocId>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.query = self.query.with(key, value);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, SofaError> {
        insert_header(&mut self.headers, name, value)?;
        Ok(self)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub(crate) fn into_request(self) -> Request {
        let request = match self.method {
            ReadMethod::Get => Request::get(),
            ReadMethod::Head => Request::head(),
        };
        request.with_headers(self.headers)
    }
}

/// Options for `create` and `update`
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// `None` picks the operation's default verb
    pub method: Option<WriteMethod>,
    pub query: Query,
    pub headers: HeaderMap,
    pub body: Option<Body>,
    pub id: Option<DocId>,
    pub rev: Option<RevId>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: WriteMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn id<S: Into<DocId>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn rev<S: Into<RevId>>(mut self, rev: S) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.query = self.query.with(key, value);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, SofaError> {
        insert_header(&mut self.headers, name, value)?;
        Ok(self)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// JSON body
    pub fn data(mut self, data: Value) -> Self {
        self.body = Some(Body::Json(data));
        self
    }

    /// Form body; replaces any JSON or raw body
    pub fn form<K, V, I>(mut self, fields: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.body = Some(Body::form(fields));
        self
    }

    /// Raw passthrough body
    pub fn raw<B: Into<Bytes>>(mut self, bytes: B) -> Self {
        self.body = Some(Body::raw(bytes));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn into_request(self, default: WriteMethod) -> Request {
        let request = match self.method.unwrap_or(default) {
            WriteMethod::Post => Request::post(self.body),
            WriteMethod::Put => Request::put(self.body),
            WriteMethod::Patch => Request::patch(self.body),
        };
        request.with_headers(self.headers)
    }
}

/// Options for `destroy`
#[derive(Debug, Clone, Default)]
pub struct DestroyOptions {
    pub query: Query,
    pub headers: HeaderMap,
    pub id: Option<DocId>,
    pub rev: Option<RevId>,
}

impl DestroyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id<S: Into<DocId>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn rev<S: Into<RevId>>(mut self, rev: S) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.query = self.query.with(key, value);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, SofaError> {
        insert_header(&mut self.headers, name, value)?;
        Ok(self)
    }

    pub(crate) fn into_request(self) -> Request {
        Request::delete().with_headers(self.headers)
    }
}
