//! Request executor.
//!
//! The single point that performs a network call: applies content-type
//! defaults, encodes the body, dispatches through the injected transport and
//! unwraps the response.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::defaults::content_type;
use crate::error::SofaError;
use crate::execution::response::{Response, ResponseFormat, unwrap_response};
use crate::execution::transport::{HttpTransport, HttpTransportRequest, ReqwestTransport};
use crate::request::{Body, Request};

/// Executes requests against an injected transport.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Executor over a `reqwest` client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self::new(Arc::new(ReqwestTransport::new(client)))
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Send `request` to `url` and decode the response.
    ///
    /// Non-2xx statuses come back as [`SofaError::Api`] (JSON-negotiated) or
    /// [`SofaError::RawHttp`]. Transport failures are returned untouched.
    pub async fn execute(&self, url: &str, request: Request) -> Result<Response, SofaError> {
        let method = request.method();
        let content_type = effective_content_type(&request);
        let body = encode_body(request.body(), &content_type)?;

        let mut headers = request.headers().clone();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&content_type).map_err(|e| {
                SofaError::InvalidHeader(format!("Invalid content type '{content_type}': {e}"))
            })?,
        );
        if let Request::Copy { destination, .. } = &request {
            headers.insert(
                "destination",
                HeaderValue::from_str(destination).map_err(|e| {
                    SofaError::InvalidHeader(format!("Invalid destination '{destination}': {e}"))
                })?,
            );
        }

        let format = ResponseFormat::negotiate(method, &content_type);

        tracing::debug!(%method, url, ?format, "sending request");
        let resp = self
            .transport
            .execute(HttpTransportRequest {
                method,
                url: url.to_string(),
                headers,
                body,
            })
            .await?;
        tracing::debug!(%method, url, status = resp.status, "received response");

        let status = resp.status;
        unwrap_response(resp, format).inspect_err(|e| {
            if e.status().is_some() {
                tracing::warn!(%method, url, status, "request failed: {}", e);
            }
        })
    }
}

/// Form bodies force url-encoding; otherwise the caller's content type wins
/// over the JSON default.
fn effective_content_type(request: &Request) -> String {
    if let Some(Body::Form(_)) = request.body() {
        return content_type::FORM.to_string();
    }
    caller_content_type(request.headers()).unwrap_or_else(|| content_type::JSON.to_string())
}

fn caller_content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(content_type::JSON))
        .unwrap_or(false)
}

fn encode_body(body: Option<&Body>, content_type: &str) -> Result<Option<Bytes>, SofaError> {
    let Some(body) = body else {
        return Ok(None);
    };
    let bytes = match body {
        Body::Form(fields) => Bytes::from(encode_form(fields)),
        // A string payload under a non-JSON content type is sent verbatim.
        Body::Json(serde_json::Value::String(text)) if !is_json(content_type) => {
            Bytes::from(text.clone())
        }
        Body::Json(value) => Bytes::from(serde_json::to_vec(value)?),
        Body::Raw(bytes) => bytes.clone(),
    };
    Ok(Some(bytes))
}

/// `application/x-www-form-urlencoded` serialization
pub fn encode_form(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
