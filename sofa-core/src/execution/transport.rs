//! HTTP transport abstraction.
//!
//! Every network call goes through an injected [`HttpTransport`]. The
//! default is [`ReqwestTransport`]; tests and embedders can supply their own
//! implementation to observe the final URL/headers/body and return a
//! synthetic response.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;

use crate::error::SofaError;
use crate::request::RequestMethod;

/// Transport-level request data
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Transport-level response data
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpTransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single HTTP round-trip.
///
/// Implementations must not retry; connection failures are returned as
/// [`SofaError::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpTransportRequest)
    -> Result<HttpTransportResponse, SofaError>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, SofaError> {
        let mut rb = self
            .client
            .request(request.method.into(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            rb = rb.body(body);
        }

        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}
