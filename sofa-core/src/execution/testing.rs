//! In-memory transport for tests.
//!
//! [`RecordingTransport`] records every request it receives and answers with
//! a canned response, so resource behavior can be asserted without a server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::SofaError;
use crate::execution::transport::{HttpTransport, HttpTransportRequest, HttpTransportResponse};

enum Reply {
    Response(HttpTransportResponse),
    Fail(String),
}

/// Transport that records requests and returns a fixed reply
pub struct RecordingTransport {
    reply: Reply,
    requests: Mutex<Vec<HttpTransportRequest>>,
}

impl RecordingTransport {
    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 200 with a JSON body
    pub fn ok_json(body: serde_json::Value) -> Arc<Self> {
        Self::respond(200, body)
    }

    /// Any status with a JSON body
    pub fn respond(status: u16, body: serde_json::Value) -> Arc<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::with_reply(Reply::Response(HttpTransportResponse {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        }))
    }

    /// Any status with a raw body
    pub fn respond_bytes<B: Into<Bytes>>(status: u16, body: B) -> Arc<Self> {
        Self::with_reply(Reply::Response(HttpTransportResponse {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }))
    }

    /// Full control over the canned response
    pub fn respond_with(response: HttpTransportResponse) -> Arc<Self> {
        Self::with_reply(Reply::Response(response))
    }

    /// Every call fails at the transport level
    pub fn failing<S: Into<String>>(message: S) -> Arc<Self> {
        Self::with_reply(Reply::Fail(message.into()))
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<HttpTransportRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// The most recent request
    pub fn last(&self) -> Option<HttpTransportRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, SofaError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match &self.reply {
            Reply::Response(resp) => Ok(resp.clone()),
            Reply::Fail(message) => Err(SofaError::transport(message.clone())),
        }
    }
}
