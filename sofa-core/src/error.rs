//! Error Handling Module
//!
//! `SofaError` is the single error type surfaced by every operation. The
//! core performs no local recovery: transport failures pass through
//! unclassified, HTTP error statuses become either a structured
//! [`ErrorResult`] or the raw response body.
//!
//! # Example
//!
//! ```rust,ignore
//! match db.doc().read(ReadOptions::new().id("missing")).await {
//!     Err(e) if e.is_not_found() => { /* create it */ }
//!     Err(e) => return Err(e),
//!     Ok(resp) => { /* ... */ }
//! }
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by the server on a non-2xx status.
///
/// The server sends `{error, reason}`; `status` is attached from the HTTP
/// response line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub reason: String,
}

impl std::fmt::Display for ErrorResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.error)?;
        if !self.reason.is_empty() {
            write!(f, " ({})", self.reason)?;
        }
        Ok(())
    }
}

/// Errors returned by sofa operations
#[derive(Error, Debug)]
pub enum SofaError {
    /// Connection-level failure from the HTTP transport
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx response with a JSON error body
    #[error("{0}")]
    Api(ErrorResult),

    /// Non-2xx response whose body was not JSON-negotiated
    #[error("HTTP {status}: {}", String::from_utf8_lossy(.body))]
    RawHttp { status: u16, body: Bytes },

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A header name or value cannot be sent on the wire
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Client construction failed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SofaError {
    /// Wrap an arbitrary transport failure
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Transport(err.into())
    }

    /// HTTP status carried by the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(result) => Some(result.status),
            Self::RawHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured error body, when the server sent one
    pub fn error_result(&self) -> Option<&ErrorResult> {
        match self {
            Self::Api(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Revision conflict on an optimistic-concurrency write
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<reqwest::Error> for SofaError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
