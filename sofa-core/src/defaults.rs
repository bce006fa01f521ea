//! Default Configuration Values
//!
//! Centralizes the default values used throughout the sofa client so they
//! are documented and adjusted in one place.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("sofa/", env!("CARGO_PKG_VERSION"));
}

/// Content types negotiated by the request executor
pub mod content_type {
    /// Default body encoding
    pub const JSON: &str = "application/json";

    /// Encoding used for `form` bodies
    pub const FORM: &str = "application/x-www-form-urlencoded; charset=utf-8";

    /// Response types decoded as text rather than binary
    pub const TEXT_HTML: &str = "text/html";
    pub const TEXT_PLAIN: &str = "text/plain";
}

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "AuthSession";
