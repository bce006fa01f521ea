//! `reqwest` client construction from [`HttpConfig`].

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::SofaError;
use crate::types::HttpConfig;

fn config_error(what: &str, detail: impl std::fmt::Display) -> SofaError {
    SofaError::Configuration(format!("{what}: {detail}"))
}

fn default_headers(headers: &HashMap<String, String>) -> Result<HeaderMap, SofaError> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| config_error(&format!("header name '{name}'"), e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| config_error(&format!("value of header '{name}'"), e))?;
            Ok((name, value))
        })
        .collect()
}

/// Build the client used by [`ReqwestTransport`](super::ReqwestTransport)
pub fn build_http_client_from_config(cfg: &HttpConfig) -> Result<reqwest::Client, SofaError> {
    let mut builder = reqwest::Client::builder().default_headers(default_headers(&cfg.headers)?);

    if let Some(timeout) = cfg.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = cfg.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(user_agent) = &cfg.user_agent {
        builder = builder.user_agent(user_agent);
    }
    if let Some(url) = &cfg.proxy {
        let proxy = reqwest::Proxy::all(url).map_err(|e| config_error("invalid proxy URL", e))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| config_error("failed to build HTTP client", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        assert!(build_http_client_from_config(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn bad_header_name_is_a_configuration_error() {
        let cfg = HttpConfig::builder().header("bad header", "x").build();
        let err = build_http_client_from_config(&cfg).unwrap_err();
        assert!(matches!(err, SofaError::Configuration(_)));
    }
}
