//! Credential injection.
//!
//! A client carries at most one credential form. When present it is turned
//! into an `Authorization` header on every outgoing request.

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::SofaError;

/// Stored credentials for a client instance
#[derive(Clone, Debug)]
pub enum Credentials {
    /// `Authorization: Basic <base64(username:password)>`
    Basic {
        username: String,
        password: SecretString,
    },
    /// `Authorization: Bearer <token>`
    Token(SecretString),
}

impl Credentials {
    pub fn basic<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn token<T: Into<String>>(token: T) -> Self {
        Self::Token(SecretString::from(token.into()))
    }

    /// Render the `Authorization` header value
    pub fn header_value(&self) -> Result<HeaderValue, SofaError> {
        let raw = match self {
            Self::Basic { username, password } => {
                let pair = format!("{username}:{}", password.expose_secret());
                format!("Basic {}", STANDARD.encode(pair))
            }
            Self::Token(token) => format!("Bearer {}", token.expose_secret()),
        };
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|e| SofaError::InvalidHeader(format!("Invalid credential format: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Return `headers` with the credential's `Authorization` header merged in.
///
/// The input is left untouched. Other headers are preserved; an existing
/// `Authorization` header is replaced. Without credentials the headers are
/// returned as they are.
pub fn with_credentials(
    headers: &HeaderMap,
    credentials: Option<&Credentials>,
) -> Result<HeaderMap, SofaError> {
    let mut merged = headers.clone();
    if let Some(credentials) = credentials {
        merged.insert(AUTHORIZATION, credentials.header_value()?);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    #[test]
    fn basic_credentials_are_base64_encoded() {
        let creds = Credentials::basic("foo", "bar");
        let headers = with_credentials(&HeaderMap::new(), Some(&creds)).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic Zm9vOmJhcg==");
    }

    #[test]
    fn token_credentials_use_bearer() {
        let creds = Credentials::token("t1");
        let headers = with_credentials(&HeaderMap::new(), Some(&creds)).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t1");
    }

    #[test]
    fn anonymous_leaves_headers_alone() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let merged = with_credentials(&headers, None).unwrap();
        assert_eq!(merged, headers);
        assert!(merged.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn merge_keeps_other_headers_and_input() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("AuthSession=abc"));
        let merged = with_credentials(&headers, Some(&Credentials::token("t1"))).unwrap();
        assert_eq!(merged.get("cookie").unwrap(), "AuthSession=abc");
        assert_eq!(merged.get(AUTHORIZATION).unwrap(), "Bearer t1");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn injected_authorization_replaces_caller_value() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
        let merged = with_credentials(&headers, Some(&Credentials::token("t1"))).unwrap();
        assert_eq!(merged.get(AUTHORIZATION).unwrap(), "Bearer t1");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::basic("foo", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("foo"));
        assert!(!rendered.contains("hunter2"));
    }
}
