//! Response unwrapping.
//!
//! Decides how a response body is decoded, turns error statuses into
//! [`SofaError`], and lifts the session token out of `Set-Cookie`.

use bytes::Bytes;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::defaults::{SESSION_COOKIE, content_type};
use crate::error::{ErrorResult, SofaError};
use crate::execution::transport::HttpTransportResponse;
use crate::request::RequestMethod;

/// How a response body is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Text,
    Binary,
}

impl ResponseFormat {
    /// JSON when the negotiated content type is JSON or the method is not
    /// GET; text for `text/html` and `text/plain`; binary otherwise.
    pub fn negotiate(method: RequestMethod, content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if mime == content_type::JSON || method != RequestMethod::Get {
            Self::Json
        } else if mime == content_type::TEXT_HTML || mime == content_type::TEXT_PLAIN {
            Self::Text
        } else {
            Self::Binary
        }
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Binary(Bytes),
}

/// A successful response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ResponseBody,
    /// Value of the `AuthSession` cookie when the server set one
    pub session_token: Option<String>,
}

impl Response {
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.body {
            ResponseBody::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a JSON body into `T`.
    ///
    /// Text and binary bodies are parsed as JSON text.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, SofaError> {
        match self.body {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseBody::Text(text) => Ok(serde_json::from_str(&text)?),
            ResponseBody::Binary(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }
}

/// Extract the `AuthSession` token from the `Set-Cookie` headers
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie| cookie.split(';'))
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(prefix.as_str())
                .filter(|token| !token.is_empty())
        })
        .map(str::to_string)
}

fn decode_json(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

/// Turn a transport response into a decoded [`Response`] or an error
pub fn unwrap_response(
    resp: HttpTransportResponse,
    format: ResponseFormat,
) -> Result<Response, SofaError> {
    if !resp.is_success() {
        if format == ResponseFormat::Json {
            if let Ok(mut result) = serde_json::from_slice::<ErrorResult>(&resp.body) {
                result.status = resp.status;
                return Err(SofaError::Api(result));
            }
        }
        return Err(SofaError::RawHttp {
            status: resp.status,
            body: resp.body,
        });
    }

    let (body, session_token) = match format {
        ResponseFormat::Json => (
            ResponseBody::Json(decode_json(&resp.body)?),
            session_token(&resp.headers),
        ),
        ResponseFormat::Text => (
            ResponseBody::Text(String::from_utf8_lossy(&resp.body).into_owned()),
            None,
        ),
        ResponseFormat::Binary => (ResponseBody::Binary(resp.body), None),
    };

    Ok(Response {
        status: resp.status,
        headers: resp.headers,
        body,
        session_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn response(status: u16, body: &'static [u8]) -> HttpTransportResponse {
        HttpTransportResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn negotiates_by_content_type_and_method() {
        use RequestMethod::*;
        assert_eq!(ResponseFormat::negotiate(Get, "application/json"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::negotiate(Get, "text/html"), ResponseFormat::Text);
        assert_eq!(
            ResponseFormat::negotiate(Get, "text/plain; charset=utf-8"),
            ResponseFormat::Text
        );
        assert_eq!(ResponseFormat::negotiate(Get, "image/png"), ResponseFormat::Binary);
        assert_eq!(ResponseFormat::negotiate(Put, "image/png"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::negotiate(Head, "image/png"), ResponseFormat::Json);
    }

    #[test]
    fn json_error_carries_status() {
        let err = unwrap_response(
            response(409, br#"{"error":"conflict","reason":"Document update conflict."}"#),
            ResponseFormat::Json,
        )
        .unwrap_err();
        let result = err.error_result().unwrap();
        assert_eq!(result.status, 409);
        assert_eq!(result.error, "conflict");
        assert_eq!(result.reason, "Document update conflict.");
    }

    #[test]
    fn non_json_error_surfaces_raw_body() {
        let err = unwrap_response(response(404, b"missing"), ResponseFormat::Binary).unwrap_err();
        match err {
            SofaError::RawHttp { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(&body[..], b"missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn undecodable_json_error_falls_back_to_raw() {
        let err = unwrap_response(response(500, b"<html>boom</html>"), ResponseFormat::Json)
            .unwrap_err();
        assert!(matches!(err, SofaError::RawHttp { status: 500, .. }));
    }

    #[test]
    fn success_decodes_by_format() {
        let ok = unwrap_response(response(200, br#"{"ok":true}"#), ResponseFormat::Json).unwrap();
        assert_eq!(ok.json(), Some(&json!({"ok": true})));

        let text = unwrap_response(response(200, b"<p>hi</p>"), ResponseFormat::Text).unwrap();
        assert_eq!(text.text(), Some("<p>hi</p>"));

        let bin = unwrap_response(response(200, b"\x89PNG"), ResponseFormat::Binary).unwrap();
        assert_eq!(bin.bytes().map(|b| &b[..]), Some(&b"\x89PNG"[..]));
    }

    #[test]
    fn empty_json_body_is_null() {
        let head = unwrap_response(response(200, b""), ResponseFormat::Json).unwrap();
        assert_eq!(head.json(), Some(&Value::Null));
    }

    #[test]
    fn session_token_is_lifted_from_set_cookie() {
        let mut resp = response(200, br#"{"ok":true,"name":"root"}"#);
        resp.headers.append(SET_COOKIE, HeaderValue::from_static("other=1; Path=/"));
        resp.headers.append(
            SET_COOKIE,
            HeaderValue::from_static("AuthSession=cm9vdDo1MEJG; Version=1; Path=/; HttpOnly"),
        );
        let ok = unwrap_response(resp, ResponseFormat::Json).unwrap();
        assert_eq!(ok.session_token.as_deref(), Some("cm9vdDo1MEJG"));
        assert_eq!(ok.json(), Some(&json!({"ok": true, "name": "root"})));
    }

    #[test]
    fn cleared_cookie_is_not_a_token() {
        let mut resp = response(200, br#"{"ok":true}"#);
        resp.headers.append(
            SET_COOKIE,
            HeaderValue::from_static("AuthSession=; Version=1; Path=/; HttpOnly"),
        );
        let ok = unwrap_response(resp, ResponseFormat::Json).unwrap();
        assert!(ok.session_token.is_none());
    }

    #[test]
    fn no_cookie_means_no_token() {
        let ok = unwrap_response(response(200, b"{}"), ResponseFormat::Json).unwrap();
        assert!(ok.session_token.is_none());
    }

    #[test]
    fn into_json_deserializes() {
        #[derive(serde::Deserialize)]
        struct Uuids {
            uuids: Vec<String>,
        }
        let ok = unwrap_response(response(200, br#"{"uuids":["a","b"]}"#), ResponseFormat::Json)
            .unwrap();
        let parsed: Uuids = ok.into_json().unwrap();
        assert_eq!(parsed.uuids, vec!["a", "b"]);
    }
}
