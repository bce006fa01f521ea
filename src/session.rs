//! Cookie sessions (`/_session`).

use serde::{Deserialize, Serialize};
use sofa_core::defaults::SESSION_COOKIE;
use sofa_core::{DestroyOptions, ReadOptions, Resource, Response, SofaError, WriteOptions};

use crate::client::SofaClient;

/// Identity attached to a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContext {
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub db: Option<String>,
}

/// Authentication details from `GET /_session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthInfo {
    pub authenticated: Option<String>,
    pub authentication_db: Option<String>,
    pub authentication_handlers: Vec<String>,
}

/// `GET /_session` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    pub ok: bool,
    #[serde(rename = "userCtx")]
    pub user_ctx: UserContext,
    pub info: AuthInfo,
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq)]
pub struct Login {
    pub name: Option<String>,
    pub roles: Vec<String>,
    /// Value of the `AuthSession` cookie, when the server set one
    pub token: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoginBody {
    name: Option<String>,
    roles: Vec<String>,
}

/// The session endpoint
#[derive(Debug, Clone)]
pub struct Session {
    session: Resource,
}

impl Session {
    pub fn new(session: Resource) -> Self {
        Self { session }
    }

    pub async fn read(&self, options: ReadOptions) -> Result<Response, SofaError> {
        self.session.read(options).await
    }

    pub async fn create(&self, options: WriteOptions) -> Result<Response, SofaError> {
        self.session.create(options).await
    }

    pub async fn destroy(&self, options: DestroyOptions) -> Result<Response, SofaError> {
        self.session.destroy(options).await
    }

    /// Form login; the cookie token comes back on [`Login::token`]
    pub async fn login(&self, name: &str, password: &str) -> Result<Login, SofaError> {
        let resp = self
            .create(WriteOptions::new().form([("name", name), ("password", password)]))
            .await?;
        let token = resp.session_token.clone();
        tracing::debug!(user = name, cookie = token.is_some(), "session login succeeded");
        let body: LoginBody = if matches!(resp.json(), None | Some(serde_json::Value::Null)) {
            LoginBody::default()
        } else {
            resp.into_json()?
        };
        Ok(Login {
            name: body.name,
            roles: body.roles,
            token,
        })
    }

    /// Who the server thinks the caller is
    pub async fn whoami(&self) -> Result<SessionInfo, SofaError> {
        self.read(ReadOptions::new()).await?.into_json()
    }

    /// Same as [`Session::whoami`] but authenticated by a session token
    pub async fn whoami_with(&self, token: &str) -> Result<SessionInfo, SofaError> {
        self.read(ReadOptions::new().header("cookie", &session_cookie(token))?)
            .await?
            .into_json()
    }

    pub async fn logout(&self) -> Result<Response, SofaError> {
        self.destroy(DestroyOptions::new()).await
    }
}

/// `Cookie` header value carrying a session token
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}")
}

impl SofaClient {
    pub fn session(&self) -> Session {
        Session::new(self.resource("_session"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
    use serde_json::json;
    use sofa_core::execution::testing::RecordingTransport;
    use sofa_core::{HttpTransportResponse, RequestMethod};
    use std::sync::Arc;

    fn client(transport: &Arc<RecordingTransport>) -> SofaClient {
        SofaClient::builder()
            .endpoint("localhost:5984")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn login_posts_form_and_returns_token() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            SET_COOKIE,
            HeaderValue::from_static("AuthSession=abc123; Version=1; Path=/; HttpOnly"),
        );
        let transport = RecordingTransport::respond_with(HttpTransportResponse {
            status: 200,
            headers,
            body: Bytes::from(r#"{"ok":true,"name":"foo","roles":["_admin"]}"#),
        });

        let login = client(&transport).session().login("foo", "b&r").await.unwrap();
        assert_eq!(login.token.as_deref(), Some("abc123"));
        assert_eq!(login.name.as_deref(), Some("foo"));
        assert_eq!(login.roles, vec!["_admin".to_string()]);

        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Post);
        assert_eq!(sent.url, "http://localhost:5984/_session");
        assert_eq!(
            sent.headers.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded; charset=utf-8"
        );
        assert_eq!(sent.body.as_deref(), Some(&b"name=foo&password=b%26r"[..]));
    }

    #[tokio::test]
    async fn whoami_decodes_user_ctx() {
        let transport = RecordingTransport::ok_json(json!({
            "ok": true,
            "userCtx": {"name": "foo", "roles": ["_admin"]},
            "info": {"authenticated": "cookie", "authentication_handlers": ["cookie", "default"]}
        }));
        let info = client(&transport).session().whoami_with("abc123").await.unwrap();
        assert_eq!(info.user_ctx.name.as_deref(), Some("foo"));
        assert_eq!(info.info.authenticated.as_deref(), Some("cookie"));
        assert_eq!(
            transport.last().unwrap().headers.get(COOKIE).unwrap(),
            "AuthSession=abc123"
        );
    }

    #[tokio::test]
    async fn logout_deletes_session() {
        let transport = RecordingTransport::ok_json(json!({"ok": true}));
        client(&transport).session().logout().await.unwrap();
        let sent = transport.last().unwrap();
        assert_eq!(sent.method, RequestMethod::Delete);
        assert_eq!(sent.url, "http://localhost:5984/_session");
    }

    #[test]
    fn cookie_format() {
        assert_eq!(session_cookie("t"), "AuthSession=t");
    }
}
