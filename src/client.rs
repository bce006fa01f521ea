//! Client entry point and builder.

use std::sync::Arc;
use std::time::Duration;

use sofa_core::execution::build_http_client_from_config;
use sofa_core::{
    Credentials, Executor, HttpConfig, HttpTransport, IdResource, ReqwestTransport, Resource,
    SofaError, join_path,
};

/// Connection settings for a [`SofaClient`]
#[derive(Debug, Clone, Default)]
pub struct SofaConfig {
    /// Host (and optional port / path prefix), or a full URL with scheme
    pub endpoint: String,
    /// Use `https://` when the endpoint has no scheme
    pub ssl: bool,
    pub credentials: Option<Credentials>,
    pub http_config: HttpConfig,
}

impl SofaConfig {
    /// Base URI every endpoint is built from
    pub fn base_uri(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            let scheme = if self.ssl { "https://" } else { "http://" };
            format!("{scheme}{endpoint}")
        }
    }
}

/// Typed client for a CouchDB-style server.
///
/// Holds no mutable state: every accessor returns a fresh resource closing
/// over the base URI, executor and credentials, so clones and concurrent
/// calls are independent.
#[derive(Debug, Clone)]
pub struct SofaClient {
    base_uri: String,
    executor: Executor,
    credentials: Option<Credentials>,
}

impl SofaClient {
    pub fn builder() -> SofaBuilder {
        SofaBuilder::new()
    }

    /// Build a client using the default `reqwest` transport
    pub fn new(config: SofaConfig) -> Result<Self, SofaError> {
        let client = build_http_client_from_config(&config.http_config)?;
        Ok(Self::with_transport(
            config,
            Arc::new(ReqwestTransport::new(client)),
        ))
    }

    /// Build a client over a caller-supplied transport
    pub fn with_transport(config: SofaConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_uri: config.base_uri(),
            executor: Executor::new(transport),
            credentials: config.credentials,
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Absolute URL for a server-relative path
    pub fn url(&self, path: &str) -> String {
        join_path(&self.base_uri, &[Some(path)])
    }

    /// Singleton resource at `path`
    pub fn resource(&self, path: &str) -> Resource {
        Resource::new(self.executor.clone(), self.url(path))
            .with_credentials(self.credentials.clone())
    }

    /// Identified resource rooted at `path`
    pub fn id_resource(&self, path: &str) -> IdResource {
        IdResource::new(self.executor.clone(), self.url(path))
            .with_credentials(self.credentials.clone())
    }
}

/// Builder for [`SofaClient`]
#[derive(Default)]
pub struct SofaBuilder {
    config: SofaConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SofaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server endpoint (`localhost:5984` or `https://db.example.com`)
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn ssl(mut self, ssl: bool) -> Self {
        self.config.ssl = ssl;
        self
    }

    /// Authenticate every request with HTTP Basic auth
    pub fn basic_auth<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.config.credentials = Some(Credentials::basic(username, password));
        self
    }

    /// Authenticate every request with a bearer token
    pub fn token_auth<T: Into<String>>(mut self, token: T) -> Self {
        self.config.credentials = Some(Credentials::token(token));
        self
    }

    pub fn credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.config.credentials = credentials;
        self
    }

    pub fn http_config(mut self, http_config: HttpConfig) -> Self {
        self.config.http_config = http_config;
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http_config.timeout = Some(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.http_config.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the HTTP transport (the `http_config` is then unused)
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<SofaClient, SofaError> {
        if self.config.endpoint.trim().is_empty() {
            return Err(SofaError::Configuration(
                "Endpoint not specified".to_string(),
            ));
        }
        match self.transport {
            Some(transport) => Ok(SofaClient::with_transport(self.config, transport)),
            None => SofaClient::new(self.config),
        }
    }
}
