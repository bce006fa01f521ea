//! HTTP configuration types.
//!
//! `HttpConfig` and its builder configure the `reqwest` client behind the
//! default transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::defaults;

/// Settings for the default `reqwest` transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request deadline, in seconds on the wire
    #[serde(with = "secs_opt")]
    pub timeout: Option<Duration>,
    #[serde(with = "secs_opt")]
    pub connect_timeout: Option<Duration>,
    /// Added to every request unless the request sets the same header
    pub headers: HashMap<String, String>,
    /// Proxy URL applied to all schemes
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for [`HttpConfig`]; anything left unset keeps its default
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Remove both deadlines
    pub fn no_timeouts(mut self) -> Self {
        self.config.timeout = None;
        self.config.connect_timeout = None;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> HttpConfig {
        self.config
    }
}

mod secs_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_u64(d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
