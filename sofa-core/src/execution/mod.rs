//! Request execution
//!
//! - `transport`: the injectable HTTP capability and its `reqwest` default
//! - `executor`: content-type defaults, body encoding, dispatch
//! - `response`: format negotiation, error normalization, session token
//! - `client`: `reqwest::Client` construction from `HttpConfig`
//! - `testing`: recording transport for tests (`testing` feature)

pub mod client;
pub mod executor;
pub mod response;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use client::build_http_client_from_config;
pub use executor::Executor;
pub use response::{Response, ResponseBody, ResponseFormat};
pub use transport::{HttpTransport, HttpTransportRequest, HttpTransportResponse, ReqwestTransport};
