//! sofa-core
//!
//! Resource and request primitives for a CouchDB-style HTTP API. Every
//! endpoint wrapper in `sofa` is a composition of the pieces here:
//!
//! - [`uri`]: query-string and path construction
//! - [`auth`]: Basic/Bearer credential injection
//! - [`execution`]: the request executor, response unwrapping and the
//!   injectable HTTP transport
//! - [`resource`] / [`id_resource`]: generic endpoint factories
#![deny(unsafe_code)]

pub mod auth;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod id_resource;
pub mod request;
pub mod resource;
pub mod types;
pub mod uri;

pub use auth::{Credentials, with_credentials};
pub use error::{ErrorResult, SofaError};
pub use execution::{
    Executor, HttpTransport, HttpTransportRequest, HttpTransportResponse, ReqwestTransport,
    Response, ResponseBody, ResponseFormat,
};
pub use id_resource::{IdResource, IdSource};
pub use request::{
    Body, DestroyOptions, ReadMethod, ReadOptions, Request, RequestMethod, WriteMethod,
    WriteOptions,
};
pub use resource::Resource;
pub use types::{HttpConfig, HttpConfigBuilder};
pub use uri::{DocId, Query, RevId, build_query, join_path};
