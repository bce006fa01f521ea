//! # Sofa - A typed client for CouchDB-style HTTP APIs
//!
//! Every endpoint is a thin composition over the primitives in
//! [`sofa_core`]: a query/path builder, credential injection, a request
//! executor with response negotiation, and two resource factories.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sofa::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SofaError> {
//!     let client = SofaClient::builder()
//!         .endpoint("localhost:5984")
//!         .basic_auth("admin", "secret")
//!         .build()?;
//!
//!     let shop = client.db("shop");
//!     shop.create(WriteOptions::new()).await?;
//!     shop.doc()
//!         .create(WriteOptions::new().id("apple").data(serde_json::json!({"price": 3})))
//!         .await?;
//!
//!     let login = client.session().login("admin", "secret").await?;
//!     println!("token: {:?}", login.token);
//!     Ok(())
//! }
//! ```
//!
//! ## Transports
//!
//! Requests go through an [`HttpTransport`]. The default is backed by
//! `reqwest`; inject another with [`SofaBuilder::transport`]. The
//! `testing` feature of `sofa-core` provides an in-memory recording
//! transport for unit tests.
#![deny(unsafe_code)]

pub mod attachment;
pub mod client;
pub mod cluster;
pub mod config;
pub mod db;
pub mod doc;
pub mod query;
pub mod replication;
pub mod reshard;
pub mod scheduler;
pub mod server;
pub mod session;
pub mod users;
pub mod view;

pub use sofa_core;

pub use attachment::{Attachment, AttachmentManager};
pub use client::{SofaBuilder, SofaClient, SofaConfig};
pub use cluster::{
    ClusterSetup, ClusterSetupAction, ClusterSetupOptions, ClusterSetupState, ClusterSetupStatus,
};
pub use config::{LOCAL_NODE, NodeConfig};
pub use db::{DbInfo, DbManager, IndexManager, OkResponse, SecurityObject, Setting, Shards, ViewEndpoint};
pub use doc::{CopyOptions, DocManager, DocWriteResult, id_from_doc};
pub use query::{
    Condition, ConditionOperator, FindRequest, FindResult, Selector, SelectorOperator, SortBy,
    SortDirection,
};
pub use replication::{ActiveTask, ReplicateOptions, Replication, ReplicationStatus};
pub use reshard::{Reshard, ReshardJobCreateOptions, ReshardRunState, ReshardState};
pub use scheduler::{Paging, Scheduler, SchedulerDoc, SchedulerJob};
pub use server::{Membership, ServerInfo};
pub use session::{Login, Session, SessionInfo, UserContext, session_cookie};
pub use sofa_core::{
    Body, Credentials, DestroyOptions, ErrorResult, HttpConfig, HttpConfigBuilder, HttpTransport,
    IdResource, IdSource, Query, ReadMethod, ReadOptions, Request, RequestMethod, Resource,
    Response, ResponseBody, SofaError, WriteMethod, WriteOptions,
};
pub use users::{USER_ID_PREFIX, User, id_from_user, user_id};
pub use view::{DesignDoc, ViewFuncs, ViewFunction, ViewResult, ViewRow};

pub mod prelude {
    pub use crate::client::{SofaBuilder, SofaClient};
    pub use crate::db::DbManager;
    pub use crate::doc::{CopyOptions, DocManager};
    pub use crate::query::{Condition, ConditionOperator, FindRequest, Selector, SortDirection};
    pub use crate::replication::ReplicateOptions;
    pub use crate::session::Session;
    pub use sofa_core::{
        Body, DestroyOptions, Query, ReadOptions, Response, SofaError, WriteMethod, WriteOptions,
    };
}
