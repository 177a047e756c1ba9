//! # tdc-mongo
//!
//! MongoDB adapter for OpenTDC services.
//!
//! This crate provides:
//! - [`ConnectionManager`]: configuration plus a single driver client with a
//!   serialized connect/disconnect lifecycle
//! - [`CollectionAccessor`]: list/create/read/update/delete on one named
//!   collection, with string identifiers and offset/limit pagination
//! - [`MemoryDatabase`]: an in-process backend with the same observable
//!   behavior, for transient deployments and tests
//!
//! Every accessor operation reports failures as [`tdc_core::ServiceError`]
//! with one of three kinds: validation, not-found or internal.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tdc_mongo::{CollectionAccessor, ConnectionManager, MongoConfig};
//!
//! let manager = Arc::new(ConnectionManager::new(
//!     MongoConfig::builder().database("opentdc").build()?,
//! ));
//! manager.connect().await?;
//!
//! let mut companies = CollectionAccessor::new(manager.clone());
//! companies.resolve_collection("companies")?;
//! let first_page = companies.list(0, 20).await?;
//!
//! manager.disconnect().await?;
//! ```

pub mod accessor;
pub mod client;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod memory;

pub use accessor::{CollectionAccessor, UpdateOutcome};
pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use client::{ConnectionManager, ConnectionState};
pub use collection::{CollectionSource, DocumentCollection, MongoCollection, SetResult};
pub use config::{DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, MongoConfig, MongoConfigBuilder};
pub use error::{MongoError, MongoResult};
pub use memory::{MemoryCollection, MemoryDatabase};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::accessor::{CollectionAccessor, UpdateOutcome};
    pub use crate::client::{ConnectionManager, ConnectionState};
    pub use crate::collection::{CollectionSource, DocumentCollection};
    pub use crate::config::MongoConfig;
    pub use crate::document::DocumentExt;
    pub use crate::memory::MemoryDatabase;
    pub use bson::oid::ObjectId;
    pub use bson::{Bson, Document, doc};
}
