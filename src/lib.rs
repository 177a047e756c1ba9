//! # OpenTDC Store
//!
//! Storage adapters for OpenTDC services.
//!
//! OpenTDC Store provides:
//! - A MongoDB connection manager and named-collection CRUD accessor
//!   translating offset/limit pagination and string identifiers into driver
//!   calls ([`mongo`])
//! - A file-backed JSON import/export store with first-run seeding ([`file`])
//! - A shared three-kind error vocabulary: validation, not-found, internal
//! - Configuration loaded from TOML with environment overrides ([`StoreConfig`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use opentdc_store::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServiceError> {
//!     opentdc_store::logging::init();
//!
//!     let mut config = StoreConfig::load("opentdc.toml".as_ref())?;
//!     config.apply_env_overrides()?;
//!
//!     let manager = Arc::new(ConnectionManager::new(config.mongo));
//!     manager.connect().await?;
//!
//!     let mut companies = CollectionAccessor::new(manager.clone());
//!     companies.resolve_collection("companies")?;
//!     let id = companies.create(doc! { "title": "Arbalo AG" }).await?;
//!     companies.update(&id, doc! { "city": "Zug" }).await?;
//!
//!     manager.disconnect().await
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;

/// MongoDB connection manager and collection accessor.
pub mod mongo {
    pub use tdc_mongo::*;
}

/// File-backed JSON store.
pub mod file {
    pub use tdc_file::*;
}

pub use config::{CONFIG_FILE_NAME, StoreConfig};
pub use tdc_core::{ErrorContext, ErrorKind, Page, ServiceError, ServiceResult, logging};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use tdc_core::{ErrorKind, Page, ServiceError, ServiceResult};
    pub use tdc_file::{FileStoreConfig, JsonFileStore};
    pub use tdc_mongo::prelude::*;
}
