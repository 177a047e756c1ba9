//! # tdc-core
//!
//! Shared building blocks for the OpenTDC store crates.
//!
//! This crate provides:
//! - The three-kind error vocabulary exposed to service callers
//!   ([`ServiceError`], [`ErrorKind`])
//! - Offset/limit pagination ([`Page`])
//! - Logging bootstrap controlled by environment variables ([`logging`])
//!
//! ```rust
//! use tdc_core::{ErrorKind, Page, ServiceError};
//!
//! let err = ServiceError::not_found("document 5f1d7f9e8c4b2a0012345678");
//! assert_eq!(err.kind, ErrorKind::NotFound);
//!
//! let page = Page::new(10, 0);
//! assert!(page.is_unbounded());
//! ```

pub mod error;
pub mod logging;
pub mod pagination;

pub use error::{ErrorContext, ErrorKind, ServiceError, ServiceResult};
pub use pagination::Page;
