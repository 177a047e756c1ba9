//! Error types surfaced to service callers.
//!
//! Every failure of the store crates collapses into one of three kinds:
//!
//! - [`ErrorKind::Validation`]: the caller supplied invalid input (an empty
//!   collection name, a malformed identifier). Never retried.
//! - [`ErrorKind::NotFound`]: no record matched. An expected outcome rather
//!   than a defect.
//! - [`ErrorKind::Internal`]: the store or its driver failed. Propagated
//!   unchanged; retrying is the caller's decision.
//!
//! ```rust
//! use tdc_core::{ErrorKind, ServiceError};
//!
//! let err = ServiceError::validation("collection name must not be empty")
//!     .with_operation("resolve_collection");
//!
//! assert!(err.is_validation());
//! assert_eq!(err.kind.http_status(), 400);
//! assert_eq!(err.context.operation.as_deref(), Some("resolve_collection"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for store operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The kind of failure, for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid caller input.
    Validation,
    /// No matching record.
    NotFound,
    /// Infrastructure or driver failure.
    Internal,
}

impl ErrorKind {
    /// Short machine-readable code (e.g. `"not_found"`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }

    /// Get a short description of the kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid input",
            Self::NotFound => "Record not found",
            Self::Internal => "Internal error",
        }
    }

    /// The conventional HTTP status a handler one layer up would answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The collection involved.
    pub collection: Option<String>,
    /// The record identifier involved.
    pub id: Option<String>,
}

impl ErrorContext {
    /// Create new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation.
    pub fn operation(mut self, op: impl Into<String>) -> Self {
        self.operation = Some(op.into());
        self
    }

    /// Set the collection.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the record identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Error returned by every store operation.
#[derive(Error, Debug)]
pub struct ServiceError {
    /// The error kind.
    pub kind: ErrorKind,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)
    }
}

impl ServiceError {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not found error for the described record.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", what.into()))
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Add the operation name.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.context.collection = Some(collection.into());
        self
    }

    /// Add the record identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.context.id = Some(id.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Check if this is an internal error.
    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Internal
    }

    /// Render the error with its context on one line, for log output.
    pub fn display_full(&self) -> String {
        let mut output = self.to_string();
        if let Some(ref op) = self.context.operation {
            output.push_str(&format!(" (operation: {})", op));
        }
        if let Some(ref collection) = self.context.collection {
            output.push_str(&format!(" (collection: {})", collection));
        }
        if let Some(ref id) = self.context.id {
            output.push_str(&format!(" (id: {})", id));
        }
        if let Some(ref source) = self.source {
            output.push_str(&format!(": {}", source));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(ErrorKind::Validation.code(), "validation");
        assert_eq!(ErrorKind::NotFound.code(), "not_found");
        assert_eq!(ErrorKind::Internal.code(), "internal");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorKind::Validation.http_status(), 400);
        assert_eq!(ErrorKind::NotFound.http_status(), 404);
        assert_eq!(ErrorKind::Internal.http_status(), 500);
    }

    #[test]
    fn test_constructors() {
        assert!(ServiceError::validation("bad").is_validation());
        assert!(ServiceError::not_found("document").is_not_found());
        assert!(ServiceError::internal("boom").is_internal());
    }

    #[test]
    fn test_display() {
        let err = ServiceError::not_found("document abc");
        assert_eq!(err.to_string(), "[not_found] document abc not found");
    }

    #[test]
    fn test_context_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = ServiceError::internal("export failed")
            .with_operation("export_to")
            .with_collection("companies")
            .with_id("42")
            .with_source(io);

        assert_eq!(err.context.operation.as_deref(), Some("export_to"));
        assert_eq!(err.context.collection.as_deref(), Some("companies"));

        let full = err.display_full();
        assert!(full.contains("export_to"));
        assert!(full.contains("companies"));
        assert!(full.contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
