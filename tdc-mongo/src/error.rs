//! Error types for MongoDB operations.

use tdc_core::ServiceError;
use thiserror::Error;

/// Result type for MongoDB operations.
pub type MongoResult<T> = Result<T, MongoError>;

/// Errors that can occur during MongoDB operations.
#[derive(Error, Debug)]
pub enum MongoError {
    /// MongoDB driver error.
    #[error("mongodb error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Operation attempted without a live client.
    #[error("not connected: call connect() first")]
    NotConnected,

    /// Invalid ObjectId.
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MongoError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an invalid object id error.
    pub fn invalid_object_id(message: impl Into<String>) -> Self {
        Self::InvalidObjectId(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::NotConnected)
    }
}

impl From<MongoError> for ServiceError {
    fn from(err: MongoError) -> Self {
        match err {
            MongoError::InvalidObjectId(msg) => {
                ServiceError::validation(format!("invalid identifier: {}", msg))
            }
            MongoError::Driver(e) => ServiceError::internal(e.to_string()).with_source(e),
            other => ServiceError::internal(other.to_string()),
        }
    }
}
