//! Error types for file store operations.

use std::path::PathBuf;

use tdc_core::ServiceError;
use thiserror::Error;

/// Result type for file store operations.
pub type FileResult<T> = Result<T, FileStoreError>;

/// Errors that can occur while importing or exporting records.
#[derive(Error, Debug)]
pub enum FileStoreError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of the expected records.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Moving the temporary file over the data file failed.
    #[error("failed to replace {}: {source}", path.display())]
    Persist {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl FileStoreError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error for `path`.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// The file involved.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } | Self::Persist { path, .. } => path,
        }
    }
}

impl From<FileStoreError> for ServiceError {
    fn from(err: FileStoreError) -> Self {
        ServiceError::internal(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_file() {
        let err = FileStoreError::io(
            "/srv/tdc/data.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/srv/tdc/data.json"));
        assert_eq!(err.path(), std::path::Path::new("/srv/tdc/data.json"));
    }

    #[test]
    fn test_into_service_error_is_internal() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: ServiceError = FileStoreError::json("seed.json", source).into();
        assert!(err.is_internal());
        assert!(err.message.contains("seed.json"));
    }
}
