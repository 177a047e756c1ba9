//! File store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name of the live persistent data, after the prefix.
pub const DATA_FILE_NAME: &str = "data.json";

/// File name of the initial seed template, after the prefix.
pub const SEED_FILE_NAME: &str = "seed.json";

/// Where and whether records are kept on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Directory both files are resolved against.
    pub base_path: PathBuf,
    /// Prefix prepended to both file names (e.g. `"companies/"`).
    pub prefix: String,
    /// `true` keeps data on disk; `false` is transient (nothing read or written).
    pub persistent: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            prefix: String::new(),
            persistent: true,
        }
    }
}

impl FileStoreConfig {
    /// Persistent configuration rooted at `base_path`.
    pub fn persistent(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Transient configuration; no files are touched.
    pub fn transient() -> Self {
        Self {
            persistent: false,
            ..Self::default()
        }
    }

    /// Set the file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Path of the persistent data file.
    pub fn data_path(&self) -> PathBuf {
        self.base_path
            .join(format!("{}{}", self.prefix, DATA_FILE_NAME))
    }

    /// Path of the seed file.
    pub fn seed_path(&self) -> PathBuf {
        self.base_path
            .join(format!("{}{}", self.prefix, SEED_FILE_NAME))
    }
}
