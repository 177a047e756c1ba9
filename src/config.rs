//! Store configuration, read once at startup.
//!
//! ```toml
//! [mongo]
//! host = "db.internal"
//! port = 27017
//! database = "opentdc"
//! username = "tdc"
//! password = "${TDC_MONGO_PASSWORD}"
//!
//! [file]
//! base_path = "/srv/tdc"
//! prefix = "companies-"
//! persistent = true
//! ```
//!
//! Values from the environment override the file:
//! `TDC_MONGO_HOST`, `TDC_MONGO_PORT`, `TDC_MONGO_DATABASE`,
//! `TDC_MONGO_USERNAME`, `TDC_MONGO_PASSWORD`, `TDC_PERSISTENT`, `TDC_DATA_DIR`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tdc_core::{ServiceError, ServiceResult};
use tdc_file::FileStoreConfig;
use tdc_mongo::MongoConfig;
use tracing::debug;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "opentdc.toml";

/// Configuration for both storage flavors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// MongoDB connection settings.
    pub mongo: MongoConfig,
    /// File store settings.
    pub file: FileStoreConfig,
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> ServiceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::internal(format!("failed to read {}: {}", path.display(), e))
                .with_operation("load_config")
                .with_source(e)
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ServiceResult<Self> {
        toml::from_str(content).map_err(|e| {
            ServiceError::validation(format!("failed to parse TOML: {}", e))
                .with_operation("load_config")
                .with_source(e)
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> ServiceResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ServiceResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TDC_MONGO_HOST") {
            self.mongo.host = host;
        }
        if let Some(port) = lookup("TDC_MONGO_PORT") {
            self.mongo.port = port.trim().parse().map_err(|_| {
                ServiceError::validation(format!("TDC_MONGO_PORT is not a port number: {}", port))
            })?;
        }
        if let Some(database) = lookup("TDC_MONGO_DATABASE") {
            self.mongo.database = database;
        }
        if let Some(username) = lookup("TDC_MONGO_USERNAME") {
            self.mongo.username = Some(username);
        }
        if let Some(password) = lookup("TDC_MONGO_PASSWORD") {
            self.mongo.password = Some(password);
        }
        if let Some(persistent) = lookup("TDC_PERSISTENT") {
            self.file.persistent = parse_bool(&persistent).ok_or_else(|| {
                ServiceError::validation(format!("TDC_PERSISTENT is not a boolean: {}", persistent))
            })?;
        }
        if let Some(dir) = lookup("TDC_DATA_DIR") {
            self.file.base_path = PathBuf::from(dir);
        }
        self.validate()
    }

    /// Check values that would only fail later, at connect time.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.mongo.host.trim().is_empty() {
            return Err(ServiceError::validation("mongo.host must not be empty"));
        }
        if self.mongo.database.trim().is_empty() {
            return Err(ServiceError::validation("mongo.database must not be empty"));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
