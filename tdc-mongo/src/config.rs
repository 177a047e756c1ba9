//! MongoDB connection configuration.

use std::fmt;
use std::time::Duration;

use mongodb::options::{ClientOptions, Credential, ServerAddress};
use serde::{Deserialize, Serialize};

use crate::error::{MongoError, MongoResult};

/// Default server host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default server port.
pub const DEFAULT_PORT: u16 = 27017;

/// Default database name.
pub const DEFAULT_DATABASE: &str = "opentdc";

/// MongoDB connection configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Username; authentication is used only when both username and password are non-empty.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Application name (shown in server logs).
    pub app_name: Option<String>,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Server selection timeout in seconds.
    pub server_selection_timeout_secs: Option<u64>,
    /// Ping the server during `connect()` so unreachable servers fail early.
    pub ping_on_connect: bool,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            username: None,
            password: None,
            app_name: Some("opentdc".to_string()),
            connect_timeout_secs: Some(10),
            server_selection_timeout_secs: Some(30),
            ping_on_connect: false,
        }
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("app_name", &self.app_name)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .field("ping_on_connect", &self.ping_on_connect)
            .finish()
    }
}

impl MongoConfig {
    /// Create a configuration for a host, port and database.
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            ..Self::default()
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> MongoConfigBuilder {
        MongoConfigBuilder::new()
    }

    /// The credentials, if both username and password are non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// `host:port` of the server.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Convert to MongoDB ClientOptions.
    pub fn to_client_options(&self) -> MongoResult<ClientOptions> {
        let address = ServerAddress::parse(self.address())
            .map_err(|e| MongoError::config(format!("invalid server address: {}", e)))?;

        let mut options = ClientOptions::builder().hosts(vec![address]).build();

        if let Some(ref app_name) = self.app_name {
            options.app_name = Some(app_name.clone());
        }

        if let Some(secs) = self.connect_timeout_secs {
            options.connect_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(secs) = self.server_selection_timeout_secs {
            options.server_selection_timeout = Some(Duration::from_secs(secs));
        }

        if let Some((user, pass)) = self.credentials() {
            options.credential = Some(
                Credential::builder()
                    .username(user.to_string())
                    .password(pass.to_string())
                    .source(self.database.clone())
                    .build(),
            );
        }

        Ok(options)
    }
}

/// Builder for MongoDB configuration.
#[derive(Debug, Default)]
pub struct MongoConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    app_name: Option<String>,
    connect_timeout_secs: Option<u64>,
    server_selection_timeout_secs: Option<u64>,
    ping_on_connect: Option<bool>,
}

impl MongoConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout_secs = Some(duration.as_secs());
        self
    }

    /// Set the server selection timeout.
    pub fn server_selection_timeout(mut self, duration: Duration) -> Self {
        self.server_selection_timeout_secs = Some(duration.as_secs());
        self
    }

    /// Ping the server while connecting.
    pub fn ping_on_connect(mut self, enabled: bool) -> Self {
        self.ping_on_connect = Some(enabled);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MongoResult<MongoConfig> {
        let defaults = MongoConfig::default();

        let host = self.host.unwrap_or(defaults.host);
        if host.trim().is_empty() {
            return Err(MongoError::config("host must not be empty"));
        }

        let database = self.database.unwrap_or(defaults.database);
        if database.trim().is_empty() {
            return Err(MongoError::config("database name must not be empty"));
        }

        Ok(MongoConfig {
            host,
            port: self.port.unwrap_or(defaults.port),
            database,
            username: self.username,
            password: self.password,
            app_name: self.app_name.or(defaults.app_name),
            connect_timeout_secs: self.connect_timeout_secs.or(defaults.connect_timeout_secs),
            server_selection_timeout_secs: self
                .server_selection_timeout_secs
                .or(defaults.server_selection_timeout_secs),
            ping_on_connect: self.ping_on_connect.unwrap_or(defaults.ping_on_connect),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MongoConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 27017);
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = MongoConfig::builder()
            .host("db.internal")
            .port(27018)
            .database("tdc")
            .app_name("test-app")
            .build()
            .unwrap();

        assert_eq!(config.address(), "db.internal:27018");
        assert_eq!(config.database, "tdc");
        assert_eq!(config.app_name, Some("test-app".to_string()));
    }

    #[test]
    fn test_config_builder_rejects_empty_database() {
        let result = MongoConfig::builder().database("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let mut config = MongoConfig::default();
        config.username = Some("admin".into());
        assert!(config.credentials().is_none());

        config.password = Some(String::new());
        assert!(config.credentials().is_none());

        config.password = Some("secret".into());
        assert_eq!(config.credentials(), Some(("admin", "secret")));
    }

    #[test]
    fn test_client_options_carry_credential() {
        let config = MongoConfig::builder()
            .username("admin")
            .password("secret")
            .build()
            .unwrap();
        let options = config.to_client_options().unwrap();

        assert_eq!(options.hosts.len(), 1);
        let credential = options.credential.expect("credential");
        assert_eq!(credential.username.as_deref(), Some("admin"));
        assert_eq!(credential.source.as_deref(), Some(DEFAULT_DATABASE));
    }

    #[test]
    fn test_client_options_without_credential() {
        let options = MongoConfig::default().to_client_options().unwrap();
        assert!(options.credential.is_none());
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MongoConfig::builder().password("hunter2").build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
    }
}
