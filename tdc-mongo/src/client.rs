//! Connection lifecycle for a single MongoDB client.
//!
//! A [`ConnectionManager`] owns at most one live driver client. Lifecycle
//! transitions (`configure`, `connect`, `disconnect`) are serialized by an
//! async mutex; collection resolution only takes a short read lock.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tdc_mongo::{ConnectionManager, MongoConfig};
//!
//! let manager = Arc::new(ConnectionManager::new(MongoConfig::default()));
//! manager.connect().await?;
//! // ... resolve collections, run operations ...
//! manager.disconnect().await?;
//! ```

use std::sync::Arc;

use bson::{Document, doc};
use mongodb::{Client, Database};
use parking_lot::RwLock;
use tdc_core::{ServiceError, ServiceResult};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::collection::{CollectionSource, DocumentCollection, MongoCollection};
use crate::config::MongoConfig;
use crate::error::{MongoError, MongoResult};

/// Where a [`ConnectionManager`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Configured, never connected.
    Configured,
    /// A client handle is live.
    Connected,
    /// The client handle was released.
    Disconnected,
}

struct Handle {
    client: Client,
    database: Database,
}

struct Inner {
    config: Arc<MongoConfig>,
    state: ConnectionState,
    handle: Option<Handle>,
}

/// Owner of the configuration and the single driver client.
pub struct ConnectionManager {
    inner: RwLock<Inner>,
    lifecycle: Mutex<()>,
}

impl ConnectionManager {
    /// Create a manager holding `config`; no connection is made yet.
    pub fn new(config: MongoConfig) -> Self {
        debug!(address = %config.address(), database = %config.database, "Connection manager configured");
        Self {
            inner: RwLock::new(Inner {
                config: Arc::new(config),
                state: ConnectionState::Configured,
                handle: None,
            }),
            lifecycle: Mutex::new(()),
        }
    }

    /// Replace the configuration. Rejected while connected.
    pub async fn configure(&self, config: MongoConfig) -> ServiceResult<()> {
        let _guard = self.lifecycle.lock().await;
        let mut inner = self.inner.write();
        if inner.handle.is_some() {
            warn!("configure(): rejected while connected");
            return Err(ServiceError::validation(
                "configuration cannot change while connected",
            )
            .with_operation("configure"));
        }

        debug!(address = %config.address(), database = %config.database, "configure()");
        inner.config = Arc::new(config);
        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> Arc<MongoConfig> {
        self.inner.read().config.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.inner.read().state
    }

    /// Whether a client handle is live.
    pub fn is_connected(&self) -> bool {
        self.inner.read().handle.is_some()
    }

    /// Establish the client handle.
    ///
    /// Connecting while already connected logs a warning and leaves the
    /// existing handle in place.
    pub async fn connect(&self) -> ServiceResult<()> {
        let _guard = self.lifecycle.lock().await;
        if self.is_connected() {
            warn!("connect(): already connected, keeping the existing client");
            return Ok(());
        }

        let config = self.config();
        if config.credentials().is_none() {
            warn!(
                address = %config.address(),
                "connect(): no credentials configured, connecting without authentication"
            );
        }

        let handle = Self::open(&config).await.map_err(|e| {
            error!(address = %config.address(), error = %e, "connect() failed");
            ServiceError::from(e).with_operation("connect")
        })?;

        let mut inner = self.inner.write();
        inner.handle = Some(handle);
        inner.state = ConnectionState::Connected;
        info!(
            address = %config.address(),
            database = %config.database,
            "connect(): MongoDB client created"
        );
        Ok(())
    }

    async fn open(config: &MongoConfig) -> MongoResult<Handle> {
        let options = config.to_client_options()?;
        let client = Client::with_options(options)
            .map_err(|e| MongoError::connection(format!("failed to create client: {}", e)))?;
        let database = client.database(&config.database);

        if config.ping_on_connect {
            database
                .run_command(doc! { "ping": 1 }, None)
                .await
                .map_err(|e| MongoError::connection(format!("ping failed: {}", e)))?;
        }

        Ok(Handle { client, database })
    }

    /// Release the client handle. A no-op (with a warning) when not connected.
    pub async fn disconnect(&self) -> ServiceResult<()> {
        let _guard = self.lifecycle.lock().await;
        let handle = {
            let mut inner = self.inner.write();
            let handle = inner.handle.take();
            if handle.is_some() {
                inner.state = ConnectionState::Disconnected;
            }
            handle
        };

        match handle {
            Some(handle) => {
                handle.client.shutdown().await;
                info!("disconnect(): MongoDB client released");
            }
            None => warn!("disconnect(): not connected, nothing to release"),
        }
        Ok(())
    }

    /// Check if the server answers a ping. `false` when disconnected.
    pub async fn is_healthy(&self) -> bool {
        let Some(database) = self.database() else {
            return false;
        };
        database.run_command(doc! { "ping": 1 }, None).await.is_ok()
    }

    /// Get the connected database handle.
    pub fn database(&self) -> Option<Database> {
        self.inner.read().handle.as_ref().map(|h| h.database.clone())
    }

    /// Get a driver-backed collection.
    pub fn collection(&self, name: &str) -> MongoResult<MongoCollection> {
        let database = self.database().ok_or(MongoError::NotConnected)?;
        Ok(MongoCollection::new(database.collection::<Document>(name)))
    }
}

impl CollectionSource for ConnectionManager {
    fn open_collection(&self, name: &str) -> MongoResult<Arc<dyn DocumentCollection>> {
        Ok(Arc::new(self.collection(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn offline_config() -> MongoConfig {
        MongoConfig::builder()
            .host("127.0.0.1")
            .port(1)
            .database("tdc_test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_manager_is_configured() {
        let manager = ConnectionManager::new(offline_config());
        assert_eq!(manager.state(), ConnectionState::Configured);
        assert!(!manager.is_connected());
        assert_eq!(manager.config().database, "tdc_test");
    }

    #[test]
    fn test_collection_requires_connection() {
        let manager = ConnectionManager::new(offline_config());
        assert!(matches!(
            manager.collection("companies"),
            Err(MongoError::NotConnected)
        ));
        assert!(manager.open_collection("companies").is_err());
    }

    #[tokio::test]
    async fn test_disconnect_without_connect_is_noop() {
        let manager = ConnectionManager::new(offline_config());
        manager.disconnect().await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Configured);
    }

    #[tokio::test]
    async fn test_configure_before_connect() {
        let manager = ConnectionManager::new(offline_config());
        let mut replacement = offline_config();
        replacement.database = "other".into();

        manager.configure(replacement).await.unwrap();
        assert_eq!(manager.config().database, "other");
    }

    #[tokio::test]
    async fn test_failed_ping_leaves_manager_disconnected() {
        let config = MongoConfig::builder()
            .host("127.0.0.1")
            .port(1)
            .database("tdc_test")
            .server_selection_timeout(Duration::from_secs(1))
            .ping_on_connect(true)
            .build()
            .unwrap();
        let manager = ConnectionManager::new(config);

        let err = manager.connect().await.unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.context.operation.as_deref(), Some("connect"));
        assert!(!manager.is_connected());
        assert_eq!(manager.state(), ConnectionState::Configured);
        assert!(manager.open_collection("companies").is_err());

        manager.disconnect().await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Configured);
    }

    #[tokio::test]
    async fn test_lifecycle_without_server() {
        // Client creation is lazy, so no server is needed unless pinging.
        let manager = ConnectionManager::new(offline_config());

        manager.connect().await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Connected);

        manager.connect().await.unwrap();
        assert!(manager.is_connected());

        let err = manager.configure(offline_config()).await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(manager.collection("companies").unwrap().name(), "companies");

        manager.disconnect().await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(!manager.is_healthy().await);

        manager.disconnect().await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }
}
