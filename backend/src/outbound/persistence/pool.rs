//! bb8 pool of `diesel-async` PostgreSQL connections.
//!
//! Repositories hold a cloned [`DbPool`] and check out one connection per
//! operation; the guard returns it to the pool on drop.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

define_port_error! {
    /// Failures building the pool or checking out a connection.
    pub enum PoolError {
        /// Initial connections could not be opened.
        Build { message: String } => "failed to build connection pool: {message}",
        /// No connection became free in time.
        Checkout { message: String } => "failed to get connection from pool: {message}",
    }
}

/// Where to connect and how many connections to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_idle: u32,
    /// How long a checkout may wait for a free connection.
    pub checkout_timeout: Duration,
}

impl PoolConfig {
    /// Pool size when unconfigured.
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_IDLE: u32 = 2;
    const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Defaults for everything but the URL.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            min_idle: Self::DEFAULT_MIN_IDLE,
            checkout_timeout: Self::DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the pool size. Idle connections never exceed the cap.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self.min_idle = self.min_idle.min(self.max_connections);
        self
    }
}

/// Shared handle to the PostgreSQL pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open the idle connections.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the initial connections fail.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_idle))
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection for one repository operation.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none frees up within the
    /// checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
