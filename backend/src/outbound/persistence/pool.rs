//! PostgreSQL connection pool built on `sqlx`.
//!
//! The pool connects lazily: building it never touches the network, so the
//! server can start (and answer liveness probes) while the database is still
//! coming up. Connection failures surface on first use as storage errors with
//! a connection-class SQLSTATE.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors that can occur while building the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool could not be constructed, usually because the URL is malformed.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Driver message.
        message: String,
    },
}

impl PoolError {
    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sac_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://sac@localhost/sac")
///     .with_max_connections(20)
///     .with_acquire_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_connections(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PoolConfig {
    /// Create a configuration for `database_url` with 10 connections and a
    /// five second acquire timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Set how long a checkout may wait before failing.
    #[must_use]
    pub const fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Checkout timeout.
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }
}

/// Shared handle to the PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct DbPool {
    inner: PgPool,
}

impl DbPool {
    /// Build a lazily connecting pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the database URL cannot be parsed.
    pub fn connect_lazy(config: &PoolConfig) -> Result<Self, PoolError> {
        let inner = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.database_url)
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Underlying `sqlx` pool, used as a query executor.
    #[must_use]
    pub const fn pg(&self) -> &PgPool {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_config_default_values() {
        let config = PoolConfig::new("postgres://localhost/test");

        assert_eq!(config.database_url(), "postgres://localhost/test");
        assert_eq!(config.max_connections(), 10);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn pool_config_builder_pattern() {
        let config = PoolConfig::new("postgres://localhost/test")
            .with_max_connections(20)
            .with_acquire_timeout(Duration::from_secs(60));

        assert_eq!(config.max_connections(), 20);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(60));
    }

    #[rstest]
    fn malformed_url_fails_to_build() {
        let err = DbPool::connect_lazy(&PoolConfig::new("not a url")).expect_err("bad url");
        assert!(matches!(err, PoolError::Build { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn lazy_pool_builds_without_a_server() {
        let pool = DbPool::connect_lazy(&PoolConfig::new("postgres://sac@127.0.0.1:1/sac"));
        assert!(pool.is_ok());
    }
}
