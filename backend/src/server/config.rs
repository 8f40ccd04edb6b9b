//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use sac_backend::outbound::persistence::{DbPool, PoolConfig, PoolError};
use sac_backend::settings::{Settings, SettingsError};

/// Failures while turning [`Settings`] into a [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    /// A setting failed to parse.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The connection pool could not be built.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Everything [`super::create_server`] needs to start listening.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) expose_error_details: bool,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Resolve the bind address and error policy and build the lazy pool.
    ///
    /// # Errors
    /// Returns [`ServerConfigError`] when a setting fails to parse or the
    /// database URL is malformed.
    pub fn from_settings(settings: &Settings) -> Result<Self, ServerConfigError> {
        let environment = settings.environment()?;
        let pool_config = PoolConfig::new(settings.database_url())
            .with_max_connections(settings.db_max_connections())
            .with_acquire_timeout(settings.db_acquire_timeout());
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            expose_error_details: environment.exposes_error_details(),
            db_pool: DbPool::connect_lazy(&pool_config)?,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
