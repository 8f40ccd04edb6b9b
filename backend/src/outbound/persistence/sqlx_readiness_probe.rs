//! Readiness probe issuing `SELECT 1` through the pool.

use async_trait::async_trait;

use crate::domain::ports::{ReadinessProbe, RepositoryError};

use super::pool::DbPool;
use super::sqlx_error_mapping::map_sqlx_error;

/// Checks that a pooled connection can run a trivial query.
#[derive(Debug, Clone)]
pub struct SqlxReadinessProbe {
    pool: DbPool,
}

impl SqlxReadinessProbe {
    /// Create a probe backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessProbe for SqlxReadinessProbe {
    async fn check(&self) -> Result<(), RepositoryError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.pg())
            .await
            .map(drop)
            .map_err(|err| map_sqlx_error("readiness check", err))
    }
}
