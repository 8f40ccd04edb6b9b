//! Port used by the readiness endpoint to check that storage answers.

use async_trait::async_trait;

use super::RepositoryError;

/// Trivial storage round-trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Succeed when the backing store answers a trivial query.
    async fn check(&self) -> Result<(), RepositoryError>;
}

/// Probe that always succeeds, for servers running without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReadinessProbe;

#[async_trait]
impl ReadinessProbe for FixtureReadinessProbe {
    async fn check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
