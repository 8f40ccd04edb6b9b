//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod readiness_probe;
mod resource_repository;

#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::{FixtureReadinessProbe, ReadinessProbe};
pub use resource_repository::{RecordPage, RepositoryError, ResourceRepository};
