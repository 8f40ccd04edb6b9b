//! Backend library modules.
//!
//! Layout follows ports and adapters: `domain` owns validation, the error
//! taxonomy and the generic service; `inbound` exposes it over HTTP;
//! `outbound` implements the repository port against PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
