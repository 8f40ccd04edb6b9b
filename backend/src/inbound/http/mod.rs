//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod resources;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;
