//! Domain layer: error taxonomy, input validation, resource definitions and
//! the generic service orchestrating repository calls.
//!
//! Public surface:
//! - [`AppError`] and [`Failure`]: failures a request can end with.
//! - [`DatabaseError`] and [`map_database_error`]: storage failure
//!   classification.
//! - [`ResourceService`]: the six CRUD use-cases over any [`resources::Resource`].

pub mod error;
pub mod ports;
mod resource_service;
pub mod resources;
pub mod storage_error;
pub mod validation;

pub use self::error::{AppError, Failure, codes};
pub use self::resource_service::ResourceService;
pub use self::storage_error::{
    DatabaseError, HttpMethod, StorageDiagnostics, StorageErrorMapping, find_database_error,
    map_database_error,
};
