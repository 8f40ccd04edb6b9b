//! Resources served by the API.
//!
//! Each submodule declares a record type and the schemas for its operations,
//! then ties them together by implementing [`Resource`] on a marker type. The
//! generic service, handlers and repository port are written once against
//! [`Resource`].

pub mod admin_nombramiento;
pub mod curso;
pub mod curso_grupo;
pub mod departamento;
mod estado;
pub mod presupuesto;
pub mod profesor;
pub mod proyecto;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AppError;
use crate::domain::validation::FromInput;

pub use admin_nombramiento::AdminNombramientos;
pub use curso::Cursos;
pub use curso_grupo::CursosGrupos;
pub use departamento::Departamentos;
pub use estado::{ESTADO, Estado, UnknownEstado};
pub use presupuesto::Presupuestos;
pub use profesor::Profesores;
pub use proyecto::Proyectos;

/// Update payload for a resource.
pub trait Changeset: FromInput {
    /// Whether the payload changes no column at all.
    fn is_empty(&self) -> bool;
}

/// Compile-time description of one resource.
pub trait Resource: Send + Sync + 'static {
    /// Singular display name used in not-found messages.
    const NAME: &'static str;

    /// Stored record returned to clients.
    type Record: Serialize + Clone + std::fmt::Debug + Send + Sync + 'static;
    /// Validated create payload.
    type Create: FromInput + std::fmt::Debug + Send + Sync + 'static;
    /// Validated update payload.
    type Update: Changeset + std::fmt::Debug + Send + Sync + 'static;
    /// Validated list filter, excluding pagination.
    type ListFilter: FromInput + std::fmt::Debug + Send + Sync + 'static;
    /// Validated filter for picker options.
    type SelectFilter: FromInput + std::fmt::Debug + Send + Sync + 'static;

    /// Business rules checked before inserting.
    ///
    /// # Errors
    /// Returns an [`AppError`] describing the violated rule.
    fn check_create(_input: &Self::Create) -> Result<(), AppError> {
        Ok(())
    }

    /// Business rules checked before updating.
    ///
    /// # Errors
    /// Returns an [`AppError`] describing the violated rule.
    fn check_update(_changes: &Self::Update) -> Result<(), AppError> {
        Ok(())
    }
}

/// Lightweight option for pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    /// Record identifier.
    pub id: i32,
    /// Display label.
    pub label: String,
}
