//! Academic departments.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, ESTADO, Estado, Resource};
use crate::domain::validation::common::SEARCH;
use crate::domain::validation::{
    Field, FromInput, Issues, RawInput, SearchTerm, TextField, ValidationFailure,
};

const NOMBRE: TextField = TextField::new("nombre", 100);

/// Stored department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Departamento {
    /// Identifier.
    pub id: i32,
    /// Unique name.
    pub nombre: String,
    /// Status.
    pub estado: Estado,
}

/// Create payload: `nombre` is required, `estado` defaults to `Activo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDepartamento {
    /// Trimmed name.
    pub nombre: String,
    /// Status.
    pub estado: Estado,
}

impl FromInput for CreateDepartamento {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let nombre = issues.take(NOMBRE.required(input));
        let estado = issues.take(ESTADO.or_default(input, Estado::Activo));
        issues.finish(|| {
            Some(Self {
                nombre: nombre?,
                estado: estado?,
            })
        })
    }
}

/// Update payload; absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateDepartamento {
    /// New name.
    pub nombre: Option<String>,
    /// New status.
    pub estado: Option<Estado>,
}

impl FromInput for UpdateDepartamento {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let nombre = issues.take(NOMBRE.patch(input));
        let estado = issues.take(ESTADO.patch(input));
        issues.finish(|| {
            Some(Self {
                nombre: nombre?,
                estado: estado?,
            })
        })
    }
}

impl Changeset for UpdateDepartamento {
    fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.estado.is_none()
    }
}

/// List filter: optional status and free-text search on `nombre`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepartamentoFilter {
    /// Status to match.
    pub estado: Option<Estado>,
    /// Search term.
    pub q: Option<SearchTerm>,
}

impl FromInput for DepartamentoFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let estado = issues.take(ESTADO.optional(input));
        let q = issues.take(SEARCH.optional(input));
        issues.finish(|| {
            Some(Self {
                estado: estado?,
                q: q?,
            })
        })
    }
}

/// Picker filter: status defaults to `Activo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartamentoSelectFilter {
    /// Status to match.
    pub estado: Estado,
    /// Search term.
    pub q: Option<SearchTerm>,
}

impl FromInput for DepartamentoSelectFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let estado = issues.take(ESTADO.or_default(input, Estado::Activo));
        let q = issues.take(SEARCH.optional(input));
        issues.finish(|| {
            Some(Self {
                estado: estado?,
                q: q?,
            })
        })
    }
}

/// Marker tying the department schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Departamentos;

impl Resource for Departamentos {
    const NAME: &'static str = "Departamento";

    type Record = Departamento;
    type Create = CreateDepartamento;
    type Update = UpdateDepartamento;
    type ListFilter = DepartamentoFilter;
    type SelectFilter = DepartamentoSelectFilter;
}
