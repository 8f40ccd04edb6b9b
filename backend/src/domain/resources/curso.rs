//! Courses offered by departments.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, ESTADO, Estado, Resource};
use crate::domain::validation::common::SEARCH;
use crate::domain::validation::{
    BoolField, Change, Field, FromInput, IntField, Issues, RawInput, SearchTerm, TextField,
    ValidationFailure,
};

const SIGLA: TextField = TextField::new("sigla", 6);
const NOMBRE: TextField = TextField::new("nombre", 100);
const ID_DEPARTAMENTO: IntField<i32> = IntField::id("idDepartamento");
const CREDITAJE: IntField<i16> = IntField::count("creditaje");
const ACTIVO: BoolField = BoolField::new("activo");
const HORAS: IntField<i16> = IntField::count("horas");

/// Stored course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    /// Identifier.
    pub id: i32,
    /// Unique short code, at most six characters.
    pub sigla: String,
    /// Unique name.
    pub nombre: String,
    /// Owning department.
    pub id_departamento: i32,
    /// Credits, when assigned.
    pub creditaje: Option<i16>,
    /// Whether the course is offered.
    pub activo: bool,
    /// Weekly hours.
    pub horas: i16,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCurso {
    /// Short code.
    pub sigla: String,
    /// Name.
    pub nombre: String,
    /// Owning department.
    pub id_departamento: i32,
    /// Credits.
    pub creditaje: Option<i16>,
    /// Defaults to `true`.
    pub activo: bool,
    /// Defaults to `0`.
    pub horas: i16,
}

impl FromInput for CreateCurso {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let sigla = issues.take(SIGLA.required(input));
        let nombre = issues.take(NOMBRE.required(input));
        let id_departamento = issues.take(ID_DEPARTAMENTO.required(input));
        let creditaje = issues.take(CREDITAJE.optional(input));
        let activo = issues.take(ACTIVO.or_default(input, true));
        let horas = issues.take(HORAS.or_default(input, 0));
        issues.finish(|| {
            Some(Self {
                sigla: sigla?,
                nombre: nombre?,
                id_departamento: id_departamento?,
                creditaje: creditaje?,
                activo: activo?,
                horas: horas?,
            })
        })
    }
}

/// Update payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateCurso {
    /// New short code.
    pub sigla: Option<String>,
    /// New name.
    pub nombre: Option<String>,
    /// New owning department.
    pub id_departamento: Option<i32>,
    /// Credits change; `null` clears.
    pub creditaje: Change<i16>,
    /// New offered flag.
    pub activo: Option<bool>,
    /// New weekly hours.
    pub horas: Option<i16>,
}

impl FromInput for UpdateCurso {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let sigla = issues.take(SIGLA.patch(input));
        let nombre = issues.take(NOMBRE.patch(input));
        let id_departamento = issues.take(ID_DEPARTAMENTO.patch(input));
        let creditaje = issues.take(CREDITAJE.change(input));
        let activo = issues.take(ACTIVO.patch(input));
        let horas = issues.take(HORAS.patch(input));
        issues.finish(|| {
            Some(Self {
                sigla: sigla?,
                nombre: nombre?,
                id_departamento: id_departamento?,
                creditaje: creditaje?,
                activo: activo?,
                horas: horas?,
            })
        })
    }
}

impl Changeset for UpdateCurso {
    fn is_empty(&self) -> bool {
        self.sigla.is_none()
            && self.nombre.is_none()
            && self.id_departamento.is_none()
            && self.creditaje.is_keep()
            && self.activo.is_none()
            && self.horas.is_none()
    }
}

/// List filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursoFilter {
    /// `Activo` matches offered courses, `Inactivo` the rest.
    pub estado: Option<Estado>,
    /// Search on `sigla` and `nombre`.
    pub q: Option<SearchTerm>,
    /// Owning department.
    pub id_departamento: Option<i32>,
}

impl FromInput for CursoFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let estado = issues.take(ESTADO.optional(input));
        let q = issues.take(SEARCH.optional(input));
        let id_departamento = issues.take(ID_DEPARTAMENTO.optional(input));
        issues.finish(|| {
            Some(Self {
                estado: estado?,
                q: q?,
                id_departamento: id_departamento?,
            })
        })
    }
}

/// Picker filter; only offered courses unless `estado` says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursoSelectFilter {
    /// Status to match.
    pub estado: Estado,
    /// Search on `sigla` and `nombre`.
    pub q: Option<SearchTerm>,
    /// Owning department.
    pub id_departamento: Option<i32>,
}

impl FromInput for CursoSelectFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let estado = issues.take(ESTADO.or_default(input, Estado::Activo));
        let q = issues.take(SEARCH.optional(input));
        let id_departamento = issues.take(ID_DEPARTAMENTO.optional(input));
        issues.finish(|| {
            Some(Self {
                estado: estado?,
                q: q?,
                id_departamento: id_departamento?,
            })
        })
    }
}

/// Marker tying the course schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursos;

impl Resource for Cursos {
    const NAME: &'static str = "Curso";

    type Record = Curso;
    type Create = CreateCurso;
    type Update = UpdateCurso;
    type ListFilter = CursoFilter;
    type SelectFilter = CursoSelectFilter;
}
