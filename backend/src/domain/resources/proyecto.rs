//! Research and outreach projects.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, ESTADO, Estado, Resource};
use crate::domain::validation::common::SEARCH;
use crate::domain::validation::{
    BoolField, Change, Field, FromInput, IntField, Issues, RawInput, SearchTerm, TextField,
    ValidationFailure,
};

const CODIGO: TextField = TextField::new("codigo", 20);
const ID_TIPO: IntField<i32> = IntField::id("idTipo");
const ID_CENTRO: IntField<i32> = IntField::id("idCentro");
const NOMBRE: TextField = TextField::new("nombre", 100);
const DESCRIPCION: TextField = TextField::new("descripcion", 100);
const VIGENCIA_INICIO: TextField = TextField::new("vigenciaInicio", 10);
const VIGENCIA_FIN: TextField = TextField::new("vigenciaFin", 10);
const ACTIVO: BoolField = BoolField::new("activo");
const REF_DOC: TextField = TextField::new("refDoc", 20);

/// Stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proyecto {
    /// Identifier.
    pub id: i32,
    /// External code.
    pub codigo: Option<String>,
    /// Project type.
    pub id_tipo: i32,
    /// Hosting centre.
    pub id_centro: Option<i32>,
    /// Name.
    pub nombre: String,
    /// Short description.
    pub descripcion: Option<String>,
    /// Validity start as recorded by the registry office.
    pub vigencia_inicio: Option<String>,
    /// Validity end as recorded by the registry office.
    pub vigencia_fin: Option<String>,
    /// Whether the project is running.
    pub activo: bool,
    /// Supporting document reference.
    pub ref_doc: Option<String>,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProyecto {
    /// External code.
    pub codigo: Option<String>,
    /// Project type.
    pub id_tipo: i32,
    /// Hosting centre.
    pub id_centro: Option<i32>,
    /// Name.
    pub nombre: String,
    /// Short description.
    pub descripcion: Option<String>,
    /// Validity start.
    pub vigencia_inicio: Option<String>,
    /// Validity end.
    pub vigencia_fin: Option<String>,
    /// Defaults to `true`.
    pub activo: bool,
    /// Supporting document reference.
    pub ref_doc: Option<String>,
}

impl FromInput for CreateProyecto {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let codigo = issues.take(CODIGO.optional(input));
        let id_tipo = issues.take(ID_TIPO.required(input));
        let id_centro = issues.take(ID_CENTRO.optional(input));
        let nombre = issues.take(NOMBRE.required(input));
        let descripcion = issues.take(DESCRIPCION.optional(input));
        let vigencia_inicio = issues.take(VIGENCIA_INICIO.optional(input));
        let vigencia_fin = issues.take(VIGENCIA_FIN.optional(input));
        let activo = issues.take(ACTIVO.or_default(input, true));
        let ref_doc = issues.take(REF_DOC.optional(input));
        issues.finish(|| {
            Some(Self {
                codigo: codigo?,
                id_tipo: id_tipo?,
                id_centro: id_centro?,
                nombre: nombre?,
                descripcion: descripcion?,
                vigencia_inicio: vigencia_inicio?,
                vigencia_fin: vigencia_fin?,
                activo: activo?,
                ref_doc: ref_doc?,
            })
        })
    }
}

/// Update payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateProyecto {
    /// Code change.
    pub codigo: Change<String>,
    /// New project type.
    pub id_tipo: Option<i32>,
    /// Centre change.
    pub id_centro: Change<i32>,
    /// New name.
    pub nombre: Option<String>,
    /// Description change.
    pub descripcion: Change<String>,
    /// Validity start change.
    pub vigencia_inicio: Change<String>,
    /// Validity end change.
    pub vigencia_fin: Change<String>,
    /// New running flag.
    pub activo: Option<bool>,
    /// Document reference change.
    pub ref_doc: Change<String>,
}

impl FromInput for UpdateProyecto {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let codigo = issues.take(CODIGO.change(input));
        let id_tipo = issues.take(ID_TIPO.patch(input));
        let id_centro = issues.take(ID_CENTRO.change(input));
        let nombre = issues.take(NOMBRE.patch(input));
        let descripcion = issues.take(DESCRIPCION.change(input));
        let vigencia_inicio = issues.take(VIGENCIA_INICIO.change(input));
        let vigencia_fin = issues.take(VIGENCIA_FIN.change(input));
        let activo = issues.take(ACTIVO.patch(input));
        let ref_doc = issues.take(REF_DOC.change(input));
        issues.finish(|| {
            Some(Self {
                codigo: codigo?,
                id_tipo: id_tipo?,
                id_centro: id_centro?,
                nombre: nombre?,
                descripcion: descripcion?,
                vigencia_inicio: vigencia_inicio?,
                vigencia_fin: vigencia_fin?,
                activo: activo?,
                ref_doc: ref_doc?,
            })
        })
    }
}

impl Changeset for UpdateProyecto {
    fn is_empty(&self) -> bool {
        [
            &self.codigo,
            &self.descripcion,
            &self.vigencia_inicio,
            &self.vigencia_fin,
            &self.ref_doc,
        ]
        .iter()
        .all(|change| change.is_keep())
            && self.id_tipo.is_none()
            && self.id_centro.is_keep()
            && self.nombre.is_none()
            && self.activo.is_none()
    }
}

/// List filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProyectoFilter {
    /// `Activo` matches running projects, `Inactivo` the rest.
    pub estado: Option<Estado>,
    /// Search on `nombre` and `codigo`.
    pub q: Option<SearchTerm>,
    /// Project type.
    pub id_tipo: Option<i32>,
    /// Hosting centre.
    pub id_centro: Option<i32>,
}

impl FromInput for ProyectoFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let estado = issues.take(ESTADO.optional(input));
        let q = issues.take(SEARCH.optional(input));
        let id_tipo = issues.take(ID_TIPO.optional(input));
        let id_centro = issues.take(ID_CENTRO.optional(input));
        issues.finish(|| {
            Some(Self {
                estado: estado?,
                q: q?,
                id_tipo: id_tipo?,
                id_centro: id_centro?,
            })
        })
    }
}

/// Picker filter; only running projects unless `estado` says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProyectoSelectFilter {
    /// Status to match.
    pub estado: Estado,
    /// Search on `nombre` and `codigo`.
    pub q: Option<SearchTerm>,
}

impl FromInput for ProyectoSelectFilter {
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

/// Marker tying the project schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proyectos;

impl Resource for Proyectos {
    const NAME: &'static str = "Proyecto";

    type Record = Proyecto;
    type Create = CreateProyecto;
    type Update = UpdateProyecto;
    type ListFilter = ProyectoFilter;
    type SelectFilter = ProyectoSelectFilter;
}
