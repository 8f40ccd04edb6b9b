//! Administrative appointments: a professor holding an administrative post
//! during an academic cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, Resource};
use crate::domain::AppError;
use crate::domain::validation::{
    Change, DateField, Field, FromInput, IntField, Issues, RawInput, TextField, ValidationFailure,
};

/// Code raised when an appointment ends before it starts.
pub const INVALID_DATE_RANGE: &str = "INVALID_DATE_RANGE";

const ID_PROFESOR: IntField<i32> = IntField::id("idProfesor");
const ID_CARGO: IntField<i32> = IntField::id("idCargo");
const ID_CICLO: IntField<i32> = IntField::id("idCiclo");
const ID_PUESTO: IntField<i32> = IntField::id("idPuesto");
const CARGA_HORAS: IntField<i16> = IntField::count("cargaHoras");
const REF_DOC: TextField = TextField::new("refDoc", 20);
const VIGENCIA_INICIO: DateField = DateField::new("vigenciaInicio");
const VIGENCIA_FIN: DateField = DateField::new("vigenciaFin");

/// Stored appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminNombramiento {
    /// Identifier.
    pub id: i32,
    /// Appointed professor.
    pub id_profesor: i32,
    /// Administrative post.
    pub id_cargo: i32,
    /// Academic cycle.
    pub id_ciclo: i32,
    /// Position slot, when assigned.
    pub id_puesto: Option<i32>,
    /// Weekly hours credited to the post.
    pub carga_horas: i16,
    /// Supporting document reference.
    pub ref_doc: Option<String>,
    /// First day of validity.
    pub vigencia_inicio: Option<NaiveDate>,
    /// Last day of validity.
    pub vigencia_fin: Option<NaiveDate>,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAdminNombramiento {
    /// Appointed professor.
    pub id_profesor: i32,
    /// Administrative post.
    pub id_cargo: i32,
    /// Academic cycle.
    pub id_ciclo: i32,
    /// Position slot.
    pub id_puesto: Option<i32>,
    /// Defaults to `0`.
    pub carga_horas: i16,
    /// Supporting document reference.
    pub ref_doc: Option<String>,
    /// First day of validity.
    pub vigencia_inicio: Option<NaiveDate>,
    /// Last day of validity.
    pub vigencia_fin: Option<NaiveDate>,
}

impl FromInput for CreateAdminNombramiento {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id_profesor = issues.take(ID_PROFESOR.required(input));
        let id_cargo = issues.take(ID_CARGO.required(input));
        let id_ciclo = issues.take(ID_CICLO.required(input));
        let id_puesto = issues.take(ID_PUESTO.optional(input));
        let carga_horas = issues.take(CARGA_HORAS.or_default(input, 0));
        let ref_doc = issues.take(REF_DOC.optional(input));
        let vigencia_inicio = issues.take(VIGENCIA_INICIO.optional(input));
        let vigencia_fin = issues.take(VIGENCIA_FIN.optional(input));
        issues.finish(|| {
            Some(Self {
                id_profesor: id_profesor?,
                id_cargo: id_cargo?,
                id_ciclo: id_ciclo?,
                id_puesto: id_puesto?,
                carga_horas: carga_horas?,
                ref_doc: ref_doc?,
                vigencia_inicio: vigencia_inicio?,
                vigencia_fin: vigencia_fin?,
            })
        })
    }
}

/// Update payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateAdminNombramiento {
    /// New professor.
    pub id_profesor: Option<i32>,
    /// New post.
    pub id_cargo: Option<i32>,
    /// New cycle.
    pub id_ciclo: Option<i32>,
    /// Position slot change.
    pub id_puesto: Change<i32>,
    /// New weekly hours.
    pub carga_horas: Option<i16>,
    /// Document reference change.
    pub ref_doc: Change<String>,
    /// Start date change.
    pub vigencia_inicio: Change<NaiveDate>,
    /// End date change.
    pub vigencia_fin: Change<NaiveDate>,
}

impl FromInput for UpdateAdminNombramiento {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id_profesor = issues.take(ID_PROFESOR.patch(input));
        let id_cargo = issues.take(ID_CARGO.patch(input));
        let id_ciclo = issues.take(ID_CICLO.patch(input));
        let id_puesto = issues.take(ID_PUESTO.change(input));
        let carga_horas = issues.take(CARGA_HORAS.patch(input));
        let ref_doc = issues.take(REF_DOC.change(input));
        let vigencia_inicio = issues.take(VIGENCIA_INICIO.change(input));
        let vigencia_fin = issues.take(VIGENCIA_FIN.change(input));
        issues.finish(|| {
            Some(Self {
                id_profesor: id_profesor?,
                id_cargo: id_cargo?,
                id_ciclo: id_ciclo?,
                id_puesto: id_puesto?,
                carga_horas: carga_horas?,
                ref_doc: ref_doc?,
                vigencia_inicio: vigencia_inicio?,
                vigencia_fin: vigencia_fin?,
            })
        })
    }
}

impl Changeset for UpdateAdminNombramiento {
    fn is_empty(&self) -> bool {
        self.id_profesor.is_none()
            && self.id_cargo.is_none()
            && self.id_ciclo.is_none()
            && self.id_puesto.is_keep()
            && self.carga_horas.is_none()
            && self.ref_doc.is_keep()
            && self.vigencia_inicio.is_keep()
            && self.vigencia_fin.is_keep()
    }
}

/// Filter shared by listing and pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminNombramientoFilter {
    /// Appointed professor.
    pub id_profesor: Option<i32>,
    /// Administrative post.
    pub id_cargo: Option<i32>,
    /// Academic cycle.
    pub id_ciclo: Option<i32>,
}

impl FromInput for AdminNombramientoFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id_profesor = issues.take(ID_PROFESOR.optional(input));
        let id_cargo = issues.take(ID_CARGO.optional(input));
        let id_ciclo = issues.take(ID_CICLO.optional(input));
        issues.finish(|| {
            Some(Self {
                id_profesor: id_profesor?,
                id_cargo: id_cargo?,
                id_ciclo: id_ciclo?,
            })
        })
    }
}

fn check_range(start: Option<&NaiveDate>, end: Option<&NaiveDate>) -> Result<(), AppError> {
    match (start, end) {
        (Some(first), Some(last)) if last < first => Err(AppError::business_rule_with_code(
            INVALID_DATE_RANGE,
            "vigenciaFin must not precede vigenciaInicio",
        )),
        _ => Ok(()),
    }
}

/// Marker tying the appointment schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminNombramientos;

impl Resource for AdminNombramientos {
    const NAME: &'static str = "Nombramiento";

    type Record = AdminNombramiento;
    type Create = CreateAdminNombramiento;
    type Update = UpdateAdminNombramiento;
    type ListFilter = AdminNombramientoFilter;
    type SelectFilter = AdminNombramientoFilter;

    fn check_create(input: &Self::Create) -> Result<(), AppError> {
        check_range(input.vigencia_inicio.as_ref(), input.vigencia_fin.as_ref())
    }

    fn check_update(changes: &Self::Update) -> Result<(), AppError> {
        check_range(changes.vigencia_inicio.as_set(), changes.vigencia_fin.as_set())
    }
}

#[cfg(test)]
mod tests {
    //! Schema and rule behaviour for appointment payloads.

    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn raw(value: Value) -> RawInput {
        match value {
            Value::Object(map) => map,
            other => panic!("test input must be an object, got {other}"),
        }
    }

    fn create(inicio: &str, fin: &str) -> CreateAdminNombramiento {
        CreateAdminNombramiento::from_input(&raw(json!({
            "idProfesor": 1,
            "idCargo": 2,
            "idCiclo": 3,
            "vigenciaInicio": inicio,
            "vigenciaFin": fin,
        })))
        .expect("valid payload")
    }

    #[rstest]
    fn end_before_start_violates_business_rule() {
        let err = AdminNombramientos::check_create(&create("2024-07-01", "2024-01-01"))
            .expect_err("inverted range");
        assert_eq!(err.status(), 422);
        assert_eq!(err.code(), INVALID_DATE_RANGE);
    }

    #[rstest]
    #[case("2024-01-01", "2024-07-01")]
    #[case("2024-01-01", "2024-01-01")]
    fn ordered_ranges_pass(#[case] inicio: &str, #[case] fin: &str) {
        assert!(AdminNombramientos::check_create(&create(inicio, fin)).is_ok());
    }

    #[rstest]
    fn update_checks_only_when_both_dates_are_set() {
        let partial = UpdateAdminNombramiento::from_input(&raw(json!({ "vigenciaFin": "2000-01-01" })))
            .expect("valid update");
        assert!(AdminNombramientos::check_update(&partial).is_ok());

        let inverted = UpdateAdminNombramiento::from_input(&raw(json!({
            "vigenciaInicio": "2024-02-01",
            "vigenciaFin": "2024-01-01",
        })))
        .expect("valid update");
        assert!(AdminNombramientos::check_update(&inverted).is_err());
    }

    #[rstest]
    fn carga_horas_defaults_to_zero() {
        let parsed = CreateAdminNombramiento::from_input(&raw(json!({
            "idProfesor": 1,
            "idCargo": 2,
            "idCiclo": 3,
        })))
        .expect("valid payload");
        assert_eq!(parsed.carga_horas, 0);
        assert_eq!(parsed.id_puesto, None);
    }
}
