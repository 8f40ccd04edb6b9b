//! Teaching staff.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, ESTADO, Estado, Resource};
use crate::domain::validation::common::SEARCH;
use crate::domain::validation::{
    Change, DateField, Field, FromInput, Issues, RawInput, SearchTerm, TextField,
    ValidationFailure,
};

const IDENTIFICACION: TextField = TextField::new("identificacion", 20);
const NOMBRE: TextField = TextField::new("nombre", 20);
const APELLIDO1: TextField = TextField::new("apellido1", 15);
const APELLIDO2: TextField = TextField::new("apellido2", 15);
const TELEFONO1: TextField = TextField::new("telefono1", 15);
const TELEFONO2: TextField = TextField::new("telefono2", 15);
const TELEFONO3: TextField = TextField::new("telefono3", 15);
const EMAIL: TextField = TextField::email("email", 100);
const OFICINA: TextField = TextField::new("oficina", 10);
const CASILLERO: TextField = TextField::new("casillero", 6);
const FECHA_NOMBRAMIENTO: DateField = DateField::new("fechaNombramiento");

/// Stored professor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profesor {
    /// Identifier.
    pub id: i32,
    /// National identification number.
    pub identificacion: String,
    /// Given name.
    pub nombre: String,
    /// First surname.
    pub apellido1: String,
    /// Second surname.
    pub apellido2: Option<String>,
    /// Primary phone.
    pub telefono1: Option<String>,
    /// Secondary phone.
    pub telefono2: Option<String>,
    /// Tertiary phone.
    pub telefono3: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Office.
    pub oficina: Option<String>,
    /// Mailbox.
    pub casillero: Option<String>,
    /// Appointment date.
    pub fecha_nombramiento: Option<NaiveDate>,
    /// Status.
    pub estado: Estado,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProfesor {
    /// National identification number.
    pub identificacion: String,
    /// Given name.
    pub nombre: String,
    /// First surname.
    pub apellido1: String,
    /// Second surname.
    pub apellido2: Option<String>,
    /// Primary phone.
    pub telefono1: Option<String>,
    /// Secondary phone.
    pub telefono2: Option<String>,
    /// Tertiary phone.
    pub telefono3: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Office.
    pub oficina: Option<String>,
    /// Mailbox.
    pub casillero: Option<String>,
    /// Appointment date.
    pub fecha_nombramiento: Option<NaiveDate>,
    /// Defaults to `Activo`.
    pub estado: Estado,
}

impl FromInput for CreateProfesor {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let identificacion = issues.take(IDENTIFICACION.required(input));
        let nombre = issues.take(NOMBRE.required(input));
        let apellido1 = issues.take(APELLIDO1.required(input));
        let apellido2 = issues.take(APELLIDO2.optional(input));
        let telefono1 = issues.take(TELEFONO1.optional(input));
        let telefono2 = issues.take(TELEFONO2.optional(input));
        let telefono3 = issues.take(TELEFONO3.optional(input));
        let email = issues.take(EMAIL.optional(input));
        let oficina = issues.take(OFICINA.optional(input));
        let casillero = issues.take(CASILLERO.optional(input));
        let fecha_nombramiento = issues.take(FECHA_NOMBRAMIENTO.optional(input));
        let estado = issues.take(ESTADO.or_default(input, Estado::Activo));
        issues.finish(|| {
            Some(Self {
                identificacion: identificacion?,
                nombre: nombre?,
                apellido1: apellido1?,
                apellido2: apellido2?,
                telefono1: telefono1?,
                telefono2: telefono2?,
                telefono3: telefono3?,
                email: email?,
                oficina: oficina?,
                casillero: casillero?,
                fecha_nombramiento: fecha_nombramiento?,
                estado: estado?,
            })
        })
    }
}

/// Update payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateProfesor {
    /// New identification number.
    pub identificacion: Option<String>,
    /// New given name.
    pub nombre: Option<String>,
    /// New first surname.
    pub apellido1: Option<String>,
    /// Second surname change.
    pub apellido2: Change<String>,
    /// Primary phone change.
    pub telefono1: Change<String>,
    /// Secondary phone change.
    pub telefono2: Change<String>,
    /// Tertiary phone change.
    pub telefono3: Change<String>,
    /// Email change.
    pub email: Change<String>,
    /// Office change.
    pub oficina: Change<String>,
    /// Mailbox change.
    pub casillero: Change<String>,
    /// Appointment date change.
    pub fecha_nombramiento: Change<NaiveDate>,
    /// New status.
    pub estado: Option<Estado>,
}

impl FromInput for UpdateProfesor {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let identificacion = issues.take(IDENTIFICACION.patch(input));
        let nombre = issues.take(NOMBRE.patch(input));
        let apellido1 = issues.take(APELLIDO1.patch(input));
        let apellido2 = issues.take(APELLIDO2.change(input));
        let telefono1 = issues.take(TELEFONO1.change(input));
        let telefono2 = issues.take(TELEFONO2.change(input));
        let telefono3 = issues.take(TELEFONO3.change(input));
        let email = issues.take(EMAIL.change(input));
        let oficina = issues.take(OFICINA.change(input));
        let casillero = issues.take(CASILLERO.change(input));
        let fecha_nombramiento = issues.take(FECHA_NOMBRAMIENTO.change(input));
        let estado = issues.take(ESTADO.patch(input));
        issues.finish(|| {
            Some(Self {
                identificacion: identificacion?,
                nombre: nombre?,
                apellido1: apellido1?,
                apellido2: apellido2?,
                telefono1: telefono1?,
                telefono2: telefono2?,
                telefono3: telefono3?,
                email: email?,
                oficina: oficina?,
                casillero: casillero?,
                fecha_nombramiento: fecha_nombramiento?,
                estado: estado?,
            })
        })
    }
}

impl Changeset for UpdateProfesor {
    fn is_empty(&self) -> bool {
        self.identificacion.is_none()
            && self.nombre.is_none()
            && self.apellido1.is_none()
            && [
                &self.apellido2,
                &self.telefono1,
                &self.telefono2,
                &self.telefono3,
                &self.email,
                &self.oficina,
                &self.casillero,
            ]
            .iter()
            .all(|change| change.is_keep())
            && self.fecha_nombramiento.is_keep()
            && self.estado.is_none()
    }
}

/// List filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfesorFilter {
    /// Status to match.
    pub estado: Option<Estado>,
    /// Search on identification, given name and surnames.
    pub q: Option<SearchTerm>,
}

impl FromInput for ProfesorFilter {
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

/// Picker filter; status defaults to `Activo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfesorSelectFilter {
    /// Status to match.
    pub estado: Estado,
    /// Search on identification, given name and surnames.
    pub q: Option<SearchTerm>,
}

impl FromInput for ProfesorSelectFilter {
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

/// Marker tying the professor schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profesores;

impl Resource for Profesores {
    const NAME: &'static str = "Profesor";

    type Record = Profesor;
    type Create = CreateProfesor;
    type Update = UpdateProfesor;
    type ListFilter = ProfesorFilter;
    type SelectFilter = ProfesorSelectFilter;
}

#[cfg(test)]
mod tests {
    //! Schema behaviour for professor payloads.

    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn raw(value: Value) -> RawInput {
        match value {
            Value::Object(map) => map,
            other => panic!("test input must be an object, got {other}"),
        }
    }

    #[rstest]
    fn create_treats_blank_optionals_as_absent() {
        let parsed = CreateProfesor::from_input(&raw(json!({
            "identificacion": "1-1111-1111",
            "nombre": "Ana",
            "apellido1": "Mora",
            "apellido2": "   ",
            "fechaNombramiento": "2019-02-01",
        })))
        .expect("valid payload");
        assert_eq!(parsed.apellido2, None);
        assert_eq!(
            parsed.fecha_nombramiento,
            NaiveDate::from_ymd_opt(2019, 2, 1)
        );
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("ana@")]
    #[case("ana @ucr.ac.cr")]
    fn create_rejects_malformed_email(#[case] email: &str) {
        let failure = CreateProfesor::from_input(&raw(json!({
            "identificacion": "1",
            "nombre": "Ana",
            "apellido1": "Mora",
            "email": email,
        })))
        .expect_err("invalid email");
        assert_eq!(failure.issues()[0].field, "email");
    }

    #[rstest]
    fn update_distinguishes_clear_from_keep() {
        let parsed = UpdateProfesor::from_input(&raw(json!({
            "telefono1": null,
            "oficina": "B-201",
        })))
        .expect("valid update");
        assert_eq!(parsed.telefono1, Change::Clear);
        assert_eq!(parsed.telefono2, Change::Keep);
        assert_eq!(parsed.oficina, Change::Set("B-201".to_owned()));
    }

    #[rstest]
    fn update_rejects_bad_dates() {
        let failure = UpdateProfesor::from_input(&raw(json!({ "fechaNombramiento": "01/02/2019" })))
            .expect_err("invalid date");
        assert_eq!(
            failure.issues()[0].message,
            "must be a date in YYYY-MM-DD format"
        );
    }
}
