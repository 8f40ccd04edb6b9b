//! Course groups: one offering of a course in an academic cycle, with its
//! enrolment and grade-distribution tallies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, Resource};
use crate::domain::validation::fields::SMALLINT_MAX;
use crate::domain::validation::{Field, FromInput, IntField, Issues, RawInput, ValidationFailure};

const ID_CURSO: IntField<i32> = IntField::id("idCurso");
const ID_CICLO: IntField<i32> = IntField::id("idCiclo");
const NUMERO: IntField<i16> = IntField::new("numero", 1, SMALLINT_MAX);
const TOTAL_MATRICULA: IntField<i16> = IntField::count("totalMatricula");
const RETIRO_MATRICULA: IntField<i16> = IntField::count("retiroMatricula");
const REPROBADO_0A1_5: IntField<i16> = IntField::count("reprobado0A15");
const REPROBADO_2A5_5: IntField<i16> = IntField::count("reprobado2A55");
const REPROBADO_6A6_5: IntField<i16> = IntField::count("reprobado6A65");
const APROBADO_7: IntField<i16> = IntField::count("aprobado7");
const APROBADO_7_5A8: IntField<i16> = IntField::count("aprobado75A8");
const APROBADO_8_5A10: IntField<i16> = IntField::count("aprobado85A10");

/// Enrolment and grade-band counters of a group.
///
/// In records, `None` means the column is null. In payloads it means the
/// counter was not supplied: creates store 0 and updates keep the old value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Tallies {
    /// Students enrolled.
    #[serde(rename = "totalMatricula")]
    pub total_matricula: Option<i16>,
    /// Students who withdrew.
    #[serde(rename = "retiroMatricula")]
    pub retiro_matricula: Option<i16>,
    /// Failed with a grade between 0 and 1.5.
    #[serde(rename = "reprobado0A15")]
    pub reprobado_0a1_5: Option<i16>,
    /// Failed with a grade between 2 and 5.5.
    #[serde(rename = "reprobado2A55")]
    pub reprobado_2a5_5: Option<i16>,
    /// Failed with a grade between 6 and 6.5.
    #[serde(rename = "reprobado6A65")]
    pub reprobado_6a6_5: Option<i16>,
    /// Passed with a 7.
    #[serde(rename = "aprobado7")]
    pub aprobado_7: Option<i16>,
    /// Passed with a grade between 7.5 and 8.
    #[serde(rename = "aprobado75A8")]
    pub aprobado_7_5a8: Option<i16>,
    /// Passed with a grade between 8.5 and 10.
    #[serde(rename = "aprobado85A10")]
    pub aprobado_8_5a10: Option<i16>,
}

impl Tallies {
    fn parse(input: &RawInput, issues: &mut Issues) -> Option<Self> {
        let total_matricula = issues.take(TOTAL_MATRICULA.patch(input));
        let retiro_matricula = issues.take(RETIRO_MATRICULA.patch(input));
        let reprobado_0a1_5 = issues.take(REPROBADO_0A1_5.patch(input));
        let reprobado_2a5_5 = issues.take(REPROBADO_2A5_5.patch(input));
        let reprobado_6a6_5 = issues.take(REPROBADO_6A6_5.patch(input));
        let aprobado_7 = issues.take(APROBADO_7.patch(input));
        let aprobado_7_5a8 = issues.take(APROBADO_7_5A8.patch(input));
        let aprobado_8_5a10 = issues.take(APROBADO_8_5A10.patch(input));
        Some(Self {
            total_matricula: total_matricula?,
            retiro_matricula: retiro_matricula?,
            reprobado_0a1_5: reprobado_0a1_5?,
            reprobado_2a5_5: reprobado_2a5_5?,
            reprobado_6a6_5: reprobado_6a6_5?,
            aprobado_7: aprobado_7?,
            aprobado_7_5a8: aprobado_7_5a8?,
            aprobado_8_5a10: aprobado_8_5a10?,
        })
    }

    /// Counters in storage column order.
    #[must_use]
    pub const fn values(&self) -> [Option<i16>; 8] {
        [
            self.total_matricula,
            self.retiro_matricula,
            self.reprobado_0a1_5,
            self.reprobado_2a5_5,
            self.reprobado_6a6_5,
            self.aprobado_7,
            self.aprobado_7_5a8,
            self.aprobado_8_5a10,
        ]
    }

    /// Whether no counter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }
}

/// Stored course group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursoGrupo {
    /// Identifier.
    pub id: i32,
    /// Course taught.
    pub id_curso: i32,
    /// Academic cycle.
    pub id_ciclo: i32,
    /// Group number within the course and cycle.
    pub numero: i16,
    /// Counters.
    #[serde(flatten)]
    pub tallies: Tallies,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCursoGrupo {
    /// Course taught.
    pub id_curso: i32,
    /// Academic cycle.
    pub id_ciclo: i32,
    /// Group number.
    pub numero: i16,
    /// Counters; unspecified ones are stored as 0.
    pub tallies: Tallies,
}

impl FromInput for CreateCursoGrupo {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id_curso = issues.take(ID_CURSO.required(input));
        let id_ciclo = issues.take(ID_CICLO.required(input));
        let numero = issues.take(NUMERO.required(input));
        let tallies = Tallies::parse(input, &mut issues);
        issues.finish(|| {
            Some(Self {
                id_curso: id_curso?,
                id_ciclo: id_ciclo?,
                numero: numero?,
                tallies: tallies?,
            })
        })
    }
}

/// Update payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateCursoGrupo {
    /// New course.
    pub id_curso: Option<i32>,
    /// New cycle.
    pub id_ciclo: Option<i32>,
    /// New group number.
    pub numero: Option<i16>,
    /// Counters to overwrite.
    pub tallies: Tallies,
}

impl FromInput for UpdateCursoGrupo {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id_curso = issues.take(ID_CURSO.patch(input));
        let id_ciclo = issues.take(ID_CICLO.patch(input));
        let numero = issues.take(NUMERO.patch(input));
        let tallies = Tallies::parse(input, &mut issues);
        issues.finish(|| {
            Some(Self {
                id_curso: id_curso?,
                id_ciclo: id_ciclo?,
                numero: numero?,
                tallies: tallies?,
            })
        })
    }
}

impl Changeset for UpdateCursoGrupo {
    fn is_empty(&self) -> bool {
        self.id_curso.is_none()
            && self.id_ciclo.is_none()
            && self.numero.is_none()
            && self.tallies.is_empty()
    }
}

/// Filter shared by listing and pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursoGrupoFilter {
    /// Course taught.
    pub id_curso: Option<i32>,
    /// Academic cycle.
    pub id_ciclo: Option<i32>,
}

impl FromInput for CursoGrupoFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id_curso = issues.take(ID_CURSO.optional(input));
        let id_ciclo = issues.take(ID_CICLO.optional(input));
        issues.finish(|| {
            Some(Self {
                id_curso: id_curso?,
                id_ciclo: id_ciclo?,
            })
        })
    }
}

/// Marker tying the course-group schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursosGrupos;

impl Resource for CursosGrupos {
    const NAME: &'static str = "CursoGrupo";

    type Record = CursoGrupo;
    type Create = CreateCursoGrupo;
    type Update = UpdateCursoGrupo;
    type ListFilter = CursoGrupoFilter;
    type SelectFilter = CursoGrupoFilter;
}

#[cfg(test)]
mod tests {
    //! Schema behaviour for course-group payloads.

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
    fn create_reads_grade_bands_by_their_public_names() {
        let parsed = CreateCursoGrupo::from_input(&raw(json!({
            "idCurso": 1,
            "idCiclo": 2,
            "numero": 1,
            "reprobado0A15": 3,
            "aprobado85A10": "12",
        })))
        .expect("valid payload");
        assert_eq!(parsed.tallies.reprobado_0a1_5, Some(3));
        assert_eq!(parsed.tallies.aprobado_8_5a10, Some(12));
        assert_eq!(parsed.tallies.total_matricula, None);
    }

    #[rstest]
    fn create_rejects_negative_counters_alongside_missing_ids() {
        let failure = CreateCursoGrupo::from_input(&raw(json!({
            "numero": 1,
            "retiroMatricula": -2,
        })))
        .expect_err("invalid payload");
        let fields: Vec<&str> = failure
            .issues()
            .iter()
            .map(|issue| issue.field.as_str())
            .collect();
        assert_eq!(fields, vec!["idCurso", "idCiclo", "retiroMatricula"]);
    }

    #[rstest]
    fn record_serialises_tallies_inline() {
        let record = CursoGrupo {
            id: 9,
            id_curso: 1,
            id_ciclo: 2,
            numero: 1,
            tallies: Tallies {
                aprobado_7: Some(4),
                ..Tallies::default()
            },
        };
        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["aprobado7"], json!(4));
        assert_eq!(value["idCurso"], json!(1));
    }
}
