//! PostgreSQL-backed course group repository.
//!
//! Grade bucket columns carry dots in their names (`"reprobado_0a1.5"`), so
//! they are quoted and aliased in the projection.

use async_trait::async_trait;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::curso_grupo::{
    CreateCursoGrupo, CursoGrupo, CursoGrupoFilter, Tallies, UpdateCursoGrupo,
};
use crate::domain::resources::{CursosGrupos, SelectOption};

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "curso_grupo",
    columns: r#"id, id_curso, id_ciclo, numero, total_matricula, retiro_matricula,
        "reprobado_0a1.5" AS reprobado_0a1_5, "reprobado_2a5.5" AS reprobado_2a5_5,
        "reprobado_6a6.5" AS reprobado_6a6_5, aprobado_7,
        "aprobado_7.5a8" AS aprobado_7_5a8, "aprobado_8.5a10" AS aprobado_8_5a10"#,
    order_by: "id_ciclo DESC, id_curso, numero, id",
    label: "concat((SELECT c.sigla FROM curso c WHERE c.id = curso_grupo.id_curso), \
            ' - G', lpad(numero::text, 2, '0'))",
};

/// Storage columns of the tally counters, in [`Tallies::values`] order.
const TALLY_COLUMNS: [&str; 8] = [
    "total_matricula",
    "retiro_matricula",
    r#""reprobado_0a1.5""#,
    r#""reprobado_2a5.5""#,
    r#""reprobado_6a6.5""#,
    "aprobado_7",
    r#""aprobado_7.5a8""#,
    r#""aprobado_8.5a10""#,
];

#[derive(Debug, FromRow)]
struct CursoGrupoRow {
    id: i32,
    id_curso: i32,
    id_ciclo: i32,
    numero: i16,
    total_matricula: Option<i16>,
    retiro_matricula: Option<i16>,
    reprobado_0a1_5: Option<i16>,
    reprobado_2a5_5: Option<i16>,
    reprobado_6a6_5: Option<i16>,
    aprobado_7: Option<i16>,
    aprobado_7_5a8: Option<i16>,
    aprobado_8_5a10: Option<i16>,
}

impl IntoRecord for CursoGrupoRow {
    type Record = CursoGrupo;

    fn into_record(self) -> Result<CursoGrupo, RepositoryError> {
        Ok(CursoGrupo {
            id: self.id,
            id_curso: self.id_curso,
            id_ciclo: self.id_ciclo,
            numero: self.numero,
            tallies: Tallies {
                total_matricula: self.total_matricula,
                retiro_matricula: self.retiro_matricula,
                reprobado_0a1_5: self.reprobado_0a1_5,
                reprobado_2a5_5: self.reprobado_2a5_5,
                reprobado_6a6_5: self.reprobado_6a6_5,
                aprobado_7: self.aprobado_7,
                aprobado_7_5a8: self.aprobado_7_5a8,
                aprobado_8_5a10: self.aprobado_8_5a10,
            },
        })
    }
}

fn filter(filter_by: &CursoGrupoFilter) -> Filter {
    Filter::default()
        .equals("id_curso", filter_by.id_curso)
        .equals("id_ciclo", filter_by.id_ciclo)
}

/// `sqlx` implementation of the course group repository port.
#[derive(Debug, Clone)]
pub struct SqlxCursoGrupoRepository {
    pool: DbPool,
}

impl SqlxCursoGrupoRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<CursosGrupos> for SqlxCursoGrupoRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &CursoGrupoFilter,
    ) -> Result<RecordPage<CursoGrupo>, RepositoryError> {
        query_helpers::fetch_page::<CursoGrupoRow>(&self.pool, &TABLE, &filter(filter_by), page)
            .await
    }

    async fn find_for_select(
        &self,
        filter_by: &CursoGrupoFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        query_helpers::fetch_options(&self.pool, &TABLE, &filter(filter_by)).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CursoGrupo>, RepositoryError> {
        query_helpers::fetch_by_id::<CursoGrupoRow>(&self.pool, &TABLE, id).await
    }

    async fn create(&self, input: &CreateCursoGrupo) -> Result<CursoGrupo, RepositoryError> {
        let base = Assignments::default()
            .value("id_curso", input.id_curso)
            .value("id_ciclo", input.id_ciclo)
            .value("numero", input.numero);
        let values = TALLY_COLUMNS
            .into_iter()
            .zip(input.tallies.values())
            .fold(base, |acc, (column, count)| {
                acc.value(column, count.unwrap_or_default())
            });
        query_helpers::insert::<CursoGrupoRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateCursoGrupo,
    ) -> Result<Option<CursoGrupo>, RepositoryError> {
        let base = Assignments::default()
            .set("id_curso", changes.id_curso)
            .set("id_ciclo", changes.id_ciclo)
            .set("numero", changes.numero);
        let values = TALLY_COLUMNS
            .into_iter()
            .zip(changes.tallies.values())
            .fold(base, |acc, (column, count)| acc.set(column, count));
        query_helpers::update::<CursoGrupoRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
