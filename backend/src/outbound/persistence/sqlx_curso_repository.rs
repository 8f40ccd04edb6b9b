//! PostgreSQL-backed course repository.

use async_trait::async_trait;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::curso::{
    CreateCurso, Curso, CursoFilter, CursoSelectFilter, UpdateCurso,
};
use crate::domain::resources::{Cursos, Estado, SelectOption};
use crate::domain::validation::SearchTerm;

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "curso",
    columns: "id, sigla, nombre, id_departamento, creditaje, activo, horas",
    order_by: "sigla, id",
    label: "sigla || ' - ' || nombre",
};

const SEARCH_COLUMNS: &[&str] = &["sigla", "nombre"];

#[derive(Debug, FromRow)]
struct CursoRow {
    id: i32,
    sigla: String,
    nombre: String,
    id_departamento: i32,
    creditaje: Option<i16>,
    activo: bool,
    horas: i16,
}

impl IntoRecord for CursoRow {
    type Record = Curso;

    fn into_record(self) -> Result<Curso, RepositoryError> {
        Ok(Curso {
            id: self.id,
            sigla: self.sigla,
            nombre: self.nombre,
            id_departamento: self.id_departamento,
            creditaje: self.creditaje,
            activo: self.activo,
            horas: self.horas,
        })
    }
}

fn filter(
    estado: Option<Estado>,
    q: Option<&SearchTerm>,
    id_departamento: Option<i32>,
) -> Filter {
    Filter::default()
        .equals("activo", estado.map(Estado::is_active))
        .equals("id_departamento", id_departamento)
        .search(SEARCH_COLUMNS, q)
}

/// `sqlx` implementation of the course repository port.
#[derive(Debug, Clone)]
pub struct SqlxCursoRepository {
    pool: DbPool,
}

impl SqlxCursoRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<Cursos> for SqlxCursoRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &CursoFilter,
    ) -> Result<RecordPage<Curso>, RepositoryError> {
        let conditions = filter(
            filter_by.estado,
            filter_by.q.as_ref(),
            filter_by.id_departamento,
        );
        query_helpers::fetch_page::<CursoRow>(&self.pool, &TABLE, &conditions, page).await
    }

    async fn find_for_select(
        &self,
        filter_by: &CursoSelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        let conditions = filter(
            Some(filter_by.estado),
            filter_by.q.as_ref(),
            filter_by.id_departamento,
        );
        query_helpers::fetch_options(&self.pool, &TABLE, &conditions).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Curso>, RepositoryError> {
        query_helpers::fetch_by_id::<CursoRow>(&self.pool, &TABLE, id).await
    }

    async fn create(&self, input: &CreateCurso) -> Result<Curso, RepositoryError> {
        let values = Assignments::default()
            .value("sigla", input.sigla.clone())
            .value("nombre", input.nombre.clone())
            .value("id_departamento", input.id_departamento)
            .value("creditaje", input.creditaje)
            .value("activo", input.activo)
            .value("horas", input.horas);
        query_helpers::insert::<CursoRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateCurso,
    ) -> Result<Option<Curso>, RepositoryError> {
        let values = Assignments::default()
            .set("sigla", changes.sigla.clone())
            .set("nombre", changes.nombre.clone())
            .set("id_departamento", changes.id_departamento)
            .change("creditaje", &changes.creditaje)
            .set("activo", changes.activo)
            .set("horas", changes.horas);
        query_helpers::update::<CursoRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
