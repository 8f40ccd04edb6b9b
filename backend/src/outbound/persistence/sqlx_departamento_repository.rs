//! PostgreSQL-backed department repository.

use async_trait::async_trait;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::departamento::{
    CreateDepartamento, Departamento, DepartamentoFilter, DepartamentoSelectFilter,
    UpdateDepartamento,
};
use crate::domain::resources::{Departamentos, SelectOption};
use crate::domain::validation::SearchTerm;

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "departamento",
    columns: "id, nombre, estado",
    order_by: "nombre, id",
    label: "nombre",
};

#[derive(Debug, FromRow)]
struct DepartamentoRow {
    id: i32,
    nombre: String,
    estado: String,
}

impl IntoRecord for DepartamentoRow {
    type Record = Departamento;

    fn into_record(self) -> Result<Departamento, RepositoryError> {
        Ok(Departamento {
            id: self.id,
            nombre: self.nombre,
            estado: self
                .estado
                .parse()
                .map_err(|err| {
                    RepositoryError::decode(format!("departamento {}: {err}", self.id))
                })?,
        })
    }
}

/// `sqlx` implementation of the department repository port.
#[derive(Debug, Clone)]
pub struct SqlxDepartamentoRepository {
    pool: DbPool,
}

impl SqlxDepartamentoRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filter(estado: Option<&str>, q: Option<&SearchTerm>) -> Filter {
    Filter::default()
        .equals("estado", estado)
        .search(&["nombre"], q)
}

#[async_trait]
impl ResourceRepository<Departamentos> for SqlxDepartamentoRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &DepartamentoFilter,
    ) -> Result<RecordPage<Departamento>, RepositoryError> {
        let conditions = filter(
            filter_by.estado.map(|estado| estado.as_str()),
            filter_by.q.as_ref(),
        );
        query_helpers::fetch_page::<DepartamentoRow>(&self.pool, &TABLE, &conditions, page).await
    }

    async fn find_for_select(
        &self,
        filter_by: &DepartamentoSelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        let conditions = filter(Some(filter_by.estado.as_str()), filter_by.q.as_ref());
        query_helpers::fetch_options(&self.pool, &TABLE, &conditions).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Departamento>, RepositoryError> {
        query_helpers::fetch_by_id::<DepartamentoRow>(&self.pool, &TABLE, id).await
    }

    async fn create(&self, input: &CreateDepartamento) -> Result<Departamento, RepositoryError> {
        let values = Assignments::default()
            .value("nombre", input.nombre.clone())
            .value("estado", input.estado.as_str());
        query_helpers::insert::<DepartamentoRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateDepartamento,
    ) -> Result<Option<Departamento>, RepositoryError> {
        let values = Assignments::default()
            .set("nombre", changes.nombre.clone())
            .set("estado", changes.estado.map(|estado| estado.as_str()));
        query_helpers::update::<DepartamentoRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
