//! PostgreSQL-backed budget line repository.
//!
//! The `presupuesto` table has no identity column; identifiers come from the
//! create payload.

use async_trait::async_trait;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::presupuesto::{
    CreatePresupuesto, Presupuesto, PresupuestoFilter, UpdatePresupuesto,
};
use crate::domain::resources::{Presupuestos, SelectOption};

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "presupuesto",
    columns: "id, descripcion, orden",
    order_by: "orden NULLS LAST, descripcion, id",
    label: "descripcion",
};

#[derive(Debug, FromRow)]
struct PresupuestoRow {
    id: i32,
    descripcion: String,
    orden: Option<i16>,
}

impl IntoRecord for PresupuestoRow {
    type Record = Presupuesto;

    fn into_record(self) -> Result<Presupuesto, RepositoryError> {
        Ok(Presupuesto {
            id: self.id,
            descripcion: self.descripcion,
            orden: self.orden,
        })
    }
}

fn filter(filter_by: &PresupuestoFilter) -> Filter {
    Filter::default().search(&["descripcion"], filter_by.q.as_ref())
}

/// `sqlx` implementation of the budget line repository port.
#[derive(Debug, Clone)]
pub struct SqlxPresupuestoRepository {
    pool: DbPool,
}

impl SqlxPresupuestoRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<Presupuestos> for SqlxPresupuestoRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &PresupuestoFilter,
    ) -> Result<RecordPage<Presupuesto>, RepositoryError> {
        query_helpers::fetch_page::<PresupuestoRow>(&self.pool, &TABLE, &filter(filter_by), page)
            .await
    }

    async fn find_for_select(
        &self,
        filter_by: &PresupuestoFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        query_helpers::fetch_options(&self.pool, &TABLE, &filter(filter_by)).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Presupuesto>, RepositoryError> {
        query_helpers::fetch_by_id::<PresupuestoRow>(&self.pool, &TABLE, id).await
    }

    async fn create(&self, input: &CreatePresupuesto) -> Result<Presupuesto, RepositoryError> {
        let values = Assignments::default()
            .value("id", input.id)
            .value("descripcion", input.descripcion.clone())
            .value("orden", input.orden);
        query_helpers::insert::<PresupuestoRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdatePresupuesto,
    ) -> Result<Option<Presupuesto>, RepositoryError> {
        let values = Assignments::default()
            .set("descripcion", changes.descripcion.clone())
            .change("orden", &changes.orden);
        query_helpers::update::<PresupuestoRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
