//! PostgreSQL-backed administrative appointment repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::admin_nombramiento::{
    AdminNombramiento, AdminNombramientoFilter, CreateAdminNombramiento, UpdateAdminNombramiento,
};
use crate::domain::resources::{AdminNombramientos, SelectOption};

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "admin_nombramiento",
    columns: "id, id_profesor, id_cargo, id_ciclo, id_puesto, carga_horas, ref_doc, \
              vigencia_inicio, vigencia_fin",
    order_by: "vigencia_inicio DESC NULLS LAST, id",
    label: "COALESCE(ref_doc, 'Nombramiento ' || id)",
};

#[derive(Debug, FromRow)]
struct AdminNombramientoRow {
    id: i32,
    id_profesor: i32,
    id_cargo: i32,
    id_ciclo: i32,
    id_puesto: Option<i32>,
    carga_horas: i16,
    ref_doc: Option<String>,
    vigencia_inicio: Option<NaiveDate>,
    vigencia_fin: Option<NaiveDate>,
}

impl IntoRecord for AdminNombramientoRow {
    type Record = AdminNombramiento;

    fn into_record(self) -> Result<AdminNombramiento, RepositoryError> {
        Ok(AdminNombramiento {
            id: self.id,
            id_profesor: self.id_profesor,
            id_cargo: self.id_cargo,
            id_ciclo: self.id_ciclo,
            id_puesto: self.id_puesto,
            carga_horas: self.carga_horas,
            ref_doc: self.ref_doc,
            vigencia_inicio: self.vigencia_inicio,
            vigencia_fin: self.vigencia_fin,
        })
    }
}

fn filter(filter_by: &AdminNombramientoFilter) -> Filter {
    Filter::default()
        .equals("id_profesor", filter_by.id_profesor)
        .equals("id_cargo", filter_by.id_cargo)
        .equals("id_ciclo", filter_by.id_ciclo)
}

/// `sqlx` implementation of the administrative appointment repository port.
#[derive(Debug, Clone)]
pub struct SqlxAdminNombramientoRepository {
    pool: DbPool,
}

impl SqlxAdminNombramientoRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<AdminNombramientos> for SqlxAdminNombramientoRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &AdminNombramientoFilter,
    ) -> Result<RecordPage<AdminNombramiento>, RepositoryError> {
        query_helpers::fetch_page::<AdminNombramientoRow>(
            &self.pool,
            &TABLE,
            &filter(filter_by),
            page,
        )
        .await
    }

    async fn find_for_select(
        &self,
        filter_by: &AdminNombramientoFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        query_helpers::fetch_options(&self.pool, &TABLE, &filter(filter_by)).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<AdminNombramiento>, RepositoryError> {
        query_helpers::fetch_by_id::<AdminNombramientoRow>(&self.pool, &TABLE, id).await
    }

    async fn create(
        &self,
        input: &CreateAdminNombramiento,
    ) -> Result<AdminNombramiento, RepositoryError> {
        let values = Assignments::default()
            .value("id_profesor", input.id_profesor)
            .value("id_cargo", input.id_cargo)
            .value("id_ciclo", input.id_ciclo)
            .value("id_puesto", input.id_puesto)
            .value("carga_horas", input.carga_horas)
            .value("ref_doc", input.ref_doc.clone())
            .value("vigencia_inicio", input.vigencia_inicio)
            .value("vigencia_fin", input.vigencia_fin);
        query_helpers::insert::<AdminNombramientoRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateAdminNombramiento,
    ) -> Result<Option<AdminNombramiento>, RepositoryError> {
        let values = Assignments::default()
            .set("id_profesor", changes.id_profesor)
            .set("id_cargo", changes.id_cargo)
            .set("id_ciclo", changes.id_ciclo)
            .change("id_puesto", &changes.id_puesto)
            .set("carga_horas", changes.carga_horas)
            .change("ref_doc", &changes.ref_doc)
            .change("vigencia_inicio", &changes.vigencia_inicio)
            .change("vigencia_fin", &changes.vigencia_fin);
        query_helpers::update::<AdminNombramientoRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
