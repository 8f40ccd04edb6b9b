//! PostgreSQL-backed project repository.

use async_trait::async_trait;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::proyecto::{
    CreateProyecto, Proyecto, ProyectoFilter, ProyectoSelectFilter, UpdateProyecto,
};
use crate::domain::resources::{Estado, Proyectos, SelectOption};
use crate::domain::validation::SearchTerm;

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "proyecto",
    columns: "id, codigo, id_tipo, id_centro, nombre, descripcion, vigencia_inicio, \
              vigencia_fin, activo, ref_doc",
    order_by: "nombre, id",
    label: "nombre",
};

const SEARCH_COLUMNS: &[&str] = &["nombre", "codigo"];

#[derive(Debug, FromRow)]
struct ProyectoRow {
    id: i32,
    codigo: Option<String>,
    id_tipo: i32,
    id_centro: Option<i32>,
    nombre: String,
    descripcion: Option<String>,
    vigencia_inicio: Option<String>,
    vigencia_fin: Option<String>,
    activo: bool,
    ref_doc: Option<String>,
}

impl IntoRecord for ProyectoRow {
    type Record = Proyecto;

    fn into_record(self) -> Result<Proyecto, RepositoryError> {
        Ok(Proyecto {
            id: self.id,
            codigo: self.codigo,
            id_tipo: self.id_tipo,
            id_centro: self.id_centro,
            nombre: self.nombre,
            descripcion: self.descripcion,
            vigencia_inicio: self.vigencia_inicio,
            vigencia_fin: self.vigencia_fin,
            activo: self.activo,
            ref_doc: self.ref_doc,
        })
    }
}

fn filter(estado: Option<Estado>, q: Option<&SearchTerm>) -> Filter {
    Filter::default()
        .equals("activo", estado.map(Estado::is_active))
        .search(SEARCH_COLUMNS, q)
}

/// `sqlx` implementation of the project repository port.
#[derive(Debug, Clone)]
pub struct SqlxProyectoRepository {
    pool: DbPool,
}

impl SqlxProyectoRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<Proyectos> for SqlxProyectoRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &ProyectoFilter,
    ) -> Result<RecordPage<Proyecto>, RepositoryError> {
        let conditions = filter(filter_by.estado, filter_by.q.as_ref())
            .equals("id_tipo", filter_by.id_tipo)
            .equals("id_centro", filter_by.id_centro);
        query_helpers::fetch_page::<ProyectoRow>(&self.pool, &TABLE, &conditions, page).await
    }

    async fn find_for_select(
        &self,
        filter_by: &ProyectoSelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        let conditions = filter(Some(filter_by.estado), filter_by.q.as_ref());
        query_helpers::fetch_options(&self.pool, &TABLE, &conditions).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Proyecto>, RepositoryError> {
        query_helpers::fetch_by_id::<ProyectoRow>(&self.pool, &TABLE, id).await
    }

    async fn create(&self, input: &CreateProyecto) -> Result<Proyecto, RepositoryError> {
        let values = Assignments::default()
            .value("codigo", input.codigo.clone())
            .value("id_tipo", input.id_tipo)
            .value("id_centro", input.id_centro)
            .value("nombre", input.nombre.clone())
            .value("descripcion", input.descripcion.clone())
            .value("vigencia_inicio", input.vigencia_inicio.clone())
            .value("vigencia_fin", input.vigencia_fin.clone())
            .value("activo", input.activo)
            .value("ref_doc", input.ref_doc.clone());
        query_helpers::insert::<ProyectoRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateProyecto,
    ) -> Result<Option<Proyecto>, RepositoryError> {
        let values = Assignments::default()
            .change("codigo", &changes.codigo)
            .set("id_tipo", changes.id_tipo)
            .change("id_centro", &changes.id_centro)
            .set("nombre", changes.nombre.clone())
            .change("descripcion", &changes.descripcion)
            .change("vigencia_inicio", &changes.vigencia_inicio)
            .change("vigencia_fin", &changes.vigencia_fin)
            .set("activo", changes.activo)
            .change("ref_doc", &changes.ref_doc);
        query_helpers::update::<ProyectoRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
