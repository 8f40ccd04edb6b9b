//! PostgreSQL-backed lecturer repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::PageRequest;
use sqlx::FromRow;

use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::profesor::{
    CreateProfesor, Profesor, ProfesorFilter, ProfesorSelectFilter, UpdateProfesor,
};
use crate::domain::resources::{Profesores, SelectOption};
use crate::domain::validation::SearchTerm;

use super::pool::DbPool;
use super::query_helpers::{self, Assignments, Filter, IntoRecord, Table};

const TABLE: Table = Table {
    name: "profesor",
    columns: "id, identificacion, nombre, apellido1, apellido2, telefono1, telefono2, \
              telefono3, email, oficina, casillero, fecha_nombramiento, estado",
    order_by: "apellido1, apellido2, nombre, id",
    label: "concat_ws(' ', nombre, apellido1, apellido2)",
};

const SEARCH_COLUMNS: &[&str] = &["identificacion", "nombre", "apellido1", "apellido2"];

#[derive(Debug, FromRow)]
struct ProfesorRow {
    id: i32,
    identificacion: String,
    nombre: String,
    apellido1: String,
    apellido2: Option<String>,
    telefono1: Option<String>,
    telefono2: Option<String>,
    telefono3: Option<String>,
    email: Option<String>,
    oficina: Option<String>,
    casillero: Option<String>,
    fecha_nombramiento: Option<NaiveDate>,
    estado: String,
}

impl IntoRecord for ProfesorRow {
    type Record = Profesor;

    fn into_record(self) -> Result<Profesor, RepositoryError> {
        let estado = self
            .estado
            .parse()
            .map_err(|err| RepositoryError::decode(format!("profesor {}: {err}", self.id)))?;
        Ok(Profesor {
            id: self.id,
            identificacion: self.identificacion,
            nombre: self.nombre,
            apellido1: self.apellido1,
            apellido2: self.apellido2,
            telefono1: self.telefono1,
            telefono2: self.telefono2,
            telefono3: self.telefono3,
            email: self.email,
            oficina: self.oficina,
            casillero: self.casillero,
            fecha_nombramiento: self.fecha_nombramiento,
            estado,
        })
    }
}

fn filter(estado: Option<&str>, q: Option<&SearchTerm>) -> Filter {
    Filter::default()
        .equals("estado", estado)
        .search(SEARCH_COLUMNS, q)
}

/// `sqlx` implementation of the lecturer repository port.
#[derive(Debug, Clone)]
pub struct SqlxProfesorRepository {
    pool: DbPool,
}

impl SqlxProfesorRepository {
    /// Create a repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository<Profesores> for SqlxProfesorRepository {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter_by: &ProfesorFilter,
    ) -> Result<RecordPage<Profesor>, RepositoryError> {
        let conditions = filter(
            filter_by.estado.map(|estado| estado.as_str()),
            filter_by.q.as_ref(),
        );
        query_helpers::fetch_page::<ProfesorRow>(&self.pool, &TABLE, &conditions, page).await
    }

    async fn find_for_select(
        &self,
        filter_by: &ProfesorSelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        let conditions = filter(Some(filter_by.estado.as_str()), filter_by.q.as_ref());
        query_helpers::fetch_options(&self.pool, &TABLE, &conditions).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Profesor>, RepositoryError> {
        query_helpers::fetch_by_id::<ProfesorRow>(&self.pool, &TABLE, id).await
    }

    async fn create(&self, input: &CreateProfesor) -> Result<Profesor, RepositoryError> {
        let values = Assignments::default()
            .value("identificacion", input.identificacion.clone())
            .value("nombre", input.nombre.clone())
            .value("apellido1", input.apellido1.clone())
            .value("apellido2", input.apellido2.clone())
            .value("telefono1", input.telefono1.clone())
            .value("telefono2", input.telefono2.clone())
            .value("telefono3", input.telefono3.clone())
            .value("email", input.email.clone())
            .value("oficina", input.oficina.clone())
            .value("casillero", input.casillero.clone())
            .value("fecha_nombramiento", input.fecha_nombramiento)
            .value("estado", input.estado.as_str());
        query_helpers::insert::<ProfesorRow>(&self.pool, &TABLE, &values).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateProfesor,
    ) -> Result<Option<Profesor>, RepositoryError> {
        let values = Assignments::default()
            .set("identificacion", changes.identificacion.clone())
            .set("nombre", changes.nombre.clone())
            .set("apellido1", changes.apellido1.clone())
            .change("apellido2", &changes.apellido2)
            .change("telefono1", &changes.telefono1)
            .change("telefono2", &changes.telefono2)
            .change("telefono3", &changes.telefono3)
            .change("email", &changes.email)
            .change("oficina", &changes.oficina)
            .change("casillero", &changes.casillero)
            .change("fecha_nombramiento", &changes.fecha_nombramiento)
            .set("estado", changes.estado.map(|estado| estado.as_str()));
        query_helpers::update::<ProfesorRow>(&self.pool, &TABLE, id, &values).await
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        query_helpers::delete(&self.pool, &TABLE, id).await
    }
}
