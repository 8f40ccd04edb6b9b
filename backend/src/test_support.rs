//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::DatabaseError;
use crate::domain::ports::{RecordPage, RepositoryError, ResourceRepository};
use crate::domain::resources::departamento::{
    CreateDepartamento, Departamento, DepartamentoFilter, DepartamentoSelectFilter,
    UpdateDepartamento,
};
use crate::domain::resources::{Departamentos, Estado, Resource, SelectOption};
use crate::domain::validation::SearchTerm;

#[derive(Debug, Default)]
struct State {
    rows: Vec<Departamento>,
    last_id: i32,
    dependents: HashSet<i32>,
    injected: Option<DatabaseError>,
}

/// In-memory department repository enforcing the same constraints as the
/// `departamento` table: unique `nombre` and a restricting foreign key from
/// courses.
#[derive(Debug, Default)]
pub struct InMemoryDepartamentos {
    state: Mutex<State>,
}

impl InMemoryDepartamentos {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a row directly, bypassing constraint checks.
    pub fn seed(&self, nombre: &str, estado: Estado) -> Departamento {
        let mut state = self.lock();
        state.last_id += 1;
        let row = Departamento {
            id: state.last_id,
            nombre: nombre.to_owned(),
            estado,
        };
        state.rows.push(row.clone());
        row
    }

    /// Pretend that a course references department `id`.
    pub fn add_dependent(&self, id: i32) {
        self.lock().dependents.insert(id);
    }

    /// Fail the next operation with `error`.
    pub fn fail_next(&self, error: DatabaseError) {
        self.lock().injected = Some(error);
    }

    /// Snapshot of stored rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Departamento> {
        self.lock().rows.clone()
    }

    fn take_injected(state: &mut State, operation: &str) -> Result<(), RepositoryError> {
        state
            .injected
            .take()
            .map_or(Ok(()), |error| Err(RepositoryError::database(operation, error)))
    }

    fn ensure_unique(
        state: &State,
        nombre: &str,
        except: Option<i32>,
        operation: &str,
    ) -> Result<(), RepositoryError> {
        let clash = state
            .rows
            .iter()
            .any(|row| row.nombre == nombre && Some(row.id) != except);
        if clash {
            return Err(RepositoryError::database(
                operation,
                DatabaseError::new(
                    "23505",
                    "duplicate key value violates unique constraint \"departamento_nombre_unique\"",
                )
                .with_schema(Some("public"))
                .with_table(Some("departamento"))
                .with_constraint(Some("departamento_nombre_unique")),
            ));
        }
        Ok(())
    }

    fn matches(row: &Departamento, estado: Option<Estado>, q: Option<&SearchTerm>) -> bool {
        estado.is_none_or(|wanted| row.estado == wanted)
            && q.is_none_or(|term| term.matches(&row.nombre))
    }
}

#[async_trait]
impl ResourceRepository<Departamentos> for InMemoryDepartamentos {
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter: &DepartamentoFilter,
    ) -> Result<RecordPage<Departamento>, RepositoryError> {
        let mut state = self.lock();
        Self::take_injected(&mut state, "find_paginated")?;
        let mut matching: Vec<Departamento> = state
            .rows
            .iter()
            .filter(|row| Self::matches(row, filter.estado, filter.q.as_ref()))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(skip).take(take).collect();
        Ok(RecordPage { items, total })
    }

    async fn find_for_select(
        &self,
        filter: &DepartamentoSelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        let mut state = self.lock();
        Self::take_injected(&mut state, "find_for_select")?;
        let mut options: Vec<SelectOption> = state
            .rows
            .iter()
            .filter(|row| Self::matches(row, Some(filter.estado), filter.q.as_ref()))
            .map(|row| SelectOption {
                id: row.id,
                label: row.nombre.clone(),
            })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(options)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Departamento>, RepositoryError> {
        let mut state = self.lock();
        Self::take_injected(&mut state, "find_by_id")?;
        Ok(state.rows.iter().find(|row| row.id == id).cloned())
    }

    async fn create(&self, input: &CreateDepartamento) -> Result<Departamento, RepositoryError> {
        let mut state = self.lock();
        Self::take_injected(&mut state, "create")?;
        Self::ensure_unique(&state, &input.nombre, None, "create")?;
        state.last_id += 1;
        let row = Departamento {
            id: state.last_id,
            nombre: input.nombre.clone(),
            estado: input.estado,
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateDepartamento,
    ) -> Result<Option<Departamento>, RepositoryError> {
        let mut state = self.lock();
        Self::take_injected(&mut state, "update")?;
        if let Some(nombre) = &changes.nombre {
            Self::ensure_unique(&state, nombre, Some(id), "update")?;
        }
        let Some(row) = state.rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        if let Some(nombre) = &changes.nombre {
            row.nombre.clone_from(nombre);
        }
        if let Some(estado) = changes.estado {
            row.estado = estado;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.lock();
        Self::take_injected(&mut state, "delete")?;
        if !state.rows.iter().any(|row| row.id == id) {
            return Ok(false);
        }
        if state.dependents.contains(&id) {
            return Err(RepositoryError::database(
                "delete",
                DatabaseError::new(
                    "23503",
                    "update or delete on table \"departamento\" violates foreign key constraint \"curso_id_departamento_fkey\" on table \"curso\"",
                )
                .with_schema(Some("public"))
                .with_table(Some("curso"))
                .with_constraint(Some("curso_id_departamento_fkey")),
            ));
        }
        state.rows.retain(|row| row.id != id);
        Ok(true)
    }
}

/// Repository for resources a test never touches; every call fails with a
/// query error.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnusedRepository;

#[async_trait]
impl<R: Resource> ResourceRepository<R> for UnusedRepository {
    async fn find_paginated(
        &self,
        _page: PageRequest,
        _filter: &R::ListFilter,
    ) -> Result<RecordPage<R::Record>, RepositoryError> {
        Err(RepositoryError::query("unexpected call"))
    }

    async fn find_for_select(
        &self,
        _filter: &R::SelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError> {
        Err(RepositoryError::query("unexpected call"))
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<R::Record>, RepositoryError> {
        Err(RepositoryError::query("unexpected call"))
    }

    async fn create(&self, _input: &R::Create) -> Result<R::Record, RepositoryError> {
        Err(RepositoryError::query("unexpected call"))
    }

    async fn update(
        &self,
        _id: i32,
        _changes: &R::Update,
    ) -> Result<Option<R::Record>, RepositoryError> {
        Err(RepositoryError::query("unexpected call"))
    }

    async fn delete(&self, _id: i32) -> Result<bool, RepositoryError> {
        Err(RepositoryError::query("unexpected call"))
    }
}
