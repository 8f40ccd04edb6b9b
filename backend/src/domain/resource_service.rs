//! Generic CRUD orchestration.
//!
//! The service is the single place where a repository's absence sentinels
//! (`None` from lookups and updates, `false` from deletes) become
//! [`AppError::not_found`] failures. Storage errors pass through untouched so
//! the HTTP adapter can classify them.

use std::sync::Arc;

use pagination::Paginated;
use tracing::debug;

use crate::domain::ports::{RecordPage, ResourceRepository};
use crate::domain::resources::{Changeset, Resource, SelectOption};
use crate::domain::validation::ListQuery;
use crate::domain::{AppError, Failure};

/// CRUD use-cases for resource `R`.
pub struct ResourceService<R: Resource> {
    repository: Arc<dyn ResourceRepository<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    /// Create a service backed by `repository`.
    pub fn new(repository: Arc<dyn ResourceRepository<R>>) -> Self {
        Self { repository }
    }

    /// Insert a record after checking business rules.
    ///
    /// # Errors
    /// Returns [`Failure::App`] when a rule is broken and
    /// [`Failure::Storage`] when the repository fails.
    pub async fn create(&self, input: R::Create) -> Result<R::Record, Failure> {
        R::check_create(&input)?;
        Ok(self.repository.create(&input).await?)
    }

    /// Apply a partial update.
    ///
    /// An update that changes nothing returns the stored record unchanged.
    ///
    /// # Errors
    /// Returns a not-found [`Failure::App`] when no record has `id`.
    pub async fn update(&self, id: i32, changes: R::Update) -> Result<R::Record, Failure> {
        R::check_update(&changes)?;
        if changes.is_empty() {
            debug!(resource = R::NAME, id, "empty update; returning stored record");
            return self.get_by_id(id).await;
        }
        self.repository
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(R::NAME, id).into())
    }

    /// Delete a record.
    ///
    /// # Errors
    /// Returns a not-found [`Failure::App`] when no record has `id`.
    pub async fn delete(&self, id: i32) -> Result<(), Failure> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(R::NAME, id).into())
        }
    }

    /// Fetch a record.
    ///
    /// # Errors
    /// Returns a not-found [`Failure::App`] when no record has `id`.
    pub async fn get_by_id(&self, id: i32) -> Result<R::Record, Failure> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(R::NAME, id).into())
    }

    /// Fetch one page of records with pagination metadata.
    ///
    /// # Errors
    /// Returns [`Failure::Storage`] when the repository fails.
    pub async fn list(
        &self,
        query: ListQuery<R::ListFilter>,
    ) -> Result<Paginated<R::Record>, Failure> {
        let RecordPage { items, total } = self
            .repository
            .find_paginated(query.page, &query.filter)
            .await?;
        Ok(Paginated::new(items, query.page, total))
    }

    /// Fetch picker options.
    ///
    /// # Errors
    /// Returns [`Failure::Storage`] when the repository fails.
    pub async fn list_for_select(
        &self,
        filter: R::SelectFilter,
    ) -> Result<Vec<SelectOption>, Failure> {
        Ok(self.repository.find_for_select(&filter).await?)
    }
}

#[cfg(test)]
mod tests;
