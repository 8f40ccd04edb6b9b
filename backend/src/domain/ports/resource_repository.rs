//! Port abstraction for per-resource persistence adapters and their errors.
//!
//! Every resource exposes the same six operations. Absence is reported with
//! sentinels (`None`, `false`) rather than errors so that the service layer is
//! the only place where a missing record becomes a not-found failure.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::DatabaseError;
use crate::domain::resources::{Resource, SelectOption};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by resource repositories.
    pub enum RepositoryError {
        /// The storage engine rejected a statement.
        Database { operation: String, source: DatabaseError } =>
            "{operation} failed: {source}",
        /// A stored row could not be converted into a domain record.
        Decode { message: String } => "stored row could not be decoded: {message}",
        /// The driver failed without a storage error code.
        Query { message: String } => "query failed: {message}",
    }
}

/// One page of records together with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage<T> {
    /// Records on the requested page, in resource order.
    pub items: Vec<T>,
    /// Rows matching the filter across all pages.
    pub total: u64,
}

/// Data access for one resource.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    /// Fetch one page of records matching `filter`, plus the total count.
    async fn find_paginated(
        &self,
        page: PageRequest,
        filter: &R::ListFilter,
    ) -> Result<RecordPage<R::Record>, RepositoryError>;

    /// Fetch lightweight `{id, label}` options for pickers.
    async fn find_for_select(
        &self,
        filter: &R::SelectFilter,
    ) -> Result<Vec<SelectOption>, RepositoryError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<R::Record>, RepositoryError>;

    /// Insert a record and return it as stored.
    async fn create(&self, input: &R::Create) -> Result<R::Record, RepositoryError>;

    /// Apply `changes` to a record; `None` when no row has `id`.
    async fn update(
        &self,
        id: i32,
        changes: &R::Update,
    ) -> Result<Option<R::Record>, RepositoryError>;

    /// Delete a record; `false` when no row has `id`.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}
