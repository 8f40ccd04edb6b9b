//! PostgreSQL persistence adapters using `sqlx`.
//!
//! This module provides concrete implementations of the resource repository
//! port backed by PostgreSQL through a lazily connecting `sqlx` pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between row structs and
//!   domain records. No business logic resides here.
//! - **Internal rows**: `sqlx::FromRow` structs are private to each adapter
//!   and never exposed to the domain layer.
//! - **Bound parameters**: statements are assembled with
//!   `sqlx::QueryBuilder`; user input is always bound, never interpolated.
//! - **Strongly typed errors**: driver failures become
//!   [`RepositoryError`](crate::domain::ports::RepositoryError) values that keep
//!   the server's SQLSTATE and diagnostics.
//!
//! # Example
//!
//! ```no_run
//! use sac_backend::outbound::persistence::{DbPool, PoolConfig, SqlxDepartamentoRepository};
//!
//! # fn build() -> Result<(), sac_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::connect_lazy(&PoolConfig::new("postgres://localhost/sac_mate"))?;
//! let repository = SqlxDepartamentoRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod pool;
mod query_helpers;
mod sqlx_admin_nombramiento_repository;
mod sqlx_curso_grupo_repository;
mod sqlx_curso_repository;
mod sqlx_departamento_repository;
mod sqlx_error_mapping;
mod sqlx_presupuesto_repository;
mod sqlx_profesor_repository;
mod sqlx_proyecto_repository;
mod sqlx_readiness_probe;

pub use pool::{DbPool, PoolConfig, PoolError};
pub use sqlx_admin_nombramiento_repository::SqlxAdminNombramientoRepository;
pub use sqlx_curso_grupo_repository::SqlxCursoGrupoRepository;
pub use sqlx_curso_repository::SqlxCursoRepository;
pub use sqlx_departamento_repository::SqlxDepartamentoRepository;
pub use sqlx_presupuesto_repository::SqlxPresupuestoRepository;
pub use sqlx_profesor_repository::SqlxProfesorRepository;
pub use sqlx_proyecto_repository::SqlxProyectoRepository;
pub use sqlx_readiness_probe::SqlxReadinessProbe;
