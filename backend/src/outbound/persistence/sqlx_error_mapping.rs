//! Translation of `sqlx` failures into repository errors.
//!
//! Server-side failures keep their SQLSTATE and diagnostics so the HTTP
//! adapter can classify them. Failures to reach the server are reported with
//! the connection-failure SQLSTATE; everything else loses its code and ends up
//! as a generic internal error.

use sqlx::postgres::PgDatabaseError;
use tracing::debug;

use crate::domain::DatabaseError;
use crate::domain::ports::RepositoryError;

/// Convert a server-reported error into the driver-neutral form.
fn database_error(error: &dyn sqlx::error::DatabaseError) -> DatabaseError {
    let code = error.code().map(|code| code.into_owned()).unwrap_or_default();
    let base = DatabaseError::new(code, error.message())
        .with_table(error.table())
        .with_constraint(error.constraint());
    match error.try_downcast_ref::<PgDatabaseError>() {
        Some(pg) => base
            .with_schema(pg.schema())
            .with_column(pg.column())
            .with_detail(pg.detail()),
        None => base,
    }
}

/// Map a `sqlx` error raised while running `operation`.
pub(super) fn map_sqlx_error(operation: &str, error: sqlx::Error) -> RepositoryError {
    debug!(%operation, error = %error, "sqlx operation failed");
    match error {
        sqlx::Error::Database(db_error) => {
            RepositoryError::database(operation, database_error(db_error.as_ref()))
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => RepositoryError::database(
            operation,
            DatabaseError::connection_failure(error.to_string()),
        ),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => RepositoryError::decode(error.to_string()),
        other => RepositoryError::query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_timeouts_become_connection_failures() {
        let err = map_sqlx_error("list cursos", sqlx::Error::PoolTimedOut);
        match err {
            RepositoryError::Database { operation, source } => {
                assert_eq!(operation, "list cursos");
                assert_eq!(source.code(), crate::domain::storage_error::CONNECTION_FAILURE);
            }
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[rstest]
    fn io_errors_become_connection_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = map_sqlx_error("count", sqlx::Error::Io(io));
        assert!(matches!(
            err,
            RepositoryError::Database { ref source, .. } if source.code() == "08006"
        ));
    }

    #[rstest]
    fn missing_columns_are_decode_errors() {
        let err = map_sqlx_error("get", sqlx::Error::ColumnNotFound("sigla".to_owned()));
        assert!(matches!(err, RepositoryError::Decode { .. }));
    }

    #[rstest]
    fn other_driver_errors_are_query_errors() {
        let err = map_sqlx_error("get", sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Query { .. }));
    }
}
