//! Service-level behaviour: not-found conversion, pagination metadata and
//! business rule short-circuiting.

use std::sync::Arc;

use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::RepositoryError;
use crate::domain::resources::admin_nombramiento::{CreateAdminNombramiento, INVALID_DATE_RANGE};
use crate::domain::resources::departamento::{
    CreateDepartamento, DepartamentoFilter, UpdateDepartamento,
};
use crate::domain::resources::{AdminNombramientos, Departamentos, Estado};
use crate::domain::{DatabaseError, codes};
use crate::test_support::{InMemoryDepartamentos, UnusedRepository};

#[fixture]
fn repository() -> Arc<InMemoryDepartamentos> {
    Arc::new(InMemoryDepartamentos::new())
}

fn service(repository: &Arc<InMemoryDepartamentos>) -> ResourceService<Departamentos> {
    ResourceService::new(repository.clone())
}

fn expect_not_found(failure: Failure) -> AppError {
    match failure {
        Failure::App(err) if err.code() == codes::NOT_FOUND => err,
        other => panic!("expected not found, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn get_missing_record_reports_resource_and_id(repository: Arc<InMemoryDepartamentos>) {
    let err = expect_not_found(
        service(&repository)
            .get_by_id(999)
            .await
            .expect_err("missing record"),
    );
    assert_eq!(err.message(), "Departamento 999 not found");
    assert_eq!(err.status(), 404);
}

#[rstest]
#[tokio::test]
async fn update_missing_record_is_not_found(repository: Arc<InMemoryDepartamentos>) {
    let changes = UpdateDepartamento {
        nombre: Some("Química".to_owned()),
        estado: None,
    };
    let err = expect_not_found(
        service(&repository)
            .update(41, changes)
            .await
            .expect_err("missing record"),
    );
    assert!(err.message().contains("Departamento"));
    assert!(err.message().contains("41"));
}

#[rstest]
#[tokio::test]
async fn delete_missing_record_is_not_found(repository: Arc<InMemoryDepartamentos>) {
    let err = expect_not_found(
        service(&repository)
            .delete(7)
            .await
            .expect_err("missing record"),
    );
    assert_eq!(err.message(), "Departamento 7 not found");
}

#[rstest]
#[tokio::test]
async fn empty_update_returns_stored_record(repository: Arc<InMemoryDepartamentos>) {
    let stored = repository.seed("Física", Estado::Activo);
    let record = service(&repository)
        .update(stored.id, UpdateDepartamento::default())
        .await
        .expect("empty update succeeds");
    assert_eq!(record, stored);
}

#[rstest]
#[tokio::test]
async fn list_computes_pagination_metadata(repository: Arc<InMemoryDepartamentos>) {
    for n in 0..15 {
        repository.seed(&format!("Departamento {n:02}"), Estado::Activo);
    }
    let page = service(&repository)
        .list(ListQuery {
            page: PageRequest::new(2, 10).expect("valid page"),
            filter: DepartamentoFilter::default(),
        })
        .await
        .expect("list succeeds");
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.pagination.page, 2);
    assert_eq!(page.pagination.total, 15);
    assert_eq!(page.pagination.total_pages, 2);
}

#[rstest]
#[tokio::test]
async fn empty_list_has_zero_pages(repository: Arc<InMemoryDepartamentos>) {
    let page = service(&repository)
        .list(ListQuery {
            page: PageRequest::default(),
            filter: DepartamentoFilter::default(),
        })
        .await
        .expect("list succeeds");
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_pages, 0);
}

#[rstest]
#[tokio::test]
async fn storage_errors_pass_through_unclassified(repository: Arc<InMemoryDepartamentos>) {
    repository.fail_next(DatabaseError::new("40P01", "deadlock detected"));
    let failure = service(&repository)
        .create(CreateDepartamento {
            nombre: "Física".to_owned(),
            estado: Estado::Activo,
        })
        .await
        .expect_err("injected failure");
    assert!(matches!(
        failure,
        Failure::Storage(RepositoryError::Database { ref source, .. }) if source.code() == "40P01"
    ));
}

#[rstest]
#[tokio::test]
async fn business_rules_run_before_the_repository() {
    let service: ResourceService<AdminNombramientos> =
        ResourceService::new(Arc::new(UnusedRepository));
    let input = CreateAdminNombramiento {
        id_profesor: 1,
        id_cargo: 1,
        id_ciclo: 1,
        id_puesto: None,
        carga_horas: 0,
        ref_doc: None,
        vigencia_inicio: chrono::NaiveDate::from_ymd_opt(2024, 6, 1),
        vigencia_fin: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
    };
    let failure = service.create(input).await.expect_err("inverted range");
    assert!(matches!(failure, Failure::App(ref err) if err.code() == INVALID_DATE_RANGE));
}
