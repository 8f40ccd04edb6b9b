//! End-to-end behaviour of the department endpoints over an in-memory
//! repository: validation, pagination, storage error mapping and the error
//! envelope.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use sac_backend::Trace;
use sac_backend::domain::DatabaseError;
use sac_backend::domain::ports::FixtureReadinessProbe;
use sac_backend::domain::resources::Estado;
use sac_backend::inbound::http::routes::api_scope;
use sac_backend::inbound::http::state::{HttpState, HttpStatePorts};
use sac_backend::middleware::{ErrorContext, TRACE_ID_HEADER};
use sac_backend::test_support::{InMemoryDepartamentos, UnusedRepository};

const BASE: &str = "/api/v1/departamentos";

#[fixture]
fn repository() -> Arc<InMemoryDepartamentos> {
    Arc::new(InMemoryDepartamentos::new())
}

fn http_state(repository: Arc<InMemoryDepartamentos>) -> HttpState {
    HttpState::new(HttpStatePorts {
        departamentos: repository,
        cursos: Arc::new(UnusedRepository),
        cursos_grupos: Arc::new(UnusedRepository),
        profesores: Arc::new(UnusedRepository),
        admin_nombramientos: Arc::new(UnusedRepository),
        presupuestos: Arc::new(UnusedRepository),
        proyectos: Arc::new(UnusedRepository),
        readiness: Arc::new(FixtureReadinessProbe),
    })
}

async fn init_app(
    repository: Arc<InMemoryDepartamentos>,
    expose_details: bool,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = http_state(repository);
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(ErrorContext::new(expose_details))
            .wrap(Trace)
            .service(api_scope(&state)),
    )
    .await
}

async fn send(
    repository: Arc<InMemoryDepartamentos>,
    expose_details: bool,
    request: TestRequest,
) -> ServiceResponse<BoxBody> {
    let app = init_app(repository, expose_details).await;
    actix_test::call_service(&app, request.to_request()).await
}

async fn json_of(response: ServiceResponse<BoxBody>) -> Value {
    actix_test::read_body_json(response).await
}

#[rstest]
#[actix_web::test]
async fn create_trims_name_and_defaults_status(repository: Arc<InMemoryDepartamentos>) {
    let response = send(
        repository.clone(),
        false,
        TestRequest::post()
            .uri(BASE)
            .set_json(json!({ "nombre": "  Física  " })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_of(response).await;
    assert_eq!(body["nombre"], "Física");
    assert_eq!(body["estado"], "Activo");
    let rows = repository.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.first().map(|row| row.nombre.as_str()), Some("Física"));
}

#[rstest]
#[actix_web::test]
async fn duplicate_name_is_a_conflict_without_details(repository: Arc<InMemoryDepartamentos>) {
    repository.seed("Física", Estado::Activo);

    let response = send(
        repository,
        false,
        TestRequest::post()
            .uri(BASE)
            .set_json(json!({ "nombre": "Física" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_of(response).await;
    assert_eq!(
        body,
        json!({ "error": { "code": "DUPLICATE", "message": "Resource already exists." } })
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_name_carries_diagnostics_in_development(
    repository: Arc<InMemoryDepartamentos>,
) {
    repository.seed("Física", Estado::Activo);

    let response = send(
        repository,
        true,
        TestRequest::post()
            .uri(BASE)
            .set_json(json!({ "nombre": "Física" })),
    )
    .await;

    let body = json_of(response).await;
    let details = &body["error"]["details"];
    assert_eq!(details["sqlstate"], "23505");
    assert_eq!(details["table"], "departamento");
    assert_eq!(details["constraint"], "departamento_nombre_unique");
}

#[rstest]
#[actix_web::test]
async fn second_page_reports_pagination_metadata(repository: Arc<InMemoryDepartamentos>) {
    for n in 1..=15 {
        repository.seed(&format!("Departamento {n:02}"), Estado::Activo);
    }

    let response = send(
        repository,
        false,
        TestRequest::get().uri(&format!("{BASE}?page=2&limit=10")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_of(response).await;
    assert_eq!(
        body["pagination"],
        json!({ "page": 2, "limit": 10, "total": 15, "totalPages": 2 })
    );
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["data"][0]["nombre"], "Departamento 11");
}

#[rstest]
#[actix_web::test]
async fn empty_table_has_no_pages(repository: Arc<InMemoryDepartamentos>) {
    let response = send(repository, false, TestRequest::get().uri(BASE)).await;

    let body = json_of(response).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 10, "total": 0, "totalPages": 0 })
    );
}

#[rstest]
#[case("page=0", "page")]
#[case("limit=501", "limit")]
#[case("estado=Borrado", "estado")]
#[actix_web::test]
async fn invalid_list_query_is_rejected(
    repository: Arc<InMemoryDepartamentos>,
    #[case] query: &str,
    #[case] field: &str,
) {
    let response = send(
        repository,
        false,
        TestRequest::get().uri(&format!("{BASE}?{query}")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_of(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["issues"][0]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn deleting_a_referenced_department_reports_dependencies(
    repository: Arc<InMemoryDepartamentos>,
) {
    let row = repository.seed("Física", Estado::Activo);
    repository.add_dependent(row.id);

    let response = send(
        repository.clone(),
        false,
        TestRequest::delete().uri(&format!("{BASE}/{}", row.id)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_of(response).await;
    assert_eq!(body["error"]["code"], "HAS_DEPENDENCIES");
    assert_eq!(repository.rows().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content(repository: Arc<InMemoryDepartamentos>) {
    let row = repository.seed("Física", Estado::Activo);

    let response = send(
        repository.clone(),
        false,
        TestRequest::delete().uri(&format!("{BASE}/{}", row.id)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = actix_test::read_body(response).await;
    assert!(bytes.is_empty());
    assert!(repository.rows().is_empty());
}

#[rstest]
#[case(TestRequest::get())]
#[case(TestRequest::delete())]
#[actix_web::test]
async fn missing_record_is_not_found(
    repository: Arc<InMemoryDepartamentos>,
    #[case] request: TestRequest,
) {
    let response = send(repository, false, request.uri(&format!("{BASE}/999"))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body = json_of(response).await;
    assert_eq!(
        body,
        json!({ "error": { "code": "NOT_FOUND", "message": "Departamento 999 not found" } })
    );
}

#[rstest]
#[actix_web::test]
async fn update_applies_only_supplied_fields(repository: Arc<InMemoryDepartamentos>) {
    let row = repository.seed("Física", Estado::Activo);

    let response = send(
        repository,
        false,
        TestRequest::put()
            .uri(&format!("{BASE}/{}", row.id))
            .set_json(json!({ "estado": "Inactivo" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_of(response).await;
    assert_eq!(body["nombre"], "Física");
    assert_eq!(body["estado"], "Inactivo");
}

#[rstest]
#[actix_web::test]
async fn update_with_invalid_id_reports_only_the_id(repository: Arc<InMemoryDepartamentos>) {
    let response = send(
        repository,
        false,
        TestRequest::put()
            .uri(&format!("{BASE}/abc"))
            .set_json(json!({ "nombre": 5, "estado": "Borrado" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_of(response).await;
    assert_eq!(
        body["error"]["details"]["issues"],
        json!([{ "field": "id", "message": "must be an integer" }])
    );
}

#[rstest]
#[actix_web::test]
async fn create_reports_every_invalid_field(repository: Arc<InMemoryDepartamentos>) {
    let response = send(
        repository.clone(),
        false,
        TestRequest::post()
            .uri(BASE)
            .set_json(json!({ "nombre": "   ", "estado": "Borrado" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_of(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Invalid data");
    let fields: Vec<&str> = body["error"]["details"]["issues"]
        .as_array()
        .map(|issues| issues.iter().filter_map(|i| i["field"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(fields, ["nombre", "estado"]);
    assert!(repository.rows().is_empty());
}

#[rstest]
#[case("abc")]
#[case("0")]
#[case("-4")]
#[actix_web::test]
async fn non_positive_or_non_numeric_id_is_a_validation_error(
    repository: Arc<InMemoryDepartamentos>,
    #[case] id: &str,
) {
    let response = send(
        repository,
        false,
        TestRequest::get().uri(&format!("{BASE}/{id}")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_of(response).await;
    assert_eq!(body["error"]["details"]["issues"][0]["field"], "id");
}

#[rstest]
#[actix_web::test]
async fn deadlock_is_retryable(repository: Arc<InMemoryDepartamentos>) {
    repository.fail_next(DatabaseError::new("40P01", "deadlock detected"));

    let response = send(repository, false, TestRequest::get().uri(BASE)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("1")
    );
    let body = json_of(response).await;
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[rstest]
#[actix_web::test]
async fn unknown_sqlstate_is_a_generic_database_error(repository: Arc<InMemoryDepartamentos>) {
    repository.fail_next(DatabaseError::new("99999", "something odd"));

    let response = send(repository, false, TestRequest::get().uri(BASE)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_of(response).await;
    assert_eq!(
        body,
        json!({ "error": { "code": "DATABASE_ERROR", "message": "Database error" } })
    );
}

#[rstest]
#[actix_web::test]
async fn non_json_content_type_is_unsupported(repository: Arc<InMemoryDepartamentos>) {
    let response = send(
        repository,
        false,
        TestRequest::post()
            .uri(BASE)
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("nombre=Física"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = json_of(response).await;
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_rejected(repository: Arc<InMemoryDepartamentos>) {
    let response = send(
        repository,
        false,
        TestRequest::post()
            .uri(BASE)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"nombre\":"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_of(response).await;
    assert_eq!(
        body,
        json!({ "error": { "code": "INVALID_JSON", "message": "Invalid JSON format" } })
    );
}

#[rstest]
#[actix_web::test]
async fn select_lists_active_departments_by_label(repository: Arc<InMemoryDepartamentos>) {
    let quimica = repository.seed("Química", Estado::Activo);
    let biologia = repository.seed("Biología", Estado::Activo);
    repository.seed("Física", Estado::Inactivo);

    let response = send(
        repository,
        false,
        TestRequest::get().uri(&format!("{BASE}/select")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_of(response).await;
    assert_eq!(
        body,
        json!([
            { "id": biologia.id, "label": "Biología" },
            { "id": quimica.id, "label": "Química" },
        ])
    );
}
