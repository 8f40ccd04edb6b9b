//! Tests for the central error responder.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::HttpMethod;
use crate::domain::ports::RepositoryError;
use crate::domain::validation::Issue;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[derive(Debug, thiserror::Error)]
#[error("wrapped: {source}")]
struct Wrapped {
    #[source]
    source: DatabaseError,
}

#[fixture]
fn production_post() -> RequestContext {
    RequestContext::new(HttpMethod::Post, "/api/v1/departamentos", false)
}

#[fixture]
fn development_post() -> RequestContext {
    RequestContext::new(HttpMethod::Post, "/api/v1/departamentos", true)
}

fn duplicate() -> DatabaseError {
    DatabaseError::new("23505", "duplicate key value violates unique constraint")
        .with_schema(Some("public"))
        .with_table(Some("departamento"))
        .with_constraint(Some("departamento_nombre_unique"))
}

fn storage(error: DatabaseError) -> Failure {
    RepositoryError::database("create", error).into()
}

struct Responded {
    status: StatusCode,
    retry_after: Option<String>,
    envelope: ErrorEnvelope,
}

async fn respond(failure: Failure, context: RequestContext) -> Responded {
    let response = RequestContext::scope(context, async move { failure.error_response() }).await;
    let status = response.status();
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let envelope = serde_json::from_slice(&bytes).expect("error envelope deserialises");
    Responded {
        status,
        retry_after,
        envelope,
    }
}

#[rstest]
#[actix_web::test]
async fn validation_failures_list_every_issue(production_post: RequestContext) {
    let failure = Failure::from(ValidationFailure::new(vec![
        Issue::new("nombre", "Required"),
        Issue::new("estado", "must be one of: Activo, Inactivo"),
    ]));

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope.error.code, "VALIDATION_ERROR");
    assert_eq!(envelope.error.message, "Invalid data");
    assert_eq!(
        envelope.error.details,
        Some(json!({
            "issues": [
                { "field": "nombre", "message": "Required" },
                { "field": "estado", "message": "must be one of: Activo, Inactivo" },
            ]
        }))
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_rows_map_to_conflict_without_details_in_production(
    production_post: RequestContext,
) {
    let responded = respond(storage(duplicate()), production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::CONFLICT);
    assert_eq!(envelope.error.code, "DUPLICATE");
    assert_eq!(envelope.error.message, "Resource already exists.");
    assert!(envelope.error.details.is_none());
}

#[rstest]
#[actix_web::test]
async fn development_responses_carry_storage_diagnostics(development_post: RequestContext) {
    let Responded { envelope, .. } = respond(storage(duplicate()), development_post).await;

    assert_eq!(
        envelope.error.details,
        Some(json!({
            "sqlstate": "23505",
            "schema": "public",
            "table": "departamento",
            "constraint": "departamento_nombre_unique",
        }))
    );
}

#[rstest]
#[case(HttpMethod::Delete, StatusCode::CONFLICT, "HAS_DEPENDENCIES")]
#[case(HttpMethod::Put, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REFERENCE")]
#[case(HttpMethod::Post, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REFERENCE")]
#[actix_web::test]
async fn foreign_key_violations_depend_on_method(
    #[case] method: HttpMethod,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let context = RequestContext::new(method, "/api/v1/departamentos/1", false);
    let failure = storage(DatabaseError::new("23503", "foreign key violation"));

    let responded = respond(failure, context).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, status);
    assert_eq!(envelope.error.code, code);
}

#[rstest]
#[actix_web::test]
async fn transient_failures_ask_clients_to_retry(production_post: RequestContext) {
    let failure = storage(DatabaseError::new("40P01", "deadlock detected"));

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(responded.retry_after.as_deref(), Some("1"));
    assert_eq!(envelope.error.code, "SERVICE_UNAVAILABLE");
    assert_eq!(
        envelope.error.message,
        "Temporary database issue. Please retry."
    );
}

#[rstest]
#[actix_web::test]
async fn unmapped_storage_codes_become_database_errors(production_post: RequestContext) {
    let failure = storage(DatabaseError::new("99999", "mystery"));

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(responded.retry_after.is_none());
    assert_eq!(envelope.error.code, "DATABASE_ERROR");
    assert_eq!(envelope.error.message, "Database error");
    assert!(envelope.error.details.is_none());
}

#[rstest]
#[actix_web::test]
async fn application_errors_are_emitted_as_is(production_post: RequestContext) {
    let failure = Failure::from(AppError::not_found("Departamento", 999));

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.error.code, "NOT_FOUND");
    assert_eq!(envelope.error.message, "Departamento 999 not found");
}

#[rstest]
#[actix_web::test]
async fn storage_errors_wrapped_once_are_still_classified(production_post: RequestContext) {
    let failure = Failure::unexpected(Wrapped { source: duplicate() });

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::CONFLICT);
    assert_eq!(envelope.error.code, "DUPLICATE");
}

#[rstest]
#[actix_web::test]
async fn storage_failures_without_sqlstate_are_internal(production_post: RequestContext) {
    let failure = Failure::from(RepositoryError::decode("unknown estado `X`"));

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope.error.code, "INTERNAL_ERROR");
    assert_eq!(envelope.error.message, "Internal server error");
    assert!(envelope.error.details.is_none());
}

#[rstest]
#[actix_web::test]
async fn unexpected_errors_are_redacted_in_production(production_post: RequestContext) {
    let failure = Failure::unexpected(std::io::Error::other("disk on fire"));

    let responded = respond(failure, production_post).await;
    let envelope = &responded.envelope;

    assert_eq!(responded.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope.error.message, "Internal server error");
    assert!(envelope.error.details.is_none());
}

#[rstest]
#[actix_web::test]
async fn unexpected_errors_are_explained_in_development(development_post: RequestContext) {
    let failure = Failure::unexpected(std::io::Error::other("disk on fire"));

    let Responded { envelope, .. } = respond(failure, development_post).await;

    assert_eq!(envelope.error.code, "INTERNAL_ERROR");
    assert_eq!(envelope.error.message, "disk on fire");
    assert_eq!(envelope.error.details, Some(json!({ "reason": "disk on fire" })));
}

#[rstest]
fn status_code_agrees_with_rendered_response() {
    let failure = Failure::from(AppError::business_rule("nope"));
    assert_eq!(
        ResponseError::status_code(&failure),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[rstest]
#[actix_web::test]
async fn error_responses_echo_the_trace_id() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let failure = Failure::from(AppError::bad_request("bad"));

    let response = TraceId::scope(trace_id, async move { failure.error_response() }).await;

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    assert_eq!(header, Some(TRACE_ID));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
fn envelope_omits_absent_details() {
    let envelope = ErrorEnvelope {
        error: ErrorBody {
            code: "NOT_FOUND".to_owned(),
            message: "Departamento 999 not found".to_owned(),
            details: None,
        },
    };
    assert_eq!(
        serde_json::to_value(&envelope).expect("serialises"),
        json!({ "error": { "code": "NOT_FOUND", "message": "Departamento 999 not found" } })
    );
}

/// In-memory sink for JSON log lines.
#[derive(Clone, Default)]
struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer lock is not poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn events(&self) -> Vec<Value> {
        let bytes = self.0.lock().expect("log buffer lock is not poisoned");
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("log line is JSON"))
            .collect()
    }
}

#[rstest]
#[case::validation(
    || Failure::from(ValidationFailure::single("nombre", "Required")),
    "validation_error",
    "INFO"
)]
#[case::mapped(|| storage(duplicate()), "database_error", "WARN")]
#[case::unmapped(
    || storage(DatabaseError::new("99999", "mystery")),
    "unmapped_database_error",
    "ERROR"
)]
#[case::client_app(|| Failure::from(AppError::not_found("Departamento", 9)), "app_error", "INFO")]
#[case::server_app(
    || Failure::from(AppError::new(500, codes::INTERNAL_ERROR, "boom")),
    "app_error",
    "ERROR"
)]
#[case::unknown(
    || Failure::unexpected(std::io::Error::other("disk on fire")),
    "unhandled_error",
    "ERROR"
)]
#[actix_web::test]
async fn each_failure_logs_one_structured_event(
    production_post: RequestContext,
    #[case] make: fn() -> Failure,
    #[case] kind: &str,
    #[case] level: &str,
) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    respond(make(), production_post).await;

    let events = buffer.events();
    assert_eq!(events.len(), 1, "expected exactly one event, got {events:?}");
    let event = &events[0];
    assert_eq!(event["kind"], kind);
    assert_eq!(event["level"], level);
    assert_eq!(event["method"], "POST");
    assert_eq!(event["path"], "/api/v1/departamentos");
}
