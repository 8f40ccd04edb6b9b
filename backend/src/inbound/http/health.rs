//! Health endpoints: liveness & readiness probes for orchestration and load balancers.
//! Document endpoints in OpenAPI via Utoipa.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Shared liveness flag.
///
/// Starts live; [`HealthState::mark_unhealthy`] makes liveness probes fail
/// so orchestrators stop routing traffic during shutdown.
#[derive(Debug)]
pub struct HealthState {
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a live health state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return liveness state. When false, liveness probes emit 503 to trigger restarts.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProbeStatus {
    /// `ok` or `unhealthy`.
    #[schema(example = "ok")]
    pub status: String,
}

fn probe_response(probe_ok: bool) -> HttpResponse {
    let (mut response, status) = if probe_ok {
        (HttpResponse::Ok(), "ok")
    } else {
        (HttpResponse::ServiceUnavailable(), "unhealthy")
    };

    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ProbeStatus {
            status: status.to_owned(),
        })
}

/// Readiness probe. Return 200 when storage answers a trivial query; return 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/readyz",
    tags = ["health"],
    responses(
        (status = 200, description = "Storage is reachable", body = ProbeStatus),
        (
            status = 405,
            description = "Method not allowed; only GET probes are supported"
        ),
        (status = 503, description = "Storage is unreachable", body = ProbeStatus)
    )
)]
#[get("/health/readyz")]
pub async fn ready(state: web::Data<HttpState>) -> HttpResponse {
    match state.readiness.check().await {
        Ok(()) => probe_response(true),
        Err(err) => {
            warn!(error = %err, "readiness check failed");
            probe_response(false)
        }
    }
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once draining.
/// Call `HealthState::mark_unhealthy` before graceful shutdown to surface the drain early.
#[utoipa::path(
    get,
    path = "/health/livez",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = ProbeStatus),
        (
            status = 405,
            description = "Method not allowed; only GET probes are supported"
        ),
        (status = 503, description = "Server is shutting down", body = ProbeStatus)
    )
)]
#[get("/health/livez")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    //! Probe responses against mocked readiness checks.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockReadinessProbe, ReadinessProbe, RepositoryError};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::test_support::{InMemoryDepartamentos, UnusedRepository};

    fn state_with(readiness: Arc<dyn ReadinessProbe>) -> HttpState {
        let repository = Arc::new(InMemoryDepartamentos::new());
        HttpState::new(HttpStatePorts {
            departamentos: repository,
            cursos: Arc::new(UnusedRepository),
            cursos_grupos: Arc::new(UnusedRepository),
            profesores: Arc::new(UnusedRepository),
            admin_nombramientos: Arc::new(UnusedRepository),
            presupuestos: Arc::new(UnusedRepository),
            proyectos: Arc::new(UnusedRepository),
            readiness,
        })
    }

    async fn probe(readiness: MockReadinessProbe) -> (StatusCode, Option<String>, ProbeStatus) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(Arc::new(readiness))))
                .service(ready),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/health/readyz")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = actix_test::read_body_json(res).await;
        (status, cache, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_reports_ok_when_storage_answers() {
        let mut readiness = MockReadinessProbe::new();
        readiness.expect_check().times(1).returning(|| Ok(()));

        let (status, cache, body) = probe(readiness).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body.status, "ok");
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_fails_when_storage_is_unreachable() {
        let mut readiness = MockReadinessProbe::new();
        readiness
            .expect_check()
            .times(1)
            .returning(|| Err(RepositoryError::query("connection refused")));

        let (status, _, body) = probe(readiness).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "unhealthy");
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_flips_once_marked_unhealthy() {
        let health = web::Data::new(HealthState::new());
        let app = actix_test::init_service(
            App::new().app_data(health.clone()).service(live),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/livez").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        health.mark_unhealthy();
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/livez").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
