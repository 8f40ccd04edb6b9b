//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use sac_backend::Trace;
#[cfg(debug_assertions)]
use sac_backend::doc::ApiDoc;
use sac_backend::inbound::http::health::{HealthState, live, ready};
use sac_backend::inbound::http::routes::api_scope;
use sac_backend::inbound::http::state::{HttpState, HttpStatePorts};
use sac_backend::middleware::ErrorContext;
use sac_backend::outbound::persistence::{
    DbPool, SqlxAdminNombramientoRepository, SqlxCursoGrupoRepository, SqlxCursoRepository,
    SqlxDepartamentoRepository, SqlxPresupuestoRepository, SqlxProfesorRepository,
    SqlxProyectoRepository, SqlxReadinessProbe,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the handler state with one PostgreSQL repository per resource.
fn build_http_state(pool: &DbPool) -> HttpState {
    HttpState::new(HttpStatePorts {
        departamentos: Arc::new(SqlxDepartamentoRepository::new(pool.clone())),
        cursos: Arc::new(SqlxCursoRepository::new(pool.clone())),
        cursos_grupos: Arc::new(SqlxCursoGrupoRepository::new(pool.clone())),
        profesores: Arc::new(SqlxProfesorRepository::new(pool.clone())),
        admin_nombramientos: Arc::new(SqlxAdminNombramientoRepository::new(pool.clone())),
        presupuestos: Arc::new(SqlxPresupuestoRepository::new(pool.clone())),
        proyectos: Arc::new(SqlxProyectoRepository::new(pool.clone())),
        readiness: Arc::new(SqlxReadinessProbe::new(pool.clone())),
    })
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    expose_error_details: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        expose_error_details,
    } = deps;

    let api = api_scope(&http_state);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(ErrorContext::new(expose_error_details))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a resolved [`ServerConfig`].
///
/// Signal handling is left to the caller, which marks `health_state`
/// unhealthy before stopping the server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config.db_pool));
    let ServerConfig {
        bind_addr,
        expose_error_details,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
            expose_error_details,
        })
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    Ok(server)
}
