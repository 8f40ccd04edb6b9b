//! Versioned API surface.

use actix_web::{Scope, web};

use crate::inbound::http::resources::resource_scope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::json_config;

/// Prefix shared by every resource route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the `/api/v1` scope with one sub-scope per resource.
#[must_use]
pub fn api_scope(state: &HttpState) -> Scope {
    web::scope(API_PREFIX)
        .app_data(json_config())
        .service(resource_scope("/departamentos", state.departamentos.clone()))
        .service(resource_scope("/cursos", state.cursos.clone()))
        .service(resource_scope("/cursos-grupos", state.cursos_grupos.clone()))
        .service(resource_scope("/profesores", state.profesores.clone()))
        .service(resource_scope(
            "/admin-nombramientos",
            state.admin_nombramientos.clone(),
        ))
        .service(resource_scope("/presupuestos", state.presupuestos.clone()))
        .service(resource_scope("/proyectos", state.proyectos.clone()))
}
