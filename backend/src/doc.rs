//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the health probes. Resource routes are mounted generically
//!   and share one contract, described by the schemas below.
//! - **Schemas**: the error envelope, pagination metadata, picker options and
//!   one record schema per resource.
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::resources::admin_nombramiento::AdminNombramiento;
use crate::domain::resources::curso::Curso;
use crate::domain::resources::curso_grupo::CursoGrupo;
use crate::domain::resources::departamento::Departamento;
use crate::domain::resources::presupuesto::Presupuesto;
use crate::domain::resources::profesor::Profesor;
use crate::domain::resources::proyecto::Proyecto;
use crate::domain::resources::{Estado, SelectOption};
use crate::inbound::http::error::{ErrorBody, ErrorEnvelope};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::schemas::{IssueSchema, PageMetaSchema};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Academic administration API",
        description = "CRUD endpoints for departments, courses, course groups, professors, \
                       administrative appointments, budgets and projects.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorBody,
        IssueSchema,
        PageMetaSchema,
        SelectOption,
        ProbeStatus,
        Estado,
        Departamento,
        Curso,
        CursoGrupo,
        Profesor,
        AdminNombramiento,
        Presupuesto,
        Proyecto,
    )),
    tags(
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("ErrorBody", "code")]
    #[case("ErrorBody", "message")]
    #[case("ErrorEnvelope", "error")]
    #[case("PageMeta", "totalPages")]
    #[case("SelectOption", "label")]
    #[case("Departamento", "nombre")]
    #[case("Presupuesto", "descripcion")]
    fn registered_schemas_expose_wire_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema registered"));
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    fn health_paths_are_documented() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health/readyz"));
        assert!(doc.paths.paths.contains_key("/health/livez"));
    }
}
