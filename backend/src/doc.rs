//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every todo endpoint, the health probe, the shared error
//! envelope, and the HTTP Basic security scheme.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::todos::{TodoBody, TodoResponseBody};

/// Enrich the generated document with the HTTP Basic security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BasicAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Todos backend API",
        description = "Ownership-scoped todo management over HTTP Basic authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BasicAuth" = [])),
    paths(
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::list_todos_due,
        crate::inbound::http::todos::list_todos_by_completion,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::health::health,
    ),
    components(schemas(TodoBody, TodoResponseBody, Error, ErrorCode, HealthResponse)),
    tags(
        (name = "todos", description = "Ownership-scoped task management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
