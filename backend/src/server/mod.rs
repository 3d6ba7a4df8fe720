//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::domain::ports::{InMemoryIdentityProvider, InMemoryTodoRepository, TodoRepository};
use crate::inbound::http::health::health;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::todos::{
    create_todo, delete_todo, get_todo, list_todos, list_todos_by_completion, list_todos_due,
    update_todo,
};
use crate::middleware::Trace;
use crate::outbound::persistence::DieselTodoRepository;

/// Build the todo repository based on configuration.
///
/// Uses the Diesel adapter when a pool is available; otherwise falls back to
/// the in-memory repository, which keeps the service usable for local
/// development without PostgreSQL.
fn build_todo_repository(config: &ServerConfig) -> Arc<dyn TodoRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselTodoRepository::new(pool.clone())),
        None => {
            info!("no database configured, using in-memory todo storage");
            Arc::new(InMemoryTodoRepository::new())
        }
    }
}

/// Assemble the application with every route and middleware registered.
///
/// The literal `/todos/due` and `/todos/completed/{status}` routes are
/// registered before `/todos/{id}` so they are never captured as
/// identifiers.
pub fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(create_todo)
        .service(list_todos)
        .service(list_todos_due)
        .service(list_todos_by_completion)
        .service(get_todo)
        .service(update_todo)
        .service(delete_todo)
        .service(health)
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let todos = build_todo_repository(&config);
    let identity = config
        .identity
        .clone()
        .unwrap_or_else(|| Arc::new(InMemoryIdentityProvider::fixture()));
    let http_state = web::Data::new(HttpState::new(identity, todos));

    let server = HttpServer::new(move || build_app(http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    info!(addr = %config.bind_addr, "server listening");
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    #[actix_web::test]
    async fn literal_routes_win_over_the_id_route() {
        let app = actix_test::init_service(build_app(web::Data::new(HttpState::default()))).await;

        // Without credentials both should authenticate first; a 401 (not a
        // 400 for "due" parsed as a UUID) shows the literal route matched.
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/todos/due").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/todos/completed/true")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn health_needs_no_credentials() {
        let app = actix_test::init_service(build_app(web::Data::new(HttpState::default()))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health").to_request(),
        )
        .await;
        assert!(response.status().is_success());
    }
}
