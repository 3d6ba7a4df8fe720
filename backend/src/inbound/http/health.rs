//! Liveness probe.

use actix_web::{HttpResponse, Responder, get};
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by the health probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Fixed status marker.
    #[schema(example = "ok")]
    status: &'static str,
}

/// Report process liveness.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}
