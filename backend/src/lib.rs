//! Ownership-scoped todo backend.
//!
//! Layered hexagonally: `domain` holds entities and ports, `inbound` the
//! HTTP adapter, `outbound` the persistence adapters, and `server` the
//! wiring that assembles them into a running Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
