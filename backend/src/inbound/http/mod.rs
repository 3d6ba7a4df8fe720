//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
pub mod todos;
pub mod validation;

pub use error::ApiResult;
