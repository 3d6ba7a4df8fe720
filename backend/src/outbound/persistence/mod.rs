//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! Adapters here are thin translators: Diesel row structs (`models.rs`) and
//! schema definitions (`schema.rs`) stay internal, and every database error
//! maps onto a domain persistence error type. No business logic lives in
//! this layer.

mod diesel_todo_repository;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
