//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IdentityProvider, InMemoryIdentityProvider, InMemoryTodoRepository, TodoRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Port used to authenticate Basic credentials.
    pub identity: Arc<dyn IdentityProvider>,
    /// Todo storage port.
    pub todos: Arc<dyn TodoRepository>,
}

impl HttpState {
    /// Bundle the ports the HTTP layer depends on.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{InMemoryIdentityProvider, InMemoryTodoRepository};
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(InMemoryIdentityProvider::fixture()),
    ///     Arc::new(InMemoryTodoRepository::new()),
    /// );
    /// let _identity = state.identity.clone();
    /// ```
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, todos: Arc<dyn TodoRepository>) -> Self {
        Self { identity, todos }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(InMemoryIdentityProvider::fixture()),
            Arc::new(InMemoryTodoRepository::new()),
        )
    }
}
